use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const ROCK_SALT: &str = "data_NaCl
_cell_length_a   5.6402
_cell_length_b   5.6402
_cell_length_c   5.6402
_cell_angle_alpha 90.000
_cell_angle_beta  90.000
_cell_angle_gamma 90.000
_symmetry_space_group_name_H-M   'F m -3 m'
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Na1 Na 0.00000 0.00000 0.00000
Cl1 Cl 0.50000 0.50000 0.50000
";

#[test]
fn parse_command_prints_metadata_json() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("NaCl.cif");
    write_file(&input, ROCK_SALT);

    let output = run_cifmeta(&[OsStr::new("parse"), input.as_os_str()]);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be a JSON document");
    assert_eq!(parsed["cif_filename"], Value::from("NaCl.cif"));
    assert_eq!(parsed["metadata"]["lattice"]["a"], Value::from(5.6402));
    assert_eq!(parsed["metadata"]["lattice"]["gamma"], Value::from(90.0));
    assert_eq!(parsed["metadata"]["space_group"], Value::from("F m -3 m"));
    assert_eq!(parsed["metadata"]["bond_info"], Value::Array(Vec::new()));

    let positions = parsed["metadata"]["atomic_positions"]
        .as_array()
        .expect("atomic positions should be an array");
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[1]["element"], Value::from("Cl"));
    assert_eq!(positions[1]["x"], Value::from(0.5));
}

#[test]
fn parse_command_writes_pretty_json_to_output_path() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("NaCl.cif");
    let report = temp.path().join("out/metadata.json");
    write_file(&input, ROCK_SALT);

    let output = run_cifmeta(&[
        OsStr::new("parse"),
        input.as_os_str(),
        OsStr::new("--pretty"),
        OsStr::new("--output"),
        report.as_os_str(),
    ]);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty(), "stdout should stay empty");

    let content = fs::read_to_string(&report).expect("report should be readable");
    assert!(content.contains("\n  \"metadata\": {"));
    let parsed: Value = serde_json::from_str(&content).expect("report JSON should parse");
    assert_eq!(parsed["metadata"]["atomic_positions"][0]["label"], Value::from("Na1"));
}

#[test]
fn parse_command_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cifmeta"))
        .args(["parse", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"_cell_length_b 3.25\n")
        .expect("stdin should accept the document");
    let output = child.wait_with_output().expect("binary should finish");

    assert!(output.status.success());
    let parsed: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be a JSON document");
    assert_eq!(parsed["cif_filename"], Value::from("<stdin>"));
    assert_eq!(parsed["metadata"]["lattice"]["a"], Value::from(0.0));
    assert_eq!(parsed["metadata"]["lattice"]["b"], Value::from(3.25));
    assert_eq!(parsed["metadata"]["space_group"], Value::from("P 1"));
    assert_eq!(parsed["metadata"]["atomic_positions"], Value::Array(Vec::new()));
}

#[test]
fn render_command_emits_normalized_cif() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("rocksalt.cif");
    write_file(&input, ROCK_SALT);

    let output = run_cifmeta(&[OsStr::new("render"), input.as_os_str()]);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let text = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    assert!(text.starts_with("data_rocksalt\n_symmetry_space_group_name_H-M   'F m -3 m'\n"));
    assert!(text.contains("_cell_length_a   5.6402\n"));
    assert!(text.contains("_cell_angle_gamma   90.000\n"));
    assert!(text.ends_with("Na1 Na 0.00000 0.00000 0.00000\nCl1 Cl 0.50000 0.50000 0.50000\n"));
}

#[test]
fn render_command_honours_block_name() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("rocksalt.cif");
    write_file(&input, ROCK_SALT);

    let output = run_cifmeta(&[
        OsStr::new("render"),
        input.as_os_str(),
        OsStr::new("--block-name"),
        OsStr::new("NaCl"),
    ]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("data_NaCl\n"));
}

#[test]
fn missing_input_exits_with_io_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("absent.cif");

    let output = run_cifmeta(&[OsStr::new("parse"), input.as_os_str()]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [IO.READ_INPUT]"), "stderr: {stderr}");
    assert!(stderr.contains("FATAL EXIT CODE: 3"), "stderr: {stderr}");
}

#[test]
fn binary_input_exits_with_input_validation_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("binary.cif");
    fs::write(&input, [0xff_u8, 0xfe, 0x00, 0x41]).expect("fixture should be written");

    let output = run_cifmeta(&[OsStr::new("parse"), input.as_os_str()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: [INPUT.NOT_TEXT]"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = run_cifmeta(&[OsStr::new("expand")]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: [INPUT.CLI_USAGE]"));
}

#[test]
fn help_exits_successfully() {
    let output = run_cifmeta(&[OsStr::new("--help")]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("parse"));
    assert!(stdout.contains("render"));
}

fn run_cifmeta(args: &[&OsStr]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_cifmeta"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}
