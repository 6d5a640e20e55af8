use super::CliError;
use super::helpers::{ParseReport, read_input_document, write_text_output};
use cifmeta_core::domain::CifError;
use cifmeta_core::parser::parse_metadata_bytes;
use cifmeta_core::writer::{WriterOptions, render_cif};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct ParseArgs {
    /// CIF file to read ('-' for stdin)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Write output to this path instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct RenderArgs {
    /// CIF file to read ('-' for stdin)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Data block name; defaults to the input file stem
    #[arg(long)]
    block_name: Option<String>,

    /// Write output to this path instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

pub(super) fn run_parse_command(args: ParseArgs) -> Result<i32, CliError> {
    let document = read_input_document(&args.input)?;
    let metadata = parse_metadata_bytes(&document.bytes)?;
    tracing::info!(
        file = %document.display_name,
        sites = metadata.atomic_positions.len(),
        "parsed document"
    );

    let report = ParseReport {
        cif_filename: document.display_name,
        metadata: &metadata,
    };
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|source| {
        CifError::internal(
            "RUN.SERIALIZE",
            format!("failed to serialize parse report: {}", source),
        )
    })?;

    write_text_output(args.output.as_deref(), &rendered)?;
    Ok(0)
}

pub(super) fn run_render_command(args: RenderArgs) -> Result<i32, CliError> {
    let document = read_input_document(&args.input)?;
    let metadata = parse_metadata_bytes(&document.bytes)?;

    let mut options = WriterOptions::default();
    if let Some(block_name) = args.block_name.or(document.stem) {
        options = options.with_block_name(block_name);
    }
    tracing::info!(
        file = %document.display_name,
        block = %options.block_name,
        "rendering document"
    );

    write_text_output(args.output.as_deref(), &render_cif(&metadata, &options))?;
    Ok(0)
}
