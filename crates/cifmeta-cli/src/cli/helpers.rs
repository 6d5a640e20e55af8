use super::CliError;
use anyhow::Context;
use cifmeta_core::domain::{CifError, CifResult, MetadataRecord};
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub(super) const STDIN_PATH: &str = "-";
pub(super) const STDIN_DISPLAY_NAME: &str = "<stdin>";

#[derive(Debug, Serialize)]
pub(super) struct ParseReport<'a> {
    pub(super) cif_filename: String,
    pub(super) metadata: &'a MetadataRecord,
}

#[derive(Debug)]
pub(super) struct InputDocument {
    pub(super) display_name: String,
    pub(super) stem: Option<String>,
    pub(super) bytes: Vec<u8>,
}

pub(super) fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when running in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(super) fn read_input_document(path: &Path) -> CifResult<InputDocument> {
    if path.as_os_str() == STDIN_PATH {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).map_err(|source| {
            CifError::io_system(
                "IO.READ_INPUT",
                format!("failed to read document from stdin: {}", source),
            )
        })?;
        return Ok(InputDocument {
            display_name: STDIN_DISPLAY_NAME.to_string(),
            stem: None,
            bytes,
        });
    }

    let bytes = fs::read(path).map_err(|source| {
        CifError::io_system(
            "IO.READ_INPUT",
            format!("failed to read document '{}': {}", path.display(), source),
        )
    })?;
    let display_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());

    Ok(InputDocument {
        display_name,
        stem,
        bytes,
    })
}

pub(super) fn normalize_text_output(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub(super) fn write_text_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    let normalized = normalize_text_output(content);
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory '{}'", parent.display())
                })?;
            }
            fs::write(path, normalized)
                .with_context(|| format!("failed to write output '{}'", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(normalized.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write output to stdout")?;
        }
    }
    Ok(())
}
