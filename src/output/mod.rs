use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::TranscriptResult;
use crate::transcript::Transcript;
use crate::utils::format_timestamp;

pub mod layout;
pub mod pdf;

pub use pdf::{PdfRenderer, RenderError, PDF_CONTENT_TYPE};

/// Format a transcript as plain text, one caption per line
pub fn format_as_text(transcript: &Transcript, include_timestamps: bool) -> String {
    if !include_timestamps {
        return transcript.text();
    }

    transcript
        .lines
        .iter()
        .map(|line| format!("[{}] {}", format_timestamp(line.start), line.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a fetched result in the requested format
pub fn format_result(result: &TranscriptResult, format: &OutputFormat, include_timestamps: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_as_text(&result.transcript, include_timestamps)),
        OutputFormat::Json => serde_json::to_string_pretty(result).context("Failed to serialize transcript"),
    }
}

/// Save a fetched result to file
pub fn save_to_file(
    result: &TranscriptResult,
    path: &Path,
    format: &OutputFormat,
    include_timestamps: bool,
) -> Result<()> {
    let content = format_result(result, format, include_timestamps)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print a fetched result to stdout
pub fn print_to_console(result: &TranscriptResult, format: &OutputFormat, include_timestamps: bool) -> Result<()> {
    println!("{}", format_result(result, format, include_timestamps)?);
    Ok(())
}

/// Write rendered PDF bytes to `path`
pub fn save_pdf(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, bytes)?;
    Ok(())
}
