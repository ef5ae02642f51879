//! tubescribe - fetch YouTube transcripts and render them as text or PDF
//!
//! The library covers the four pieces a transcript request needs: extracting
//! the video id from a URL, fetching the transcript with bounded retries,
//! resolving a display title, and rendering text into a PDF.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod pipeline;
pub mod title;
pub mod transcript;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{extract_video_id, VideoId};
pub use output::{PdfRenderer, RenderError};
pub use pipeline::{PdfDownload, TranscriptPipeline, TranscriptResult};
pub use title::{TitleResolver, FALLBACK_TITLE};
pub use transcript::{FetchError, Transcript, TranscriptFetcher, TranscriptLine};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Errors a transcript request can surface to the user
#[derive(thiserror::Error, Debug)]
pub enum ScribeError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
