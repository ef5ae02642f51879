use anyhow::Context;
use serde::Serialize;

use crate::config::Config;
use crate::extractors::{extract_video_id, VideoId};
use crate::output::{PdfRenderer, RenderError, PDF_CONTENT_TYPE};
use crate::title::{OEmbedTitleSource, TitleResolver, TitleSource};
use crate::transcript::{Transcript, TranscriptFetcher, TranscriptSource, YoutubeTranscriptSource};
use crate::utils::pdf_filename;
use crate::ScribeError;

/// Everything one transcript request produces
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResult {
    /// Video the transcript belongs to
    pub video_id: VideoId,

    /// Fetched transcript, in provider order
    pub transcript: Transcript,

    /// Display title, unsanitized; the fallback title if lookup failed
    pub title: String,
}

impl TranscriptResult {
    /// Transcript text with one caption per line
    pub fn text(&self) -> String {
        self.transcript.text()
    }
}

/// A rendered PDF ready to be written or served
#[derive(Debug, Clone)]
pub struct PdfDownload {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Render `text` as a PDF named after `title`.
pub fn render_download(renderer: PdfRenderer, text: &str, title: &str) -> Result<PdfDownload, RenderError> {
    let bytes = renderer.with_title(title).render(text)?;

    Ok(PdfDownload {
        filename: pdf_filename(title),
        content_type: PDF_CONTENT_TYPE,
        bytes,
    })
}

/// Runs one URL through id extraction, transcript fetch and title lookup
pub struct TranscriptPipeline<S = YoutubeTranscriptSource, T = OEmbedTitleSource> {
    config: Config,
    fetcher: TranscriptFetcher<S>,
    resolver: TitleResolver<T>,
}

impl TranscriptPipeline {
    /// Create a pipeline backed by YouTube
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let source = YoutubeTranscriptSource::new(&config.provider)
            .context("Failed to create transcript client")?;
        let title_source = OEmbedTitleSource::new(&config.title, &config.provider)
            .context("Failed to create title lookup client")?;

        Ok(Self::with_sources(config, source, title_source))
    }
}

impl<S: TranscriptSource, T: TitleSource> TranscriptPipeline<S, T> {
    pub fn with_sources(config: Config, source: S, title_source: T) -> Self {
        let policy = config.retry.policy();
        Self {
            config,
            fetcher: TranscriptFetcher::new(source, policy),
            resolver: TitleResolver::new(title_source),
        }
    }

    /// Fetch the transcript and title for a video URL.
    ///
    /// The title lookup runs alongside the transcript fetch and never fails
    /// the request.
    pub async fn fetch(&self, url: &str) -> Result<TranscriptResult, ScribeError> {
        let video_id = extract_video_id(url)
            .ok_or_else(|| ScribeError::InvalidInput(url.trim().to_string()))?;

        tracing::info!("Fetching transcript for video {}", video_id);

        let (transcript, title) = tokio::join!(
            self.fetcher.fetch(&video_id),
            self.resolver.resolve(&video_id)
        );
        let transcript = transcript?;

        tracing::info!(
            "Got {} caption lines ({}) for \"{}\"",
            transcript.lines.len(),
            transcript.language_code,
            title
        );

        Ok(TranscriptResult {
            video_id,
            transcript,
            title,
        })
    }

    /// Render a fetched transcript as a PDF download
    pub fn render_pdf(&self, result: &TranscriptResult) -> Result<PdfDownload, ScribeError> {
        let renderer = PdfRenderer::new(&self.config.pdf);
        Ok(render_download(renderer, &result.text(), &result.title)?)
    }
}
