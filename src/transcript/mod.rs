use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::extractors::VideoId;

pub mod captions;
pub mod retry;
pub mod youtube;

pub use retry::{RetryError, RetryPolicy};
pub use youtube::YoutubeTranscriptSource;

/// One timed caption entry, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Caption text
    pub text: String,

    /// Start offset in seconds
    pub start: f64,

    /// Display duration in seconds
    pub duration: f64,
}

/// A fetched transcript for one video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    /// Video the transcript belongs to
    pub video_id: VideoId,

    /// Language code of the selected caption track
    pub language_code: String,

    /// Whether the track was generated by speech recognition
    pub is_generated: bool,

    /// Caption entries exactly as the provider returned them
    pub lines: Vec<TranscriptLine>,
}

impl Transcript {
    /// Caption texts joined by newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// End of the last caption entry, in seconds.
    pub fn duration(&self) -> f64 {
        self.lines
            .last()
            .map(|line| line.start + line.duration)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Why a provider failure can never succeed on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermanentReason {
    TranscriptsDisabled,
    NoTranscriptFound,
    VideoUnavailable,
    VideoUnplayable,
}

/// Retry classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Permanent(PermanentReason),
    Transient,
}

/// Errors raised by a [`TranscriptSource`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Subtitles are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No transcript found for video {video_id} in {requested:?} (available: {available:?})")]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("Video {0} is no longer available")]
    VideoUnavailable(String),

    #[error("Video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("YouTube is blocking requests: {0}")]
    RequestBlocked(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn classify(&self) -> FailureClass {
        match self {
            ProviderError::TranscriptsDisabled(_) => {
                FailureClass::Permanent(PermanentReason::TranscriptsDisabled)
            }
            ProviderError::NoTranscriptFound { .. } => {
                FailureClass::Permanent(PermanentReason::NoTranscriptFound)
            }
            ProviderError::VideoUnavailable(_) => {
                FailureClass::Permanent(PermanentReason::VideoUnavailable)
            }
            ProviderError::VideoUnplayable { .. } => {
                FailureClass::Permanent(PermanentReason::VideoUnplayable)
            }
            ProviderError::RequestBlocked(_)
            | ProviderError::Http(_)
            | ProviderError::Status { .. }
            | ProviderError::Malformed(_) => FailureClass::Transient,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.classify() == FailureClass::Transient
    }
}

/// User-visible outcome of a failed fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Transcript not available: {message}")]
    Permanent {
        reason: PermanentReason,
        message: String,
    },

    #[error("Failed to get transcript after {attempts} attempts: {message}")]
    ExhaustedRetries { attempts: u32, message: String },
}

/// Source of timed captions for a video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript for a video in one attempt
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Transcript, ProviderError>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}

/// Fetches transcripts, retrying transient provider failures.
pub struct TranscriptFetcher<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: TranscriptSource> TranscriptFetcher<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch a transcript. Permanent failures return after one attempt;
    /// transient ones are retried until the policy gives up.
    pub async fn fetch(&self, video_id: &VideoId) -> Result<Transcript, FetchError> {
        tracing::debug!(
            "Fetching transcript for {} from {}",
            video_id,
            self.source.provider_name()
        );

        let source = &self.source;
        let result = self
            .policy
            .run(
                move |attempt| {
                    tracing::debug!("Transcript attempt {} for {}", attempt, video_id);
                    source.fetch_transcript(video_id)
                },
                ProviderError::is_transient,
            )
            .await;

        match result {
            Ok(transcript) => {
                if transcript.is_empty() {
                    tracing::warn!("Provider returned an empty transcript for {}", video_id);
                }
                Ok(transcript)
            }
            Err(RetryError::Aborted { attempts, error }) => match error.classify() {
                FailureClass::Permanent(reason) => Err(FetchError::Permanent {
                    reason,
                    message: error.to_string(),
                }),
                FailureClass::Transient => Err(FetchError::ExhaustedRetries {
                    attempts,
                    message: error.to_string(),
                }),
            },
            Err(RetryError::Exhausted { attempts, error }) => Err(FetchError::ExhaustedRetries {
                attempts,
                message: error.to_string(),
            }),
        }
    }
}
