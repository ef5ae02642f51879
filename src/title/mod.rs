use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::{ProviderConfig, TitleConfig};
use crate::extractors::VideoId;

/// Title used whenever the real one cannot be determined.
pub const FALLBACK_TITLE: &str = "transcript";

/// Reasons a title lookup can fail. Never surfaced past [`TitleResolver`].
#[derive(Debug, thiserror::Error)]
pub enum TitleLookupError {
    #[error("title request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("title endpoint returned HTTP {0}")]
    Status(u16),

    #[error("title response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("title response has no title")]
    MissingTitle,
}

/// Source of display titles for videos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleSource: Send + Sync {
    async fn lookup_title(&self, video_id: &VideoId) -> Result<String, TitleLookupError>;
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
}

/// Looks titles up through YouTube's oEmbed endpoint.
pub struct OEmbedTitleSource {
    client: Client,
    endpoint: String,
    watch_base_url: String,
}

impl OEmbedTitleSource {
    pub fn new(config: &TitleConfig, provider: &ProviderConfig) -> Result<Self, TitleLookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(provider.user_agent.clone())
            .build()?;

        Ok(Self::with_client(client, config, provider))
    }

    pub fn with_client(client: Client, config: &TitleConfig, provider: &ProviderConfig) -> Self {
        Self {
            client,
            endpoint: config.oembed_url.clone(),
            watch_base_url: provider.base_url.clone(),
        }
    }

    fn lookup_url(&self, video_id: &VideoId) -> String {
        let watch_url = video_id.watch_url(&self.watch_base_url);
        format!(
            "{}?url={}&format=json",
            self.endpoint,
            urlencoding::encode(&watch_url)
        )
    }
}

#[async_trait]
impl TitleSource for OEmbedTitleSource {
    async fn lookup_title(&self, video_id: &VideoId) -> Result<String, TitleLookupError> {
        let url = self.lookup_url(video_id);
        tracing::debug!("Looking up title: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TitleLookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: OEmbedResponse = serde_json::from_str(&body)?;

        parsed
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or(TitleLookupError::MissingTitle)
    }
}

/// Best-effort title resolution that always produces a title.
pub struct TitleResolver<S> {
    source: S,
}

impl<S: TitleSource> TitleResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Resolve the display title, falling back to [`FALLBACK_TITLE`] on any error.
    ///
    /// The returned title is not sanitized for filesystem use.
    pub async fn resolve(&self, video_id: &VideoId) -> String {
        match self.source.lookup_title(video_id).await {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!("Title lookup for {} failed, using fallback: {}", video_id, e);
                FALLBACK_TITLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::extract_video_id;
    use crate::test_support::{serve, CannedResponse};

    fn video_id() -> VideoId {
        extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap()
    }

    fn oembed(base: &str, timeout: Duration) -> OEmbedTitleSource {
        let client = Client::builder().timeout(timeout).build().unwrap();
        let config = TitleConfig {
            oembed_url: format!("{base}/oembed"),
            timeout_secs: 5,
        };
        OEmbedTitleSource::with_client(client, &config, &ProviderConfig::default())
    }

    async fn resolve_against(response: CannedResponse, timeout: Duration) -> String {
        let base = serve(vec![("/oembed", response)]).await;
        TitleResolver::new(oembed(&base, timeout)).resolve(&video_id()).await
    }

    #[test]
    fn test_lookup_url_encodes_watch_url() {
        let source = oembed("https://www.youtube.com", Duration::from_secs(1));
        assert_eq!(
            source.lookup_url(&video_id()),
            "https://www.youtube.com/oembed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ&format=json"
        );
    }

    #[tokio::test]
    async fn test_resolves_title() {
        let title = resolve_against(
            CannedResponse::ok("application/json", r#"{"title": "Never: Gonna?", "author_name": "Rick"}"#),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(title, "Never: Gonna?");
    }

    #[tokio::test]
    async fn test_non_success_status_falls_back() {
        let title = resolve_against(CannedResponse::status(404, "Not Found"), Duration::from_secs(5)).await;
        assert_eq!(title, FALLBACK_TITLE);
    }

    #[tokio::test]
    async fn test_missing_title_falls_back() {
        let title = resolve_against(
            CannedResponse::ok("application/json", r#"{"author_name": "Rick"}"#),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(title, FALLBACK_TITLE);
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let title = resolve_against(
            CannedResponse::ok("text/html", "<html>Unauthorized</html>"),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(title, FALLBACK_TITLE);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let response = CannedResponse::ok("application/json", r#"{"title": "Too slow"}"#)
            .delayed(Duration::from_secs(2));
        let title = resolve_against(response, Duration::from_millis(200)).await;
        assert_eq!(title, FALLBACK_TITLE);
    }

    #[tokio::test]
    async fn test_source_error_falls_back() {
        let mut source = MockTitleSource::new();
        source
            .expect_lookup_title()
            .times(1)
            .returning(|_| Err(TitleLookupError::MissingTitle));

        assert_eq!(TitleResolver::new(source).resolve(&video_id()).await, FALLBACK_TITLE);
    }
}
