use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::captions::parse_timedtext;
use super::{ProviderError, Transcript, TranscriptSource};
use crate::config::ProviderConfig;
use crate::extractors::VideoId;

static API_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap());

const CONSENT_FORM_MARKER: &str = r#"action="https://consent.youtube.com/s""#;
const RECAPTCHA_MARKER: &str = r#"class="g-recaptcha""#;
const UNAVAILABLE_REASON: &str = "This video is unavailable";

/// Player API response, reduced to the fields transcripts need.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
    error_screen: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<CaptionTracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTracklist {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Transcript provider backed by YouTube's innertube player API.
///
/// One fetch is three requests: the watch page (for the API key), the player
/// endpoint (for playability and caption tracks) and the timed-text document.
pub struct YoutubeTranscriptSource {
    client: Client,
    base_url: String,
    language: String,
    client_version: String,
}

impl YoutubeTranscriptSource {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            client_version: config.client_version.clone(),
        }
    }

    /// Fetch the watch page HTML
    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<String, ProviderError> {
        let url = video_id.watch_url(&self.base_url);
        tracing::debug!("Fetching watch page: {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT_LANGUAGE, "en-US")
            .header(header::COOKIE, "CONSENT=YES+cb")
            .send()
            .await?;

        Ok(check_status(response)?.text().await?)
    }

    /// Query the player endpoint for playability and caption tracks
    async fn fetch_player(&self, video_id: &VideoId, api_key: &str) -> Result<PlayerResponse, ProviderError> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url, api_key);
        tracing::debug!("Querying player API for {}", video_id);

        let body = json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": self.client_version,
                }
            },
            "videoId": video_id.as_str(),
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let text = check_status(response)?.text().await?;

        serde_json::from_str(&text)
            .map_err(|e| ProviderError::Malformed(format!("player response: {}", e)))
    }

    /// Download and parse the timed-text document of a caption track
    async fn fetch_track(&self, video_id: &VideoId, track: &CaptionTrack) -> Result<Transcript, ProviderError> {
        if track.base_url.contains("&exp=xpe") {
            return Err(ProviderError::RequestBlocked(
                "caption track requires a proof-of-origin token".to_string(),
            ));
        }

        let url = track.base_url.replace("&fmt=srv3", "");
        tracing::debug!("Downloading {} captions for {}", track.language_code, video_id);

        let response = self.client.get(&url).send().await?;
        let xml = check_status(response)?.text().await?;

        Ok(Transcript {
            video_id: video_id.clone(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated(),
            lines: parse_timedtext(&xml),
        })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Transcript, ProviderError> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_api_key(&html)?;

        let player = self.fetch_player(video_id, &api_key).await?;
        check_playability(video_id, &player)?;

        let tracks = caption_tracks(video_id, player)?;
        let track = select_track(video_id, &tracks, &self.language)?;

        self.fetch_track(video_id, track).await
    }

    fn provider_name(&self) -> &'static str {
        "YouTube"
    }
}

/// Map HTTP failures onto provider errors
fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RequestBlocked(format!(
            "HTTP 429 from {}",
            response.url()
        )));
    }

    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(response)
}

fn extract_api_key(html: &str) -> Result<String, ProviderError> {
    if let Some(caps) = API_KEY_RE.captures(html) {
        return Ok(caps[1].to_string());
    }

    if html.contains(RECAPTCHA_MARKER) {
        return Err(ProviderError::RequestBlocked("watch page returned a captcha".to_string()));
    }
    if html.contains(CONSENT_FORM_MARKER) {
        return Err(ProviderError::RequestBlocked("watch page requires cookie consent".to_string()));
    }

    Err(ProviderError::Malformed("watch page has no innertube API key".to_string()))
}

fn check_playability(video_id: &VideoId, player: &PlayerResponse) -> Result<(), ProviderError> {
    let Some(playability) = &player.playability_status else {
        return Ok(());
    };

    let status = playability.status.as_deref().unwrap_or("OK");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability.reason.clone().unwrap_or_default();

    if status == "LOGIN_REQUIRED" && reason.contains("not a bot") {
        return Err(ProviderError::RequestBlocked(reason));
    }

    if status == "ERROR" && reason == UNAVAILABLE_REASON {
        return Err(ProviderError::VideoUnavailable(video_id.to_string()));
    }

    let subreasons = playability
        .error_screen
        .as_ref()
        .and_then(|screen| screen.pointer("/playerErrorMessageRenderer/subreason/runs"))
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|s| !s.is_empty());

    let reason = match (reason.is_empty(), subreasons) {
        (true, None) => format!("playability status {}", status),
        (true, Some(sub)) => sub,
        (false, None) => reason,
        (false, Some(sub)) => format!("{} ({})", reason, sub),
    };

    Err(ProviderError::VideoUnplayable {
        video_id: video_id.to_string(),
        reason,
    })
}

fn caption_tracks(video_id: &VideoId, player: PlayerResponse) -> Result<Vec<CaptionTrack>, ProviderError> {
    let tracks = player
        .captions
        .and_then(|captions| captions.tracklist)
        .map(|tracklist| tracklist.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(ProviderError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(tracks)
}

/// Prefer a manually created track over a generated one in the same language
fn select_track<'a>(
    video_id: &VideoId,
    tracks: &'a [CaptionTrack],
    language: &str,
) -> Result<&'a CaptionTrack, ProviderError> {
    let in_language = |generated: bool| {
        tracks
            .iter()
            .find(|t| t.language_code == language && t.is_generated() == generated)
    };

    in_language(false)
        .or_else(|| in_language(true))
        .ok_or_else(|| ProviderError::NoTranscriptFound {
            video_id: video_id.to_string(),
            requested: vec![language.to_string()],
            available: tracks.iter().map(|t| t.language_code.clone()).collect(),
        })
}
