use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Matches the id in `watch?v=ID`, `youtu.be/ID`, `/embed/ID`, `/shorts/ID` and similar shapes.
static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|/|be/|embed/)([0-9A-Za-z_-]{11})").unwrap());

/// Length of every YouTube video id.
pub const VIDEO_ID_LEN: usize = 11;

/// Canonical YouTube video identifier.
///
/// Only [`extract_video_id`] can produce one, so holding a `VideoId` means the
/// token already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video under `base_url`.
    pub fn watch_url(&self, base_url: &str) -> String {
        format!("{}/watch?v={}", base_url.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video id from any of the supported YouTube URL shapes.
///
/// The first id-shaped token following `v=`, `/`, `be/` or `embed/` wins.
/// Returns `None` when the input has no such token; callers should report that
/// as a user input error.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_extracts_from_known_shapes() {
        let urls = [
            format!("https://www.youtube.com/watch?v={ID}"),
            format!("https://m.youtube.com/watch?v={ID}&t=42s&list=PL123"),
            format!("https://youtu.be/{ID}"),
            format!("https://youtu.be/{ID}?si=abcdef"),
            format!("https://www.youtube.com/embed/{ID}"),
            format!("https://www.youtube.com/shorts/{ID}"),
            format!("https://www.youtube.com/v/{ID}?version=3"),
            format!("youtube.com/watch?feature=share&v={ID}"),
        ];

        for url in urls {
            let id = extract_video_id(&url).unwrap_or_else(|| panic!("no id in {url}"));
            assert_eq!(id.as_str(), ID, "wrong id for {url}");
        }
    }

    #[test]
    fn test_ids_with_dash_and_underscore() {
        for id in ["a-b_c-d_e-f", "___________", "-----------", "0123456789A"] {
            let url = format!("https://www.youtube.com/watch?v={id}");
            assert_eq!(extract_video_id(&url).unwrap().as_str(), id);
        }
    }

    #[test]
    fn test_not_found() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://example.com/"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=short"), None);
    }

    #[test]
    fn test_capture_is_fixed_length() {
        let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQXYZ").unwrap();
        assert_eq!(id.as_str().len(), VIDEO_ID_LEN);
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn test_first_match_wins() {
        let url = "https://youtu.be/AAAAAAAAAAA?v=BBBBBBBBBBB";
        assert_eq!(extract_video_id(url).unwrap().as_str(), "AAAAAAAAAAA");
    }

    #[test]
    fn test_is_deterministic() {
        let url = format!("https://youtu.be/{ID}");
        assert_eq!(extract_video_id(&url), extract_video_id(&url));
    }

    #[test]
    fn test_watch_url() {
        let id = extract_video_id(&format!("https://youtu.be/{ID}")).unwrap();
        assert_eq!(
            id.watch_url("https://www.youtube.com/"),
            format!("https://www.youtube.com/watch?v={ID}")
        );
        assert_eq!(id.to_string(), ID);
    }
}
