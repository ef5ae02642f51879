//! Parsing of YouTube timed-text caption documents.
//!
//! The document is a flat list of `<text start=".." dur="..">..</text>`
//! elements. Their content is XML-escaped HTML, so it is decoded twice with
//! inline tags stripped in between.

use once_cell::sync::Lazy;
use regex::Regex;

use super::TranscriptLine;

static TEXT_ELEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").unwrap());

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"([\w:-]+)\s*=\s*"([^"]*)""#).unwrap());

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Parse a timed-text document into caption lines, keeping document order.
///
/// Elements without text are skipped. Missing or unparsable timing
/// attributes default to zero.
pub fn parse_timedtext(xml: &str) -> Vec<TranscriptLine> {
    TEXT_ELEMENT_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let raw = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            if raw.is_empty() {
                return None;
            }

            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let mut start = 0.0;
            let mut duration = 0.0;
            for attr in ATTRIBUTE_RE.captures_iter(attrs) {
                let value = attr[2].parse::<f64>().unwrap_or(0.0);
                match &attr[1] {
                    "start" => start = value,
                    "dur" => duration = value,
                    _ => {}
                }
            }

            let html = decode_entities(raw);
            let text = decode_entities(&HTML_TAG_RE.replace_all(&html, ""));

            Some(TranscriptLine { text, start, duration })
        })
        .collect()
}

/// Decode HTML character references, named (the full HTML5 set) and numeric.
///
/// Unknown references are left untouched.
pub fn decode_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}
