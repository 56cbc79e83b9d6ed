//! Subtitle file parsing: timed json3 tracks and plain-text VTT cleanup

use crate::store::TranscriptSegment;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static SEQUENCE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}").expect("valid regex"));

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Reduce a VTT/SRT subtitle file to plain text.
///
/// Auto-captions repeat each line as the next cue rolls in, so consecutive
/// identical lines collapse to one. Non-adjacent repeats are kept.
pub fn clean_subtitle_text(content: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with("WEBVTT")
            || line.starts_with("Kind:")
            || line.starts_with("Language:")
            || SEQUENCE_NUMBER.is_match(line)
            || TIMESTAMP.is_match(line)
            || line.contains("-->")
        {
            continue;
        }

        let clean = MARKUP_TAG.replace_all(line, "");
        let clean = clean.trim();
        if clean.is_empty() {
            continue;
        }
        if lines.last().is_some_and(|prev| prev == clean) {
            continue;
        }
        lines.push(clean.to_string());
    }

    lines.join(" ")
}

#[derive(Debug, Deserialize)]
struct Json3Track {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a YouTube `json3` caption track into timed segments.
/// Events without text (window styling, bare newlines) are skipped.
pub fn parse_json3(content: &str) -> Result<Vec<TranscriptSegment>, serde_json::Error> {
    let track: Json3Track = serde_json::from_str(content)?;

    Ok(track
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment {
                text,
                start_time_seconds: event.t_start_ms as f64 / 1000.0,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_subtitle_text_drops_headers_and_cues() {
        let vtt = "WEBVTT\nKind: captions\nLanguage: en\n\n1\n00:00:01.000 --> 00:00:03.000\nhello <c>world</c>\n\n2\n00:00:03.000 --> 00:00:05.000\nsecond line\n";
        assert_eq!(clean_subtitle_text(vtt), "hello world second line");
    }

    #[test]
    fn test_clean_subtitle_text_collapses_consecutive_repeats_only() {
        let vtt = "00:00:01.000 --> 00:00:02.000\nhi\n\n00:00:02.000 --> 00:00:03.000\nhi\nthere\n\n00:00:03.000 --> 00:00:04.000\nhi\n";
        assert_eq!(clean_subtitle_text(vtt), "hi there hi");
    }

    #[test]
    fn test_clean_subtitle_text_strips_inline_timing_tags() {
        let vtt = "<00:00:01.520><c> so</c><00:00:01.800><c> today</c>\n";
        assert_eq!(clean_subtitle_text(vtt), "so today");
    }

    #[test]
    fn test_clean_subtitle_text_empty_input() {
        assert_eq!(clean_subtitle_text(""), "");
        assert_eq!(clean_subtitle_text("WEBVTT\n\n"), "");
    }

    #[test]
    fn test_parse_json3_joins_segs_and_skips_blank_events() {
        let json = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 5000, "id": 1, "wWinId": 1},
                {"tStartMs": 1200, "dDurationMs": 2000, "segs": [{"utf8": "hello"}, {"utf8": " world", "tOffsetMs": 400}]},
                {"tStartMs": 3000, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 3500, "segs": [{"utf8": "next  line"}]}
            ]
        }"#;

        let segments = parse_json3(json).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "hello world");
        assert_eq!(segments[0].start_time_seconds, 1.2);
        assert_eq!(segments[1].text, "next line");
        assert_eq!(segments[1].start_time_seconds, 3.5);
    }

    #[test]
    fn test_parse_json3_rejects_garbage() {
        assert!(parse_json3("not json").is_err());
    }
}
