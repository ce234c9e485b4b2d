//! Broadcast sync vendor feed normalization
//!
//! The sync endpoint returns episodes in the hosting vendor's schema: string
//! ids, RFC-3339 timestamps, ISO-8601 durations, split series fields and
//! nested platform URLs. This module converts that shape into [`Broadcast`].

use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::duration::parse_iso8601_duration;
use crate::records::{Broadcast, Summary};
use crate::{Error, Result};

/// Series label used when the feed carries no series name
pub const FALLBACK_SERIES: &str = "Uncategorized";

/// Feed payload: either a bare array or wrapped in `items`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VendorFeed {
    List(Vec<VendorBroadcast>),
    Wrapped { items: Vec<VendorBroadcast> },
}

impl VendorFeed {
    pub fn into_items(self) -> Vec<VendorBroadcast> {
        match self {
            VendorFeed::List(items) | VendorFeed::Wrapped { items } => items,
        }
    }
}

/// Vendor ids arrive as strings, occasionally as bare numbers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VendorId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorBroadcast {
    pub id: VendorId,
    #[serde(default)]
    pub title: String,
    pub published_at: Option<String>,
    pub duration: Option<String>,
    pub series_number: Option<String>,
    pub series_name: Option<String>,
    pub like_count: Option<u32>,
    #[serde(default)]
    pub url: VendorUrls,
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorUrls {
    pub youtube_url: Option<String>,
    pub spotify_url: Option<String>,
}

/// Compose the series label.
///
/// `"<n>. <name>"` when the series number starts with digits, the bare name
/// otherwise, and [`FALLBACK_SERIES`] when there is no name.
pub fn series_label(number: Option<&str>, name: Option<&str>) -> String {
    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name,
        None => return FALLBACK_SERIES.to_string(),
    };
    let digits: String = number
        .unwrap_or("")
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return name.to_string();
    }
    let n = digits
        .parse::<u64>()
        .map(|n| n.to_string())
        .unwrap_or(digits);
    format!("{}. {}", n, name)
}

/// Hosts serving YouTube watch, embed, shorts and live pages
const YOUTUBE_HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];
const YOUTUBE_SHORT_HOST: &str = "youtu.be";
const SPOTIFY_HOST: &str = "open.spotify.com";

/// Extract the video id from a YouTube watch, short-link, embed or shorts URL
pub fn youtube_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str()?;

    if host == YOUTUBE_SHORT_HOST {
        return url
            .path_segments()?
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }
    if !YOUTUBE_HOSTS.contains(&host) {
        return None;
    }

    let watch_id = url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty());
    if watch_id.is_some() {
        return watch_id;
    }

    let mut segments = url.path_segments()?;
    match segments.next()? {
        "embed" | "shorts" | "live" => segments
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// Extract the episode id (last path segment) from an open.spotify.com URL
pub fn spotify_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if url.host_str()? != SPOTIFY_HOST {
        return None;
    }
    url.path_segments()?
        .rev()
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Normalize one vendor entry into a canonical broadcast
pub fn normalize_broadcast(entry: &VendorBroadcast) -> Result<Broadcast> {
    let id = match &entry.id {
        VendorId::Number(n) => *n,
        VendorId::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidInput(format!("non-numeric broadcast id: {:?}", s)))?,
    };

    let published = entry
        .published_at
        .as_deref()
        .ok_or_else(|| Error::InvalidInput(format!("broadcast {} has no published_at", id)))?;
    let date = DateTime::parse_from_rfc3339(published.trim())
        .map_err(|e| Error::InvalidInput(format!("broadcast {} published_at {:?}: {}", id, published, e)))?
        .date_naive();

    let duration = match entry.duration.as_deref() {
        Some(raw) => parse_iso8601_duration(raw).unwrap_or_else(|| {
            warn!(id, duration = %raw, "Unparseable duration, using 0");
            0
        }),
        None => 0,
    };

    Ok(Broadcast {
        id,
        date,
        title: entry.title.clone(),
        series: series_label(entry.series_number.as_deref(), entry.series_name.as_deref()),
        duration,
        video_id: entry
            .url
            .youtube_url
            .as_deref()
            .and_then(youtube_id)
            .unwrap_or_default(),
        audio_id: entry
            .url
            .spotify_url
            .as_deref()
            .and_then(spotify_id)
            .unwrap_or_default(),
        like_count: entry.like_count,
        summary: entry.summary.clone(),
    })
}

/// Normalize a whole feed, skipping entries that cannot be normalized
pub fn normalize_feed(feed: VendorFeed) -> Vec<Broadcast> {
    feed.into_items()
        .iter()
        .filter_map(|entry| match normalize_broadcast(entry) {
            Ok(b) => Some(b),
            Err(e) => {
                warn!("Skipping vendor broadcast: {}", e);
                None
            }
        })
        .collect()
}

/// Decode and normalize a raw vendor payload
pub fn parse_feed(body: &str) -> Result<Vec<Broadcast>> {
    let feed: VendorFeed = serde_json::from_str(body)?;
    Ok(normalize_feed(feed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_series_label() {
        assert_eq!(series_label(Some("12"), Some("Deep Dives")), "12. Deep Dives");
        assert_eq!(series_label(Some("03-b"), Some("History")), "3. History");
        assert_eq!(series_label(Some("special"), Some("History")), "History");
        assert_eq!(series_label(None, Some("  History ")), "History");
        assert_eq!(series_label(Some("4"), None), FALLBACK_SERIES);
        assert_eq!(series_label(None, Some("")), FALLBACK_SERIES);
    }

    #[test]
    fn test_youtube_id_forms() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=abc123&t=10s").as_deref(),
            Some("abc123")
        );
        assert_eq!(youtube_id("https://youtu.be/xyz789?si=q").as_deref(), Some("xyz789"));
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/emb1").as_deref(),
            Some("emb1")
        );
        assert_eq!(
            youtube_id("https://m.youtube.com/shorts/sh0rt").as_deref(),
            Some("sh0rt")
        );
        assert_eq!(youtube_id("https://example.com/video"), None);
        assert_eq!(youtube_id("not a url"), None);
    }

    #[test]
    fn test_youtube_id_requires_youtube_host() {
        assert_eq!(youtube_id("https://example.com/page?v=notavideo"), None);
        assert_eq!(youtube_id("https://notyoutube.com/watch?v=abc123"), None);
        assert_eq!(youtube_id("https://www.youtube.com/about"), None);
    }

    #[test]
    fn test_youtube_id_query_value_is_decoded() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=ab%2Dcd").as_deref(),
            Some("ab-cd")
        );
    }

    #[test]
    fn test_spotify_id() {
        assert_eq!(
            spotify_id("https://open.spotify.com/episode/4rOoJ6Egrf8K2IrywzwOMk?si=1").as_deref(),
            Some("4rOoJ6Egrf8K2IrywzwOMk")
        );
        assert_eq!(
            spotify_id("https://open.spotify.com/episode/abc/").as_deref(),
            Some("abc")
        );
        assert_eq!(spotify_id("https://example.com/episode/1"), None);
        assert_eq!(spotify_id("https://notspotify.com/episode/xyz"), None);
    }

    #[test]
    fn test_normalize_vendor_entry() {
        let body = r#"[{
            "id": "42",
            "title": "On Compilers",
            "published_at": "2023-06-30T23:30:00-02:00",
            "duration": "PT1H2M3S",
            "series_number": "7",
            "series_name": "Tools",
            "like_count": 11,
            "url": {
                "youtube_url": "https://www.youtube.com/watch?v=vid42",
                "spotify_url": "https://open.spotify.com/episode/aud42"
            }
        }]"#;
        let broadcasts = parse_feed(body).unwrap();
        assert_eq!(broadcasts.len(), 1);
        let b = &broadcasts[0];
        assert_eq!(b.id, 42);
        // date as written in the timestamp's own offset
        assert_eq!(b.date, NaiveDate::from_ymd_opt(2023, 6, 30).unwrap());
        assert_eq!(b.duration, 3723);
        assert_eq!(b.series, "7. Tools");
        assert_eq!(b.video_id, "vid42");
        assert_eq!(b.audio_id, "aud42");
        assert_eq!(b.like_count, Some(11));
    }

    #[test]
    fn test_wrapped_feed_skips_bad_entries() {
        let body = r#"{"items": [
            {"id": "x1", "published_at": "2023-01-01T00:00:00Z"},
            {"id": 5, "published_at": "not a date"},
            {"id": "6", "published_at": "2023-01-02T00:00:00Z", "duration": "1:00"}
        ]}"#;
        let broadcasts = parse_feed(body).unwrap();
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].id, 6);
        assert_eq!(broadcasts[0].duration, 0);
        assert_eq!(broadcasts[0].series, FALLBACK_SERIES);
        assert_eq!(broadcasts[0].video_id, "");
    }

    #[test]
    fn test_malformed_payload_is_parse_error() {
        assert!(matches!(parse_feed("{not json"), Err(Error::Parse(_))));
    }
}
