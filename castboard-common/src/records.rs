//! Record types held by the record store
//!
//! All records are created at load time and never mutated afterwards.
//! Hypotheses and comments reference their broadcast by id; the reference
//! is not enforced and may dangle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One published episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Broadcast {
    /// Unique broadcast id
    pub id: i64,
    /// Publish date
    pub date: NaiveDate,
    pub title: String,
    /// Series label used for grouping and coloring
    pub series: String,
    /// Duration in seconds
    pub duration: u32,
    /// Video platform id (empty when not published there)
    #[serde(default)]
    pub video_id: String,
    /// Audio platform id (empty when not published there)
    #[serde(default)]
    pub audio_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

/// Episode summary: overview text plus ordered facts and lessons
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub overview: String,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub lessons: Vec<String>,
}

/// AI-proposed claim tied to a broadcast
///
/// Scores are nominally in [0, 1] but are never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: i64,
    /// Owning broadcast id (unenforced)
    pub broadcast_id: i64,
    pub statement: String,
    /// Supporting fact quoted from the episode
    pub fact: String,
    pub confidence: f64,
    pub originality: f64,
    /// Topic label used for categorical coloring
    pub topic: String,
    pub proposer: String,
    pub created_at: DateTime<Utc>,
}

/// Listener remark tied to a broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    /// Owning broadcast id (unenforced)
    pub broadcast_id: i64,
    pub text: String,
    /// Positivity score (negative 0.0 to positive 1.0)
    pub positivity: f64,
    /// Opinion-vs-reaction score (reaction 0.0 to opinion 1.0)
    pub opinion: f64,
    pub author: String,
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub series: String,
    /// Excerpt shown under the title
    pub description: String,
    pub source_url: String,
    /// Playback duration in seconds
    pub duration: u32,
}

/// Any record owned by a broadcast
pub trait EpisodeOwned {
    fn broadcast_id(&self) -> i64;
}

impl EpisodeOwned for Hypothesis {
    fn broadcast_id(&self) -> i64 {
        self.broadcast_id
    }
}

impl EpisodeOwned for Comment {
    fn broadcast_id(&self) -> i64 {
        self.broadcast_id
    }
}
