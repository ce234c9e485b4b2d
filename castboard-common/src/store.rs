//! Read-only record store
//!
//! Loaded once at process start, either from the embedded sample data or
//! from already-normalized remote records, and never mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::duration::format_duration;
use crate::query::{SeriesMember, SortColumn, Sortable};
use crate::records::{Broadcast, Comment, Hypothesis, SearchResult};
use crate::Result;

/// Label shown when a hypothesis or comment points at a missing broadcast
pub const UNKNOWN_EPISODE: &str = "Unknown episode";

const SAMPLE_RECORDS: &str = include_str!("../data/sample.json");
const SAMPLE_SEARCH: &str = include_str!("../data/search.json");

/// Serialized shape of a record set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub broadcasts: Vec<Broadcast>,
    #[serde(default)]
    pub hypotheses: Vec<Hypothesis>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    broadcasts: Vec<Broadcast>,
    hypotheses: Vec<Hypothesis>,
    comments: Vec<Comment>,
    search_corpus: Vec<SearchResult>,
}

/// A broadcast with its derived engagement counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastRow {
    #[serde(flatten)]
    pub broadcast: Broadcast,
    pub hypothesis_count: u32,
    pub comment_count: u32,
    /// Simulated metric: `like_count * 10 + hypothesis_count * 5`
    pub view_count: u32,
    /// Duration as `M:SS` or `H:MM:SS`
    pub duration_label: String,
}

impl BroadcastRow {
    pub fn new(broadcast: Broadcast, hypothesis_count: u32, comment_count: u32) -> Self {
        let view_count = broadcast
            .like_count
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(hypothesis_count.saturating_mul(5));
        Self {
            duration_label: format_duration(broadcast.duration),
            broadcast,
            hypothesis_count,
            comment_count,
            view_count,
        }
    }
}

impl RecordStore {
    pub fn new(record_set: RecordSet, search_corpus: Vec<SearchResult>) -> Self {
        Self {
            broadcasts: record_set.broadcasts,
            hypotheses: record_set.hypotheses,
            comments: record_set.comments,
            search_corpus,
        }
    }

    /// Decode a canonical record set from JSON
    pub fn from_json(records: &str, search_corpus: &str) -> Result<Self> {
        let record_set: RecordSet = serde_json::from_str(records)?;
        let corpus: Vec<SearchResult> = serde_json::from_str(search_corpus)?;
        Ok(Self::new(record_set, corpus))
    }

    /// Store built from the embedded sample data
    pub fn sample() -> Result<Self> {
        let store = Self::from_json(SAMPLE_RECORDS, SAMPLE_SEARCH)?;
        info!(
            broadcasts = store.broadcasts.len(),
            hypotheses = store.hypotheses.len(),
            comments = store.comments.len(),
            search_results = store.search_corpus.len(),
            "Loaded sample records"
        );
        Ok(store)
    }

    /// Same store with the broadcast list replaced (used when a remote sync
    /// succeeds before the store is shared)
    pub fn with_broadcasts(mut self, broadcasts: Vec<Broadcast>) -> Self {
        self.broadcasts = broadcasts;
        self
    }

    pub fn broadcasts(&self) -> &[Broadcast] {
        &self.broadcasts
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Local search results used when the remote search is unavailable
    pub fn search_corpus(&self) -> &[SearchResult] {
        &self.search_corpus
    }

    pub fn broadcast(&self, id: i64) -> Option<&Broadcast> {
        self.broadcasts.iter().find(|b| b.id == id)
    }

    /// Title of the owning broadcast, or [`UNKNOWN_EPISODE`]
    pub fn episode_label(&self, broadcast_id: i64) -> &str {
        self.broadcast(broadcast_id)
            .map(|b| b.title.as_str())
            .unwrap_or(UNKNOWN_EPISODE)
    }

    /// Every broadcast with hypothesis/comment counts, in store order
    pub fn broadcast_rows(&self) -> Vec<BroadcastRow> {
        let mut hypothesis_counts: HashMap<i64, u32> = HashMap::new();
        for h in &self.hypotheses {
            *hypothesis_counts.entry(h.broadcast_id).or_default() += 1;
        }
        let mut comment_counts: HashMap<i64, u32> = HashMap::new();
        for c in &self.comments {
            *comment_counts.entry(c.broadcast_id).or_default() += 1;
        }
        self.broadcasts
            .iter()
            .map(|b| {
                BroadcastRow::new(
                    b.clone(),
                    hypothesis_counts.get(&b.id).copied().unwrap_or(0),
                    comment_counts.get(&b.id).copied().unwrap_or(0),
                )
            })
            .collect()
    }

    pub fn broadcast_row(&self, id: i64) -> Option<BroadcastRow> {
        self.broadcast_rows().into_iter().find(|r| r.broadcast.id == id)
    }

    pub fn len(&self) -> usize {
        self.broadcasts.len() + self.hypotheses.len() + self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sortable for BroadcastRow {
    fn sort_date(&self) -> Option<chrono::NaiveDate> {
        self.broadcast.sort_date()
    }

    fn sort_text(&self) -> &str {
        self.broadcast.sort_text()
    }

    fn sort_number(&self, column: SortColumn) -> Option<f64> {
        match column {
            SortColumn::Views => Some(f64::from(self.view_count)),
            SortColumn::Comments => Some(f64::from(self.comment_count)),
            _ => self.broadcast.sort_number(column),
        }
    }
}

impl SeriesMember for BroadcastRow {
    fn series(&self) -> &str {
        &self.broadcast.series
    }

    fn record_id(&self) -> i64 {
        self.broadcast.id
    }
}
