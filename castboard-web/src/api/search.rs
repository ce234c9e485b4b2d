//! Search endpoints
//!
//! `/api/search` answers one query synchronously. The live pair lets a
//! client fire a search on every keystroke: each `POST` supersedes the
//! earlier ones, and `GET` only ever shows the newest committed result.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use castboard_common::SearchResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::latest::Snapshot;
use crate::transport::DataSource;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    fn text(&self) -> String {
        self.q.clone().unwrap_or_default()
    }
}

/// Search outcome with its provenance
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub source: DataSource,
    pub total: usize,
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    async fn run(state: &AppState, query: String) -> Self {
        let fetched = state
            .transport
            .search(&query, state.store.search_corpus())
            .await;
        Self {
            query,
            source: fetched.source,
            total: fetched.data.len(),
            results: fetched.data,
        }
    }
}

/// GET /api/search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let text = query.text();
    debug!(query = %text, "Search");
    Json(SearchResponse::run(&state, text).await)
}

#[derive(Debug, Serialize)]
pub struct LiveSearchTicket {
    pub seq: u64,
}

/// POST /api/search/live
pub async fn start_live_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> (StatusCode, Json<LiveSearchTicket>) {
    let text = query.text();
    let task_state = state.clone();
    let (seq, _task) = state
        .live_search
        .request(async move { SearchResponse::run(&task_state, text).await });
    debug!(seq, "Live search issued");
    (StatusCode::ACCEPTED, Json(LiveSearchTicket { seq }))
}

#[derive(Debug, Serialize)]
pub struct LiveSearchStatus {
    /// Most recently issued request
    pub latest_seq: u64,
    /// True while the newest request has not answered
    pub pending: bool,
    /// Newest committed result; stays visible while a newer one is in flight
    pub current: Option<Snapshot<SearchResponse>>,
}

/// GET /api/search/live
pub async fn get_live_search(State(state): State<AppState>) -> Json<LiveSearchStatus> {
    Json(LiveSearchStatus {
        latest_seq: state.live_search.latest_seq(),
        pending: state.live_search.is_pending(),
        current: state.live_search.current(),
    })
}
