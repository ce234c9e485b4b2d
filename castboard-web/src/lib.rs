//! castboard-web library - HTTP surface for the podcast companion site
//!
//! Serves the derived views (broadcast list, hypothesis and comment lists,
//! scatter plots, search) as JSON over a read-only record store.

use std::sync::Arc;

use axum::Router;
use castboard_common::plot::PlotArea;
use castboard_common::RecordStore;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod latest;
pub mod transport;

use api::search::SearchResponse;
use latest::LatestFetch;
use transport::Transport;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Records loaded at startup (read-only)
    pub store: Arc<RecordStore>,
    /// Remote providers with fallback
    pub transport: Arc<Transport>,
    /// Canvas used for scatter projections
    pub plot: PlotArea,
    /// Latest-wins slot behind the live search endpoints
    pub live_search: LatestFetch<SearchResponse>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: RecordStore, transport: Transport, plot: PlotArea) -> Self {
        Self {
            store: Arc::new(store),
            transport: Arc::new(transport),
            plot,
            live_search: LatestFetch::new(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/broadcasts", get(api::list_broadcasts))
        .route("/api/broadcasts/sync", get(api::sync_broadcasts))
        .route("/api/broadcasts/:id", get(api::get_broadcast))
        .route("/api/hypotheses", get(api::list_hypotheses))
        .route("/api/hypotheses/topics", get(api::list_topics))
        .route("/api/hypotheses/scatter", get(api::hypothesis_scatter))
        .route("/api/comments", get(api::list_comments))
        .route("/api/comments/scatter", get(api::comment_scatter))
        .route("/api/search", get(api::search))
        .route(
            "/api/search/live",
            post(api::start_live_search).get(api::get_live_search),
        );

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
