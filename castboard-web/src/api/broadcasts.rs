//! Broadcast list, detail and sync endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use castboard_common::query::SortState;
use castboard_common::store::BroadcastRow;
use castboard_common::views::{self, BroadcastParams, BroadcastView};
use castboard_common::Broadcast;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::transport::DataSource;
use crate::AppState;

/// Raw query parameters; anything unparseable is ignored
#[derive(Debug, Default, Deserialize)]
pub struct BroadcastQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub grouped: Option<String>,
}

impl BroadcastQuery {
    fn params(&self) -> BroadcastParams {
        BroadcastParams {
            sort: SortState::from_params(self.sort.as_deref(), self.order.as_deref()),
            grouped: matches!(
                self.grouped.as_deref().map(str::trim),
                Some("true") | Some("1")
            ),
        }
    }
}

/// GET /api/broadcasts
pub async fn list_broadcasts(
    State(state): State<AppState>,
    Query(query): Query<BroadcastQuery>,
) -> Json<BroadcastView> {
    let params = query.params();
    debug!(?params, "Broadcast list");
    Json(views::broadcast_view(&state.store, &params))
}

/// GET /api/broadcasts/:id
///
/// A non-numeric id cannot match any broadcast and is reported as 404.
pub async fn get_broadcast(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BroadcastRow>> {
    id.trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| state.store.broadcast_row(id))
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("broadcast {}", id)))
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub source: DataSource,
    pub total: usize,
    pub broadcasts: Vec<Broadcast>,
}

/// GET /api/broadcasts/sync
///
/// Pulls the vendor feed; the sample broadcasts stand in when it fails.
pub async fn sync_broadcasts(State(state): State<AppState>) -> Json<SyncResponse> {
    let fetched = state.transport.sync_broadcasts(state.store.broadcasts()).await;
    Json(SyncResponse {
        source: fetched.source,
        total: fetched.data.len(),
        broadcasts: fetched.data,
    })
}
