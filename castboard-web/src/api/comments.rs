//! Comment list and scatter endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use castboard_common::query::SortState;
use castboard_common::views::{self, CommentEntry, CommentParams, ScatterView};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CommentQuery {
    pub episode: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl CommentQuery {
    fn params(&self) -> CommentParams {
        CommentParams {
            episode: views::parse_episode(self.episode.as_deref()),
            sort: SortState::from_params(self.sort.as_deref(), self.order.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub total: usize,
    pub comments: Vec<CommentEntry>,
}

/// GET /api/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> Json<CommentList> {
    let params = query.params();
    debug!(?params, "Comment list");
    let comments = views::comment_view(&state.store, &params);
    Json(CommentList {
        total: comments.len(),
        comments,
    })
}

/// GET /api/comments/scatter
pub async fn comment_scatter(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> Json<ScatterView> {
    let params = query.params();
    debug!(?params, "Comment scatter");
    Json(views::comment_scatter(&state.store, &params, state.plot))
}
