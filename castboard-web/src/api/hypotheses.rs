//! Hypothesis list, topic and scatter endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use castboard_common::query::SortState;
use castboard_common::views::{self, HypothesisEntry, HypothesisParams, ScatterView, TopicEntry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HypothesisQuery {
    pub episode: Option<String>,
    pub topic: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl HypothesisQuery {
    fn params(&self) -> HypothesisParams {
        HypothesisParams {
            episode: views::parse_episode(self.episode.as_deref()),
            topic: self
                .topic
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            sort: SortState::from_params(self.sort.as_deref(), self.order.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HypothesisList {
    pub total: usize,
    pub hypotheses: Vec<HypothesisEntry>,
}

/// GET /api/hypotheses
pub async fn list_hypotheses(
    State(state): State<AppState>,
    Query(query): Query<HypothesisQuery>,
) -> Json<HypothesisList> {
    let params = query.params();
    debug!(?params, "Hypothesis list");
    let hypotheses = views::hypothesis_view(&state.store, &params);
    Json(HypothesisList {
        total: hypotheses.len(),
        hypotheses,
    })
}

/// GET /api/hypotheses/topics
pub async fn list_topics(State(state): State<AppState>) -> Json<Vec<TopicEntry>> {
    Json(views::topic_view(&state.store))
}

/// GET /api/hypotheses/scatter
pub async fn hypothesis_scatter(
    State(state): State<AppState>,
    Query(query): Query<HypothesisQuery>,
) -> Json<ScatterView> {
    let params = query.params();
    debug!(?params, "Hypothesis scatter");
    Json(views::hypothesis_scatter(&state.store, &params, state.plot))
}
