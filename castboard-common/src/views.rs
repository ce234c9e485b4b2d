//! Derived views over the record store
//!
//! Each view takes the whole store plus an explicit parameter object and
//! recomputes its result from scratch. Parameter objects carry the list
//! page state (selected episode, topic, sort header) so no ambient UI state
//! is needed.

use serde::Serialize;

use crate::plot::{PixelPoint, PlotArea, TooltipAnchor};
use crate::query::{self, SortState};
use crate::records::{Comment, Hypothesis};
use crate::store::{BroadcastRow, RecordStore};

/// Color for comments whose episode is missing
pub const UNKNOWN_EPISODE_COLOR: &str = "#7f7f7f";

/// Parse an episode id from a query string value.
///
/// Missing, blank or non-numeric values mean "no filter".
pub fn parse_episode(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BroadcastParams {
    pub sort: Option<SortState>,
    pub grouped: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HypothesisParams {
    pub episode: Option<i64>,
    pub topic: Option<String>,
    pub sort: Option<SortState>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CommentParams {
    pub episode: Option<i64>,
    pub sort: Option<SortState>,
}

/// Broadcasts of one series
#[derive(Debug, Clone, Serialize)]
pub struct SeriesGroup {
    pub series: String,
    pub color: &'static str,
    pub broadcasts: Vec<BroadcastRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BroadcastView {
    pub sort: Option<SortState>,
    pub total: usize,
    pub broadcasts: Vec<BroadcastRow>,
    /// Present when grouping was requested; groups ignore the sort and list
    /// members by ascending id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<SeriesGroup>>,
}

pub fn broadcast_view(store: &RecordStore, params: &BroadcastParams) -> BroadcastView {
    let rows = store.broadcast_rows();
    let groups = params.grouped.then(|| {
        let colors = query::assign_colors(rows.iter().map(|r| r.broadcast.series.as_str()));
        query::group_by_series(&rows)
            .into_iter()
            .map(|(series, broadcasts)| SeriesGroup {
                color: colors.get(&series).copied().unwrap_or(query::PALETTE[0]),
                series,
                broadcasts,
            })
            .collect::<Vec<_>>()
    });
    let broadcasts = query::sort_opt(rows, params.sort);
    BroadcastView {
        sort: params.sort,
        total: broadcasts.len(),
        broadcasts,
        groups,
    }
}

/// Hypothesis with its resolved episode title and topic color
#[derive(Debug, Clone, Serialize)]
pub struct HypothesisEntry {
    #[serde(flatten)]
    pub hypothesis: Hypothesis,
    pub episode_title: String,
    pub color: &'static str,
}

/// Comment with its resolved episode title
#[derive(Debug, Clone, Serialize)]
pub struct CommentEntry {
    #[serde(flatten)]
    pub comment: Comment,
    pub episode_title: String,
}

/// Filtered and sorted hypotheses (no sort keeps store order)
pub fn hypothesis_list(store: &RecordStore, params: &HypothesisParams) -> Vec<Hypothesis> {
    let by_episode = query::filter_by_episode(store.hypotheses(), params.episode);
    let by_topic = query::filter_by_topic(&by_episode, params.topic.as_deref());
    query::sort_opt(by_topic, params.sort)
}

pub fn hypothesis_view(store: &RecordStore, params: &HypothesisParams) -> Vec<HypothesisEntry> {
    let colors = topic_colors(store);
    hypothesis_list(store, params)
        .into_iter()
        .map(|h| HypothesisEntry {
            episode_title: store.episode_label(h.broadcast_id).to_string(),
            color: colors.get(&h.topic).copied().unwrap_or(query::PALETTE[0]),
            hypothesis: h,
        })
        .collect()
}

pub fn comment_list(store: &RecordStore, params: &CommentParams) -> Vec<Comment> {
    let by_episode = query::filter_by_episode(store.comments(), params.episode);
    query::sort_opt(by_episode, params.sort)
}

pub fn comment_view(store: &RecordStore, params: &CommentParams) -> Vec<CommentEntry> {
    comment_list(store, params)
        .into_iter()
        .map(|c| CommentEntry {
            episode_title: store.episode_label(c.broadcast_id).to_string(),
            comment: c,
        })
        .collect()
}

/// Topic colors are assigned over every topic in the store so a topic keeps
/// its color when the view is filtered
fn topic_colors(store: &RecordStore) -> std::collections::BTreeMap<String, &'static str> {
    query::assign_colors(store.hypotheses().iter().map(|h| h.topic.as_str()))
}

/// Topic dropdown entry
#[derive(Debug, Clone, Serialize)]
pub struct TopicEntry {
    pub topic: String,
    pub count: usize,
    pub color: &'static str,
}

pub fn topic_view(store: &RecordStore) -> Vec<TopicEntry> {
    let colors = topic_colors(store);
    query::topic_counts(store.hypotheses())
        .into_iter()
        .map(|tc| TopicEntry {
            color: colors.get(&tc.topic).copied().unwrap_or(query::PALETTE[0]),
            topic: tc.topic,
            count: tc.count,
        })
        .collect()
}

/// One plotted point
#[derive(Debug, Clone, Serialize)]
pub struct ScatterPoint {
    pub id: i64,
    pub broadcast_id: i64,
    pub episode_title: String,
    /// Hover text (hypothesis statement or comment text)
    pub label: String,
    /// Normalized scores as given
    pub sx: f64,
    pub sy: f64,
    pub pixel: PixelPoint,
    pub anchor: TooltipAnchor,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterView {
    pub area: PlotArea,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub points: Vec<ScatterPoint>,
}

impl ScatterView {
    /// Point under the pointer, if any lies within `radius` pixels
    pub fn pick(&self, pointer: PixelPoint, radius: Option<f64>) -> Option<&ScatterPoint> {
        let pixels: Vec<PixelPoint> = self.points.iter().map(|p| p.pixel).collect();
        crate::plot::nearest_point(&pixels, pointer, radius).map(|i| &self.points[i])
    }
}

/// Hypotheses plotted confidence (x) by originality (y), colored by topic
pub fn hypothesis_scatter(store: &RecordStore, params: &HypothesisParams, area: PlotArea) -> ScatterView {
    let points = hypothesis_view(store, params)
        .into_iter()
        .map(|entry| {
            let h = entry.hypothesis;
            ScatterPoint {
                id: h.id,
                broadcast_id: h.broadcast_id,
                episode_title: entry.episode_title,
                label: h.statement,
                sx: h.confidence,
                sy: h.originality,
                pixel: area.project(h.confidence, h.originality),
                anchor: TooltipAnchor::for_score(h.confidence, h.originality),
                color: entry.color,
            }
        })
        .collect();
    ScatterView {
        area,
        x_axis: "confidence",
        y_axis: "originality",
        points,
    }
}

/// Comments plotted positivity (x) by opinion (y), colored by episode series
pub fn comment_scatter(store: &RecordStore, params: &CommentParams, area: PlotArea) -> ScatterView {
    let colors = query::assign_colors(store.broadcasts().iter().map(|b| b.series.as_str()));
    let points = comment_view(store, params)
        .into_iter()
        .map(|entry| {
            let c = entry.comment;
            let color = store
                .broadcast(c.broadcast_id)
                .and_then(|b| colors.get(&b.series).copied())
                .unwrap_or(UNKNOWN_EPISODE_COLOR);
            ScatterPoint {
                id: c.id,
                broadcast_id: c.broadcast_id,
                episode_title: entry.episode_title,
                label: c.text,
                sx: c.positivity,
                sy: c.opinion,
                pixel: area.project(c.positivity, c.opinion),
                anchor: TooltipAnchor::for_score(c.positivity, c.opinion),
                color,
            }
        })
        .collect();
    ScatterView {
        area,
        x_axis: "positivity",
        y_axis: "opinion",
        points,
    }
}
