//! Query engine primitives
//!
//! Pure functions over record slices: sorting through a column table,
//! grouping by series, and the episode/topic/text filters. Nothing here
//! mutates its input; every call returns a fresh derived sequence.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::{Broadcast, Comment, EpisodeOwned, Hypothesis, SearchResult};

/// Sortable columns across the list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Date,
    Title,
    Duration,
    Views,
    Comments,
    Likes,
    Confidence,
}

impl SortColumn {
    /// Parse a query-string column name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "title" => Some(Self::Title),
            "duration" => Some(Self::Duration),
            "views" | "view_count" => Some(Self::Views),
            "comments" | "comment_count" => Some(Self::Comments),
            "likes" | "like_count" => Some(Self::Likes),
            "confidence" => Some(Self::Confidence),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Duration => "duration",
            Self::Views => "views",
            Self::Comments => "comments",
            Self::Likes => "likes",
            Self::Confidence => "confidence",
        }
    }

    /// Comparator for this column, ascending
    fn comparator<T: Sortable>(self) -> fn(&T, &T) -> Ordering {
        match self {
            Self::Date => |a, b| a.sort_date().cmp(&b.sort_date()),
            Self::Title => |a, b| cmp_ignore_case(a.sort_text(), b.sort_text()),
            Self::Duration => |a, b| cmp_number(a, b, SortColumn::Duration),
            Self::Views => |a, b| cmp_number(a, b, SortColumn::Views),
            Self::Comments => |a, b| cmp_number(a, b, SortColumn::Comments),
            Self::Likes => |a, b| cmp_number(a, b, SortColumn::Likes),
            Self::Confidence => |a, b| cmp_number(a, b, SortColumn::Confidence),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse `asc`/`desc` (and the long forms). Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Click-to-sort header state
///
/// Clicking the active column flips its direction; clicking another column
/// selects it descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    /// Fresh selection of `column` (descending)
    pub fn new(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }

    pub fn toggle(self, column: SortColumn) -> Self {
        if column == self.column {
            Self {
                column,
                direction: self.direction.flipped(),
            }
        } else {
            Self::new(column)
        }
    }

    /// Build from raw query-string values.
    ///
    /// An unknown column means no sort. An unknown or missing order falls
    /// back to descending, matching a fresh column selection.
    pub fn from_params(sort: Option<&str>, order: Option<&str>) -> Option<Self> {
        let column = sort.and_then(SortColumn::parse)?;
        let direction = order
            .and_then(SortDirection::parse)
            .unwrap_or(SortDirection::Descending);
        Some(Self { column, direction })
    }
}

/// Fields a record exposes to the sort table.
///
/// Columns a record does not carry read as absent: earliest date, empty
/// text, numeric zero.
pub trait Sortable {
    fn sort_date(&self) -> Option<NaiveDate> {
        None
    }

    fn sort_text(&self) -> &str {
        ""
    }

    fn sort_number(&self, _column: SortColumn) -> Option<f64> {
        None
    }
}

/// Records that belong to a named series
pub trait SeriesMember {
    fn series(&self) -> &str;
    fn record_id(&self) -> i64;
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn cmp_number<T: Sortable>(a: &T, b: &T, column: SortColumn) -> Ordering {
    let a = a.sort_number(column).unwrap_or(0.0);
    let b = b.sort_number(column).unwrap_or(0.0);
    a.total_cmp(&b)
}

/// Sort records by `state`, stable with respect to ties
pub fn sort<T: Sortable + Clone>(records: &[T], state: SortState) -> Vec<T> {
    let cmp = state.column.comparator::<T>();
    let mut sorted = records.to_vec();
    match state.direction {
        SortDirection::Ascending => sorted.sort_by(cmp),
        SortDirection::Descending => sorted.sort_by(|a, b| cmp(b, a)),
    }
    sorted
}

/// Apply an optional sort; `None` keeps the input order
pub fn sort_opt<T: Sortable + Clone>(records: Vec<T>, state: Option<SortState>) -> Vec<T> {
    match state {
        Some(state) => sort(&records, state),
        None => records,
    }
}

/// Group records by series label
///
/// Groups are keyed in lexicographic label order; each group is ordered by
/// ascending id.
pub fn group_by_series<T: SeriesMember + Clone>(records: &[T]) -> BTreeMap<String, Vec<T>> {
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.series().to_string())
            .or_default()
            .push(record.clone());
    }
    for members in groups.values_mut() {
        members.sort_by_key(|r| r.record_id());
    }
    groups
}

/// Keep records owned by `episode`; `None` keeps everything
pub fn filter_by_episode<T: EpisodeOwned + Clone>(records: &[T], episode: Option<i64>) -> Vec<T> {
    match episode {
        Some(id) => records
            .iter()
            .filter(|r| r.broadcast_id() == id)
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}

/// Keep hypotheses with exactly this topic; absent or empty keeps everything
pub fn filter_by_topic(records: &[Hypothesis], topic: Option<&str>) -> Vec<Hypothesis> {
    match topic.filter(|t| !t.is_empty()) {
        Some(topic) => records.iter().filter(|h| h.topic == topic).cloned().collect(),
        None => records.to_vec(),
    }
}

/// Case-insensitive substring match on title or description
///
/// A missing or blank query is "no filter" and returns every record. Any
/// other query is matched as given, surrounding whitespace included.
pub fn filter_by_text(records: &[SearchResult], query: Option<&str>) -> Vec<SearchResult> {
    let needle = match query.filter(|q| !q.trim().is_empty()) {
        Some(q) => q.to_lowercase(),
        None => return records.to_vec(),
    };
    records
        .iter()
        .filter(|r| {
            r.title.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Topic label with its number of hypotheses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

/// Distinct topics with counts, ordered by label
pub fn topic_counts(records: &[Hypothesis]) -> Vec<TopicCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for h in records {
        *counts.entry(h.topic.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(topic, count)| TopicCount {
            topic: topic.to_string(),
            count,
        })
        .collect()
}

/// Categorical palette for series and topic coloring
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Assign palette colors to distinct labels in sorted order, cycling when
/// there are more labels than colors
pub fn assign_colors<'a, I>(labels: I) -> BTreeMap<String, &'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: std::collections::BTreeSet<&str> = labels.into_iter().collect();
    distinct
        .into_iter()
        .enumerate()
        .map(|(i, label)| (label.to_string(), PALETTE[i % PALETTE.len()]))
        .collect()
}

impl Sortable for Broadcast {
    fn sort_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sort_text(&self) -> &str {
        &self.title
    }

    fn sort_number(&self, column: SortColumn) -> Option<f64> {
        match column {
            SortColumn::Duration => Some(f64::from(self.duration)),
            SortColumn::Likes => self.like_count.map(f64::from),
            _ => None,
        }
    }
}

impl SeriesMember for Broadcast {
    fn series(&self) -> &str {
        &self.series
    }

    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Sortable for Hypothesis {
    fn sort_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }

    fn sort_text(&self) -> &str {
        &self.statement
    }

    fn sort_number(&self, column: SortColumn) -> Option<f64> {
        match column {
            SortColumn::Confidence => Some(self.confidence),
            _ => None,
        }
    }
}

impl Sortable for Comment {
    fn sort_text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn broadcast(id: i64, date: &str, title: &str, series: &str) -> Broadcast {
        Broadcast {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            title: title.to_string(),
            series: series.to_string(),
            duration: 0,
            video_id: String::new(),
            audio_id: String::new(),
            like_count: None,
            summary: None,
        }
    }

    fn hypothesis(id: i64, broadcast_id: i64, topic: &str, confidence: f64) -> Hypothesis {
        Hypothesis {
            id,
            broadcast_id,
            statement: format!("h{}", id),
            fact: String::new(),
            confidence,
            originality: 0.5,
            topic: topic.to_string(),
            proposer: "model".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn ids(records: &[Broadcast]) -> Vec<i64> {
        records.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_sort_by_date_ascending() {
        let records = vec![
            broadcast(5, "2019-01-23", "Z", "s"),
            broadcast(3, "2019-01-01", "A", "s"),
        ];
        let state = SortState {
            column: SortColumn::Date,
            direction: SortDirection::Ascending,
        };
        assert_eq!(ids(&sort(&records, state)), vec![3, 5]);
    }

    #[test]
    fn test_sort_by_title_descending() {
        let records = vec![
            broadcast(3, "2019-01-01", "A", "s"),
            broadcast(5, "2019-01-23", "Z", "s"),
        ];
        let state = SortState::new(SortColumn::Title);
        assert_eq!(ids(&sort(&records, state)), vec![5, 3]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let records = vec![
            broadcast(1, "2019-01-01", "beta", "s"),
            broadcast(2, "2019-01-01", "Alpha", "s"),
            broadcast(3, "2019-01-01", "Gamma", "s"),
        ];
        let state = SortState {
            column: SortColumn::Title,
            direction: SortDirection::Ascending,
        };
        assert_eq!(ids(&sort(&records, state)), vec![2, 1, 3]);
    }

    #[test]
    fn test_absent_likes_sort_as_zero() {
        let mut a = broadcast(1, "2019-01-01", "a", "s");
        a.like_count = Some(3);
        let b = broadcast(2, "2019-01-01", "b", "s");
        let mut c = broadcast(3, "2019-01-01", "c", "s");
        c.like_count = Some(0);
        let state = SortState {
            column: SortColumn::Likes,
            direction: SortDirection::Ascending,
        };
        // b (absent) and c (0) tie; stable order keeps b first
        assert_eq!(ids(&sort(&[a, b, c], state)), vec![2, 3, 1]);
    }

    #[test]
    fn test_descending_sort_is_stable_for_ties() {
        let records = vec![
            broadcast(1, "2019-01-01", "x", "s"),
            broadcast(2, "2019-01-01", "y", "s"),
            broadcast(3, "2019-02-01", "z", "s"),
        ];
        let state = SortState::new(SortColumn::Date);
        assert_eq!(ids(&sort(&records, state)), vec![3, 1, 2]);
    }

    #[test]
    fn test_toggle_same_column_flips() {
        let state = SortState::new(SortColumn::Date);
        let once = state.toggle(SortColumn::Date);
        assert_eq!(once.direction, SortDirection::Ascending);
        assert_eq!(once.toggle(SortColumn::Date), state);
    }

    #[test]
    fn test_toggle_new_column_resets_descending() {
        let state = SortState {
            column: SortColumn::Date,
            direction: SortDirection::Ascending,
        };
        let next = state.toggle(SortColumn::Title);
        assert_eq!(next.column, SortColumn::Title);
        assert_eq!(next.direction, SortDirection::Descending);
    }

    #[test]
    fn test_sort_state_from_params() {
        assert_eq!(SortState::from_params(Some("bogus"), Some("asc")), None);
        assert_eq!(SortState::from_params(None, Some("asc")), None);
        let s = SortState::from_params(Some("Views"), Some("nonsense")).unwrap();
        assert_eq!(s.column, SortColumn::Views);
        assert_eq!(s.direction, SortDirection::Descending);
        let s = SortState::from_params(Some("date"), Some("ASC")).unwrap();
        assert_eq!(s.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_group_by_series_orders_groups_and_members() {
        let records = vec![
            broadcast(9, "2019-01-01", "a", "2. Later"),
            broadcast(4, "2019-01-01", "b", "1. First"),
            broadcast(2, "2019-01-01", "c", "2. Later"),
        ];
        let groups = group_by_series(&records);
        let keys: Vec<&String> = groups.keys().collect();
        assert_eq!(keys, vec!["1. First", "2. Later"]);
        assert_eq!(ids(&groups["2. Later"]), vec![2, 9]);
    }

    #[test]
    fn test_group_by_series_empty() {
        let groups = group_by_series::<Broadcast>(&[]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_filter_by_topic() {
        let records = vec![
            hypothesis(1, 1, "A", 0.1),
            hypothesis(2, 1, "B", 0.2),
            hypothesis(3, 2, "A", 0.3),
            hypothesis(4, 2, "B", 0.4),
            hypothesis(5, 3, "B", 0.5),
        ];
        let b = filter_by_topic(&records, Some("B"));
        assert_eq!(b.len(), 3);
        assert!(b.iter().all(|h| h.topic == "B"));
        assert_eq!(filter_by_topic(&records, Some("")).len(), 5);
        assert_eq!(filter_by_topic(&records, None).len(), 5);
    }

    #[test]
    fn test_filter_by_episode() {
        let records = vec![hypothesis(1, 10, "A", 0.1), hypothesis(2, 11, "A", 0.2)];
        assert_eq!(filter_by_episode(&records, None), records);
        let only = filter_by_episode(&records, Some(11));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].id, 2);
        assert!(filter_by_episode(&records, Some(404)).is_empty());
    }

    #[test]
    fn test_sort_hypotheses_by_confidence() {
        let records = vec![
            hypothesis(1, 1, "A", 0.2),
            hypothesis(2, 1, "A", 0.9),
            hypothesis(3, 1, "A", 0.5),
        ];
        let sorted = sort(&records, SortState::new(SortColumn::Confidence));
        let ids: Vec<i64> = sorted.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_filter_by_text_matches_title_or_description() {
        let make = |title: &str, description: &str| SearchResult {
            title: title.to_string(),
            series: "s".to_string(),
            description: description.to_string(),
            source_url: String::new(),
            duration: 0,
        };
        let records = vec![
            make("Rust in Production", "war stories"),
            make("Gardening", "soil and RUST on tools"),
            make("Cooking", "pasta"),
        ];
        assert_eq!(filter_by_text(&records, Some("rust")).len(), 2);
        assert_eq!(filter_by_text(&records, Some("   ")).len(), 3);
        assert_eq!(filter_by_text(&records, None).len(), 3);
        assert!(filter_by_text(&records, Some("opera")).is_empty());
    }

    #[test]
    fn test_filter_by_text_keeps_surrounding_whitespace() {
        let make = |title: &str| SearchResult {
            title: title.to_string(),
            series: "s".to_string(),
            description: String::new(),
            source_url: String::new(),
            duration: 0,
        };
        let records = vec![make("Trust the Process"), make("A Rust Primer")];
        assert_eq!(filter_by_text(&records, Some("rust")).len(), 2);

        let spaced = filter_by_text(&records, Some(" rust"));
        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced[0].title, "A Rust Primer");
    }

    #[test]
    fn test_topic_counts_sorted() {
        let records = vec![
            hypothesis(1, 1, "B", 0.1),
            hypothesis(2, 1, "A", 0.1),
            hypothesis(3, 1, "B", 0.1),
        ];
        let counts = topic_counts(&records);
        assert_eq!(
            counts,
            vec![
                TopicCount { topic: "A".to_string(), count: 1 },
                TopicCount { topic: "B".to_string(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_assign_colors_cycles() {
        let labels: Vec<String> = (0..12).map(|i| format!("t{:02}", i)).collect();
        let colors = assign_colors(labels.iter().map(String::as_str));
        assert_eq!(colors.len(), 12);
        assert_eq!(colors["t00"], PALETTE[0]);
        assert_eq!(colors["t10"], PALETTE[0]);
        assert_eq!(colors["t11"], PALETTE[1]);
    }
}
