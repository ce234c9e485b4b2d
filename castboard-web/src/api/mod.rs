//! HTTP API handlers for castboard-web

pub mod broadcasts;
pub mod buildinfo;
pub mod comments;
pub mod health;
pub mod hypotheses;
pub mod search;

pub use broadcasts::{get_broadcast, list_broadcasts, sync_broadcasts};
pub use buildinfo::get_build_info;
pub use comments::{comment_scatter, list_comments};
pub use health::health_routes;
pub use hypotheses::{hypothesis_scatter, list_hypotheses, list_topics};
pub use search::{get_live_search, search, start_live_search};
