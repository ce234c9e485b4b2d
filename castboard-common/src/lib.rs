//! # castboard Common Library
//!
//! Shared code for the castboard podcast companion site:
//! - Record types (broadcasts, hypotheses, comments, search results)
//! - Read-only record store loaded once at startup
//! - Query engine (grouping, sorting, filtering)
//! - Scatter plot coordinate mapping
//! - Latest-wins sequenced commit slot
//! - Vendor feed normalization
//! - Configuration loading

pub mod config;
pub mod duration;
pub mod error;
pub mod plot;
pub mod query;
pub mod records;
pub mod sequence;
pub mod store;
pub mod vendor;
pub mod views;

pub use error::{Error, Result};
pub use records::{Broadcast, Comment, Hypothesis, SearchResult, Summary};
pub use store::RecordStore;
