//! Remote data providers with timeout and local fallback
//!
//! Two remote calls exist: the vendor broadcast feed (5 s timeout by
//! default) and the search service (30 s). Every failure (network error,
//! timeout, non-2xx status, undecodable body) is logged and replaced by
//! local data; callers never see a transport error.

use std::time::Duration;

use castboard_common::config::SourcesConfig;
use castboard_common::query::filter_by_text;
use castboard_common::vendor;
use castboard_common::{Broadcast, SearchResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("castboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("No remote URL configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Remote returned status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Remote provider answered
    Remote,
    /// No remote configured (or nothing to ask it); local data used directly
    Local,
    /// Remote failed; local data substituted
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct Fetched<T> {
    pub source: DataSource,
    pub data: T,
}

/// Search service payload: bare array or wrapped in `results`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    List(Vec<SearchResult>),
    Wrapped { results: Vec<SearchResult> },
}

/// HTTP client for the remote providers
#[derive(Debug, Clone)]
pub struct Transport {
    http_client: reqwest::Client,
    sources: SourcesConfig,
}

impl Transport {
    pub fn new(sources: SourcesConfig) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            http_client,
            sources,
        })
    }

    pub fn sources(&self) -> &SourcesConfig {
        &self.sources
    }

    fn broadcast_timeout(&self) -> Duration {
        Duration::from_secs(self.sources.broadcast_timeout_secs)
    }

    fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.sources.search_timeout_secs)
    }

    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<String, TransportError> {
        debug!(url = %url, ?timeout, "Remote request");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| classify(e, timeout))
    }

    /// Fetch and normalize the vendor broadcast feed
    pub async fn fetch_vendor_broadcasts(&self) -> Result<Vec<Broadcast>, TransportError> {
        let url = self
            .sources
            .broadcast_sync_url
            .as_deref()
            .ok_or(TransportError::NotConfigured)?;
        let body = self.get_text(url, &[], self.broadcast_timeout()).await?;
        vendor::parse_feed(&body).map_err(|e| TransportError::Parse(e.to_string()))
    }

    /// Vendor broadcasts, or `fallback` when the feed is unavailable
    pub async fn sync_broadcasts(&self, fallback: &[Broadcast]) -> Fetched<Vec<Broadcast>> {
        match self.fetch_vendor_broadcasts().await {
            Ok(broadcasts) => {
                info!(count = broadcasts.len(), "Broadcast sync succeeded");
                Fetched {
                    source: DataSource::Remote,
                    data: broadcasts,
                }
            }
            Err(TransportError::NotConfigured) => Fetched {
                source: DataSource::Local,
                data: fallback.to_vec(),
            },
            Err(e) => {
                warn!("Broadcast sync failed, using sample broadcasts: {}", e);
                Fetched {
                    source: DataSource::Fallback,
                    data: fallback.to_vec(),
                }
            }
        }
    }

    /// Query the remote search service
    pub async fn remote_search(&self, query: &str) -> Result<Vec<SearchResult>, TransportError> {
        let url = self
            .sources
            .search_url
            .as_deref()
            .ok_or(TransportError::NotConfigured)?;
        let body = self
            .get_text(url, &[("q", query)], self.search_timeout())
            .await?;
        let payload: SearchPayload =
            serde_json::from_str(&body).map_err(|e| TransportError::Parse(e.to_string()))?;
        Ok(match payload {
            SearchPayload::List(results) | SearchPayload::Wrapped { results } => results,
        })
    }

    /// Search remotely, falling back to filtering `corpus` locally.
    ///
    /// A blank query is "no filter": the whole local corpus, without a
    /// remote call.
    pub async fn search(&self, query: &str, corpus: &[SearchResult]) -> Fetched<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Fetched {
                source: DataSource::Local,
                data: corpus.to_vec(),
            };
        }
        match self.remote_search(query).await {
            Ok(results) => {
                info!(query = %query, count = results.len(), "Remote search succeeded");
                Fetched {
                    source: DataSource::Remote,
                    data: results,
                }
            }
            Err(TransportError::NotConfigured) => Fetched {
                source: DataSource::Local,
                data: filter_by_text(corpus, Some(query)),
            },
            Err(e) => {
                warn!(query = %query, "Remote search failed, filtering local results: {}", e);
                Fetched {
                    source: DataSource::Fallback,
                    data: filter_by_text(corpus, Some(query)),
                }
            }
        }
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_decode() {
        TransportError::Parse(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}
