//! Trend data: related search queries and the latest PPC trends
//!
//! `TrendSource` is the seam to the external related-queries service.
//! `TrendFetcher` wraps a source with bounded retry and never fails: once
//! the attempts are exhausted it returns an empty term list so keyword
//! generation can proceed with the static templates alone.

mod google;
mod scraper;

pub use google::GoogleTrendsSource;
pub use scraper::{PpcTrendsLookup, ScrapingBeeClient};

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// One related search query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelatedQuery {
    pub query: String,
}

impl RelatedQuery {
    #[cfg(test)]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Related queries keyed by the term they were requested for
pub type RelatedQueries = HashMap<String, Vec<RelatedQuery>>;

/// Transient failure from a trend source. All kinds are retried alike.
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Rate limited by trend source")]
    RateLimited,
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse trend response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TrendError {
    fn from(e: reqwest::Error) -> Self {
        TrendError::Network(e.to_string())
    }
}

/// External service returning related queries for a set of terms
#[async_trait]
pub trait TrendSource: Send + Sync {
    async fn related_queries(
        &self,
        terms: &[String],
        location: &str,
    ) -> Result<RelatedQueries, TrendError>;
}

#[async_trait]
impl<T: TrendSource + ?Sized> TrendSource for Arc<T> {
    async fn related_queries(
        &self,
        terms: &[String],
        location: &str,
    ) -> Result<RelatedQueries, TrendError> {
        (**self).related_queries(terms, location).await
    }
}

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Retrying adapter over a `TrendSource`
pub struct TrendFetcher {
    source: Arc<dyn TrendSource>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl TrendFetcher {
    pub fn new(source: Arc<dyn TrendSource>) -> Self {
        Self {
            source,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Related queries for `industry` followed by those for `objective`.
    ///
    /// Waits `retry_delay` between failed attempts; returns an empty list
    /// once `max_attempts` have failed.
    pub async fn fetch(&self, industry: &str, objective: &str, location: &str) -> Vec<String> {
        let terms = vec![industry.to_string(), objective.to_string()];

        for attempt in 1..=self.max_attempts {
            let start = Instant::now();
            match self.source.related_queries(&terms, location).await {
                Ok(related) => {
                    let mut queries = Vec::new();
                    for term in &terms {
                        let found = related.get(term).map(Vec::as_slice).unwrap_or_default();
                        if found.is_empty() {
                            tracing::warn!(term = %term, location = %location, "No related queries found");
                        }
                        queries.extend(found.iter().map(|q| q.query.clone()));
                    }
                    tracing::info!(
                        attempt,
                        duration_ms = %start.elapsed().as_millis(),
                        count = queries.len(),
                        "Fetched related queries"
                    );
                    return queries;
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        duration_ms = %start.elapsed().as_millis(),
                        error = %e,
                        "Related queries request failed"
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        tracing::error!(
            attempts = self.max_attempts,
            "Failed to fetch trends after retries, continuing without them"
        );
        Vec::new()
    }
}
