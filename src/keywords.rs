//! Keyword assembly
//!
//! Keywords are eight templated phrases built from the industry, objective
//! and location answers, followed by every trending related query, followed
//! by up to three of those queries again, sampled without replacement.

#[cfg(test)]
mod proptests;

use crate::trends::TrendFetcher;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Number of templated keywords in every result
#[cfg(test)]
pub const TEMPLATE_KEYWORD_COUNT: usize = 8;

/// Upper bound on the extra trend queries sampled at the end
pub const BONUS_SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordError {
    #[error("{0} is required to generate keywords.")]
    MissingField(&'static str),
}

/// Validated keyword generation input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRequest {
    industry: String,
    objective: String,
    location: String,
}

impl KeywordRequest {
    /// Trim all three fields and reject any that end up empty
    pub fn new(industry: &str, objective: &str, location: &str) -> Result<Self, KeywordError> {
        Ok(Self {
            industry: required(industry, "Industry")?,
            objective: required(objective, "Objective")?,
            location: required(location, "Location")?,
        })
    }

    pub fn industry(&self) -> &str {
        &self.industry
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

fn required(value: &str, field: &'static str) -> Result<String, KeywordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(KeywordError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// The eight templated keywords: four about the industry in the location,
/// then four about the objective within the industry
pub fn template_keywords(request: &KeywordRequest) -> Vec<String> {
    let KeywordRequest {
        industry,
        objective,
        location,
    } = request;

    vec![
        format!("{industry} trends {location}"),
        format!("{industry} growth in {location}"),
        format!("top {industry} opportunities in {location}"),
        format!("best {industry} services in {location}"),
        format!("{objective} strategies for {industry}"),
        format!("{objective} optimization in {industry}"),
        format!("successful {objective} for {industry}"),
        format!("boosting {objective} in {industry}"),
    ]
}

/// Assemble the final keyword list.
///
/// Appends `min(3, trends.len())` queries sampled uniformly without
/// replacement from `trends`, so an empty or short trend list never fails.
pub fn assemble_keywords<R: Rng + ?Sized>(
    request: &KeywordRequest,
    trends: &[String],
    rng: &mut R,
) -> Vec<String> {
    let mut keywords = template_keywords(request);
    keywords.reserve(trends.len() + BONUS_SAMPLE_SIZE);
    keywords.extend_from_slice(trends);
    keywords.extend(trends.choose_multiple(rng, BONUS_SAMPLE_SIZE).cloned());
    keywords
}

/// Validates input, fetches trends, and assembles keywords
pub struct KeywordGenerator {
    fetcher: TrendFetcher,
    rng: Mutex<StdRng>,
}

impl KeywordGenerator {
    pub fn new(fetcher: TrendFetcher, rng: StdRng) -> Self {
        Self {
            fetcher,
            rng: Mutex::new(rng),
        }
    }

    /// Generate keywords. Missing fields are rejected before any trend
    /// request is made; trend failures only shorten the result.
    pub async fn generate(
        &self,
        industry: &str,
        objective: &str,
        location: &str,
    ) -> Result<Vec<String>, KeywordError> {
        let request = KeywordRequest::new(industry, objective, location)?;

        let trends = self
            .fetcher
            .fetch(request.industry(), request.objective(), request.location())
            .await;

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let keywords = assemble_keywords(&request, &trends, &mut *rng);

        tracing::info!(
            industry = %request.industry(),
            objective = %request.objective(),
            location = %request.location(),
            trend_count = trends.len(),
            keyword_count = keywords.len(),
            "Generated keywords"
        );
        Ok(keywords)
    }
}
