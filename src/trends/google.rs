//! Google Trends related-queries client
//!
//! Two-step protocol: `explore` returns one widget per requested term with a
//! token, then `widgetdata/relatedsearches` returns the ranked queries for
//! each widget. Both responses carry an anti-JSON-hijacking prefix that is
//! stripped before parsing.

use super::{RelatedQueries, RelatedQuery, TrendError, TrendSource};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://trends.google.com/trends/api";
const TIMEFRAME: &str = "now 1-d";
const RELATED_QUERIES_WIDGET: &str = "RELATED_QUERIES";

/// Related-queries source backed by Google Trends
pub struct GoogleTrendsSource {
    client: Client,
    base_url: String,
    hl: String,
    tz: i32,
}

impl GoogleTrendsSource {
    pub fn new(client: Client, hl: impl Into<String>, tz: i32) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            hl: hl.into(),
            tz,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TrendError> {
        let url = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TrendError::RateLimited);
        }
        if !status.is_success() {
            return Err(TrendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_guarded(&body)
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsSource {
    async fn related_queries(
        &self,
        terms: &[String],
        location: &str,
    ) -> Result<RelatedQueries, TrendError> {
        let geo = geo_code(location);
        let explore_request = json!({
            "comparisonItem": terms
                .iter()
                .map(|term| json!({ "keyword": term, "time": TIMEFRAME, "geo": geo }))
                .collect::<Vec<_>>(),
            "category": 0,
            "property": "",
        });

        let explore: ExploreResponse = self
            .get_json(
                "explore",
                &[
                    ("hl", self.hl.clone()),
                    ("tz", self.tz.to_string()),
                    ("req", explore_request.to_string()),
                ],
            )
            .await?;

        let mut related = RelatedQueries::new();
        for widget in explore
            .widgets
            .into_iter()
            .filter(|w| w.id.starts_with(RELATED_QUERIES_WIDGET))
        {
            let Some(term) = widget_keyword(&widget.request) else {
                tracing::debug!(widget = %widget.id, "Related queries widget without keyword");
                continue;
            };

            let searches: RelatedSearchesResponse = self
                .get_json(
                    "widgetdata/relatedsearches",
                    &[
                        ("hl", self.hl.clone()),
                        ("tz", self.tz.to_string()),
                        ("req", widget.request.to_string()),
                        ("token", widget.token),
                    ],
                )
                .await?;

            // rankedList[0] is "top", rankedList[1] is "rising"
            let top = searches
                .default
                .ranked_list
                .into_iter()
                .next()
                .map(|list| list.ranked_keyword)
                .unwrap_or_default();
            related.insert(term, top);
        }

        Ok(related)
    }
}

/// Map a location answer to a Google Trends geo code.
///
/// Button options and common spellings map to ISO country codes, bare
/// two-letter codes pass through uppercased, anything else queries
/// worldwide (empty geo).
pub fn geo_code(location: &str) -> String {
    let normalized = location.trim().to_lowercase().replace('.', "").replace('_', " ");
    let code = match normalized.trim() {
        "usa" | "us" | "united states" | "united states of america" | "america" => "US",
        "india" | "in" => "IN",
        "uk" | "gb" | "united kingdom" | "great britain" | "england" => "GB",
        "australia" | "au" => "AU",
        "canada" | "ca" => "CA",
        "germany" | "de" => "DE",
        "france" | "fr" => "FR",
        other if other.len() == 2 && other.chars().all(|c| c.is_ascii_alphabetic()) => {
            return other.to_ascii_uppercase();
        }
        _ => "",
    };
    code.to_string()
}

/// Strip the `)]}'` style prefix and parse the JSON payload that follows
fn parse_guarded<T: DeserializeOwned>(body: &str) -> Result<T, TrendError> {
    let start = body
        .find('{')
        .ok_or_else(|| TrendError::Parse("response contains no JSON object".to_string()))?;
    let payload = body.get(start..).unwrap_or_default();
    serde_json::from_str(payload).map_err(|e| TrendError::Parse(e.to_string()))
}

fn widget_keyword(request: &Value) -> Option<String> {
    request
        .pointer("/restriction/complexKeywordsRestriction/keyword/0/value")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<ExploreWidget>,
}

#[derive(Debug, Deserialize)]
struct ExploreWidget {
    id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    request: Value,
}

#[derive(Debug, Deserialize)]
struct RelatedSearchesResponse {
    default: RankedLists,
}

#[derive(Debug, Deserialize)]
struct RankedLists {
    #[serde(rename = "rankedList", default)]
    ranked_list: Vec<RankedList>,
}

#[derive(Debug, Deserialize)]
struct RankedList {
    #[serde(rename = "rankedKeyword", default)]
    ranked_keyword: Vec<RelatedQuery>,
}
