//! Latest PPC trends via the `ScrapingBee` search scraping API

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::{Arc, LazyLock};

const SCRAPINGBEE_ENDPOINT: &str = "https://app.scrapingbee.com/api/v1/";
const SEARCH_URL: &str = "https://www.google.com/search?q=PPC+industry+benchmarks+2024";
const MAX_TRENDS: usize = 5;

pub const FALLBACK_TRENDS: [&str; 3] = [
    "Increase in mobile-first PPC campaigns.",
    "AI tools are automating bidding strategies.",
    "Video ads are becoming more prevalent in PPC.",
];

pub const FETCH_ERROR: &str = "Error fetching PPC trends. Please try again later.";

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h3[^>]*>(.*?)</h3>").expect("valid heading regex"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Source of the latest PPC trend headlines. Never fails: errors are
/// reported as a single explanatory line.
#[async_trait]
pub trait PpcTrendsLookup: Send + Sync {
    async fn latest_trends(&self) -> Vec<String>;
}

#[async_trait]
impl<T: PpcTrendsLookup + ?Sized> PpcTrendsLookup for Arc<T> {
    async fn latest_trends(&self) -> Vec<String> {
        (**self).latest_trends().await
    }
}

/// `ScrapingBee`-backed lookup with a built-in fallback list
pub struct ScrapingBeeClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl ScrapingBeeClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            endpoint: SCRAPINGBEE_ENDPOINT.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch_html(&self, api_key: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .query(&[
                ("api_key", api_key),
                ("url", SEARCH_URL),
                ("custom_google", "true"),
                ("render_js", "false"),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl PpcTrendsLookup for ScrapingBeeClient {
    async fn latest_trends(&self) -> Vec<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("SCRAPINGBEE_API_KEY not set, serving fallback trends");
            return fallback_trends();
        };

        match self.fetch_html(api_key).await {
            Ok(html) => {
                let trends = extract_trends(&html);
                if trends.is_empty() {
                    tracing::info!(bytes = html.len(), "No trends found in page, serving fallback");
                    fallback_trends()
                } else {
                    trends
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching PPC trends");
                vec![FETCH_ERROR.to_string()]
            }
        }
    }
}

pub fn fallback_trends() -> Vec<String> {
    FALLBACK_TRENDS.iter().map(ToString::to_string).collect()
}

/// Result headings from a search results page, tags stripped, deduplicated
fn extract_trends(html: &str) -> Vec<String> {
    let mut trends: Vec<String> = Vec::new();
    for captures in HEADING.captures_iter(html) {
        let inner = captures.get(1).map_or("", |m| m.as_str());
        let text = decode_entities(&TAG.replace_all(inner, " "));
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() && !trends.contains(&text) {
            trends.push(text);
        }
        if trends.len() == MAX_TRENDS {
            break;
        }
    }
    trends
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
