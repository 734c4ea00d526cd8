//! Environment configuration
//!
//! Values come from the process environment, which `main` first populates
//! from a `.env` file when one is present. Empty values count as unset.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Placeholder key sent when an LLM gateway handles authentication
const GATEWAY_API_KEY: &str = "implicit";

/// Slack between the oracle deadline and the LLM client's own request timeout
const LLM_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    /// `OpenAI`-compatible gateway base URL
    pub llm_gateway: Option<String>,
    pub oracle_max_tokens: u32,
    pub oracle_timeout: Duration,
    pub scrapingbee_api_key: Option<String>,
    pub trend_max_attempts: u32,
    pub trend_retry_delay: Duration,
    pub http_timeout: Duration,
    pub trends_hl: String,
    pub trends_tz: i32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            telegram_token: get("TELEGRAM_API_TOKEN")
                .ok_or(ConfigError::Missing("TELEGRAM_API_TOKEN"))?,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            llm_gateway: get("LLM_GATEWAY"),
            oracle_max_tokens: parse(get("ORACLE_MAX_TOKENS"), "ORACLE_MAX_TOKENS", 200)?,
            oracle_timeout: Duration::from_secs(parse(
                get("ORACLE_TIMEOUT_SECS"),
                "ORACLE_TIMEOUT_SECS",
                30,
            )?),
            scrapingbee_api_key: get("SCRAPINGBEE_API_KEY"),
            trend_max_attempts: positive(get("TREND_MAX_ATTEMPTS"), "TREND_MAX_ATTEMPTS", 2)?,
            trend_retry_delay: Duration::from_secs(parse(
                get("TREND_RETRY_DELAY_SECS"),
                "TREND_RETRY_DELAY_SECS",
                2,
            )?),
            http_timeout: Duration::from_secs(positive(
                get("HTTP_TIMEOUT_SECS"),
                "HTTP_TIMEOUT_SECS",
                20,
            )?),
            trends_hl: get("TRENDS_HL").unwrap_or_else(|| "en-US".to_string()),
            trends_tz: parse(get("TRENDS_TZ"), "TRENDS_TZ", 360)?,
        })
    }

    /// Key to send to the LLM provider, if the oracle is enabled at all.
    ///
    /// A gateway authenticates on our behalf, so it enables the oracle
    /// even without an `OpenAI` key.
    pub fn llm_api_key(&self) -> Option<String> {
        match (&self.openai_api_key, &self.llm_gateway) {
            (Some(key), _) => Some(key.clone()),
            (None, Some(_)) => Some(GATEWAY_API_KEY.to_string()),
            (None, None) => None,
        }
    }

    /// Request timeout for the LLM client.
    ///
    /// Always outlasts `oracle_timeout` so the oracle reports its own
    /// deadline instead of a transport error.
    pub fn llm_http_timeout(&self) -> Duration {
        self.http_timeout
            .max(self.oracle_timeout.saturating_add(LLM_TIMEOUT_MARGIN))
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram_token", &"<redacted>")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_model", &self.openai_model)
            .field("llm_gateway", &self.llm_gateway)
            .field("oracle_max_tokens", &self.oracle_max_tokens)
            .field("oracle_timeout", &self.oracle_timeout)
            .field(
                "scrapingbee_api_key",
                &self.scrapingbee_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("trend_max_attempts", &self.trend_max_attempts)
            .field("trend_retry_delay", &self.trend_retry_delay)
            .field("http_timeout", &self.http_timeout)
            .field("trends_hl", &self.trends_hl)
            .field("trends_tz", &self.trends_tz)
            .finish()
    }
}

fn parse<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn positive<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Default + PartialEq + fmt::Display,
    T::Err: fmt::Display,
{
    let parsed = parse(value, name, default)?;
    if parsed == T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: parsed.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}
