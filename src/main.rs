//! PPC keyword bot
//!
//! A Telegram bot that walks a user through a short intake questionnaire
//! and answers with PPC keyword suggestions built from their answers and
//! current search trends.

mod config;
mod gateway;
mod keywords;
mod llm;
mod oracle;
mod runtime;
mod state_machine;
mod trends;

use config::AppConfig;
use gateway::{TelegramOutbox, TelegramRuntime};
use keywords::KeywordGenerator;
use llm::{LlmService, LoggingService, OpenAIService};
use oracle::AnswerOracle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use teloxide::Bot;
use trends::{GoogleTrendsSource, ScrapingBeeClient, TrendFetcher};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ppc_keyword_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    // Shared client for the trend integrations
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let trend_source = GoogleTrendsSource::new(http.clone(), &config.trends_hl, config.trends_tz);
    let fetcher = TrendFetcher::new(Arc::new(trend_source))
        .with_retry(config.trend_max_attempts, config.trend_retry_delay);
    let keywords = KeywordGenerator::new(fetcher, StdRng::from_entropy());

    if config.scrapingbee_api_key.is_none() {
        tracing::warn!("SCRAPINGBEE_API_KEY not set; PPC trends will use the built-in list");
    }
    let ppc_trends = Arc::new(ScrapingBeeClient::new(
        http.clone(),
        config.scrapingbee_api_key.clone(),
    ));

    let llm: Option<Arc<dyn LlmService>> = match config.llm_api_key() {
        Some(api_key) => {
            let llm_http = reqwest::Client::builder()
                .timeout(config.llm_http_timeout())
                .build()?;
            let service = OpenAIService::new(
                llm_http,
                api_key,
                config.openai_model.clone(),
                config.llm_gateway.as_deref(),
            );
            tracing::info!(model = %config.openai_model, "Answer oracle enabled");
            Some(Arc::new(LoggingService::new(Arc::new(service))) as Arc<dyn LlmService>)
        }
        None => {
            tracing::warn!("No LLM API key configured. Set OPENAI_API_KEY or LLM_GATEWAY.");
            None
        }
    };
    let oracle = AnswerOracle::new(llm).with_limits(config.oracle_max_tokens, config.oracle_timeout);

    let bot = Bot::new(&config.telegram_token);
    let runtime: Arc<TelegramRuntime> = Arc::new(TelegramRuntime::new(
        keywords,
        ppc_trends,
        oracle,
        TelegramOutbox::new(bot.clone()),
    ));

    gateway::run(bot, runtime).await;

    Ok(())
}
