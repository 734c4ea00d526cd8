//! Bot runtime executor

use super::sessions::SessionStore;
use super::traits::{GatewayError, Outbox};
use crate::keywords::KeywordGenerator;
use crate::oracle::AnswerOracle;
use crate::state_machine::{transition, Effect, Event, Prompt};
use crate::trends::PpcTrendsLookup;
use std::sync::Arc;
use std::time::Instant;

pub const NO_PPC_TRENDS: &str = "No trends available at the moment. Please try again later.";

/// Runs transitions for incoming events and executes their effects.
///
/// Generic over the outbox so tests can record replies instead of sending
/// them to Telegram.
pub struct BotRuntime<O: Outbox> {
    sessions: SessionStore,
    keywords: KeywordGenerator,
    ppc_trends: Arc<dyn PpcTrendsLookup>,
    oracle: AnswerOracle,
    outbox: O,
}

impl<O: Outbox> BotRuntime<O> {
    pub fn new(
        keywords: KeywordGenerator,
        ppc_trends: Arc<dyn PpcTrendsLookup>,
        oracle: AnswerOracle,
        outbox: O,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            keywords,
            ppc_trends,
            oracle,
            outbox,
        }
    }

    #[cfg(test)]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one inbound event from `user_id` in `chat_id`.
    ///
    /// The session lock is held only for the transition itself; effects
    /// run after it is released, so slow lookups never block the user's
    /// next message from being recorded.
    pub async fn handle(&self, user_id: i64, chat_id: i64, event: Event) {
        if let Event::Choice(choice) = &event {
            tracing::debug!(user_id, token = %choice.token(), "Button choice");
        }

        let effects = {
            let handle = self.sessions.handle(user_id).await;
            let mut session = handle.lock().await;
            let from = session.step;
            let result = transition(&session, event);
            tracing::info!(
                user_id,
                from = %from,
                to = %result.session.step,
                effects = result.effects.len(),
                "Session transition"
            );
            *session = result.session;
            debug_assert!(session.has_required_answers(), "{session:?}");
            result.effects
        };

        for effect in effects {
            if let Err(e) = self.execute_effect(chat_id, effect).await {
                tracing::error!(user_id, chat_id, error = %e, "Failed to deliver reply");
            }
        }
    }

    async fn execute_effect(&self, chat_id: i64, effect: Effect) -> Result<(), GatewayError> {
        match effect {
            Effect::Reply(prompt) => self.outbox.send(chat_id, &prompt).await,

            Effect::GenerateKeywords {
                industry,
                objective,
                location,
            } => {
                let start = Instant::now();
                let text = match self.keywords.generate(&industry, &objective, &location).await {
                    Ok(keywords) => format_keywords(&keywords),
                    Err(e) => {
                        tracing::warn!(error = %e, "Keyword generation rejected");
                        format!("Error: {e}")
                    }
                };
                tracing::debug!(duration_ms = %start.elapsed().as_millis(), "Keyword effect finished");
                self.outbox.send(chat_id, &Prompt::text(text)).await
            }

            Effect::FetchPpcTrends => {
                let trends = self.ppc_trends.latest_trends().await;
                self.outbox
                    .send(chat_id, &Prompt::text(format_ppc_trends(&trends)))
                    .await
            }

            Effect::AskOracle { question } => {
                let answer = self.oracle.answer(&question).await;
                self.outbox.send(chat_id, &Prompt::text(answer)).await
            }
        }
    }
}

fn format_keywords(keywords: &[String]) -> String {
    format!("Generated Keywords: {}", keywords.join(", "))
}

fn format_ppc_trends(trends: &[String]) -> String {
    if trends.is_empty() {
        NO_PPC_TRENDS.to_string()
    } else {
        format!("Latest PPC Trends:\n{}", trends.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmResponse, LlmService};
    use crate::runtime::testing::{MockLlmService, MockTrendSource, RecordingOutbox, StaticPpcTrends};
    use crate::state_machine::event::{Choice, Command};
    use crate::state_machine::prompts;
    use crate::state_machine::state::Step;
    use crate::trends::{RelatedQuery, TrendFetcher};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::time::Duration;

    const USER: i64 = 1001;
    const CHAT: i64 = 5005;

    struct Harness {
        runtime: BotRuntime<Arc<RecordingOutbox>>,
        outbox: Arc<RecordingOutbox>,
        source: Arc<MockTrendSource>,
        llm: Arc<MockLlmService>,
    }

    fn harness(ppc_trends: Vec<String>) -> Harness {
        let source = Arc::new(MockTrendSource::new());
        let llm = Arc::new(MockLlmService::new("gpt-3.5-turbo"));
        let outbox = Arc::new(RecordingOutbox::new());

        let keywords = KeywordGenerator::new(
            TrendFetcher::new(source.clone()).with_retry(2, Duration::from_secs(2)),
            StdRng::seed_from_u64(11),
        );
        let runtime = BotRuntime::new(
            keywords,
            Arc::new(StaticPpcTrends::new(ppc_trends)),
            AnswerOracle::new(Some(llm.clone() as Arc<dyn LlmService>)),
            outbox.clone(),
        );

        Harness {
            runtime,
            outbox,
            source,
            llm,
        }
    }

    fn text(s: &str) -> Event {
        Event::Text(s.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_generates_keywords() {
        let h = harness(vec![]);
        h.source.queue_response(HashMap::from([(
            "Retail".to_string(),
            vec![RelatedQuery::new("retail news")],
        )]));

        let events = [
            Event::Command(Command::Analyze),
            text("Retail"),
            text("Sales"),
            Event::Choice(Choice::Website(false)),
            Event::Choice(Choice::SocialMedia(false)),
            Event::Choice(Choice::PpcCampaigns(false)),
            text("Professionals"),
            text("USA"),
        ];
        for event in events {
            h.runtime.handle(USER, CHAT, event).await;
        }

        let session = h.runtime.sessions().snapshot(USER).await.unwrap();
        assert_eq!(session.step, Step::None);
        assert_eq!(session.answers.location.as_deref(), Some("USA"));

        assert_eq!(
            h.source.recorded_calls(),
            vec![(vec!["Retail".to_string(), "Sales".to_string()], "USA".to_string())]
        );

        let texts = h.outbox.texts_for(CHAT);
        let n = texts.len();
        assert_eq!(texts[n - 2], prompts::GENERATING);
        assert!(
            texts[n - 1].starts_with("Generated Keywords: Retail trends USA, Retail growth in USA"),
            "{}",
            texts[n - 1]
        );
        assert!(texts[n - 1].contains("retail news"));
    }

    #[tokio::test]
    async fn test_analyze_prompts_for_industry_with_no_keyboard() {
        let h = harness(vec![]);
        h.runtime.handle(USER, CHAT, Event::Command(Command::Analyze)).await;

        let sent = h.outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, CHAT);
        assert_eq!(Some(sent[0].1.clone()), prompts::prompt_for(Step::Industry));
    }

    #[tokio::test]
    async fn test_empty_industry_reprompts() {
        let h = harness(vec![]);
        h.runtime.handle(USER, CHAT, Event::Command(Command::Analyze)).await;
        h.runtime.handle(USER, CHAT, text("   ")).await;

        let session = h.runtime.sessions().snapshot(USER).await.unwrap();
        assert_eq!(session.step, Step::Industry);
        assert_eq!(session.answers.industry, None);

        let texts = h.outbox.texts_for(CHAT);
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[1], "Industry cannot be empty. Please provide a valid input.");
        assert_eq!(texts[2], texts[0]);
    }

    #[tokio::test]
    async fn test_missing_industry_reports_error_and_returns_to_idle() {
        let h = harness(vec![]);
        {
            let handle = h.runtime.sessions().handle(USER).await;
            let mut session = handle.lock().await;
            session.step = Step::Location;
            session.answers.industry = Some("   ".to_string());
            session.answers.objective = Some("Sales".to_string());
        }

        h.runtime.handle(USER, CHAT, text("USA")).await;

        assert_eq!(
            h.outbox.texts_for(CHAT),
            vec![
                prompts::GENERATING.to_string(),
                "Error: Industry is required to generate keywords.".to_string(),
            ]
        );
        assert_eq!(h.source.call_count(), 0);

        let session = h.runtime.sessions().snapshot(USER).await.unwrap();
        assert_eq!(session.step, Step::None);
        assert_eq!(session.answers.location.as_deref(), Some("USA"));
    }

    #[tokio::test]
    async fn test_ppc_trends_reply() {
        let h = harness(vec!["Smart bidding".to_string(), "Video ads".to_string()]);
        h.runtime.handle(USER, CHAT, Event::Command(Command::Trends)).await;

        assert_eq!(
            h.outbox.texts_for(CHAT),
            vec!["Latest PPC Trends:\nSmart bidding\nVideo ads"]
        );
    }

    #[tokio::test]
    async fn test_empty_ppc_trends_reply() {
        let h = harness(vec![]);
        h.runtime.handle(USER, CHAT, Event::Command(Command::Trends)).await;
        assert_eq!(h.outbox.texts_for(CHAT), vec![NO_PPC_TRENDS]);
    }

    #[tokio::test]
    async fn test_question_is_answered_without_touching_session() {
        let h = harness(vec![]);
        h.llm.queue_response(LlmResponse::from_text("Pay per click."));

        h.runtime.handle(USER, CHAT, Event::Command(Command::Analyze)).await;
        h.runtime
            .handle(
                USER,
                CHAT,
                Event::Command(Command::Ask {
                    question: "What is PPC?".to_string(),
                }),
            )
            .await;

        assert_eq!(h.outbox.texts_for(CHAT).last().map(String::as_str), Some("Pay per click."));
        let session = h.runtime.sessions().snapshot(USER).await.unwrap();
        assert_eq!(session.step, Step::Industry);
    }

    #[tokio::test]
    async fn test_users_progress_independently() {
        let h = harness(vec![]);
        h.runtime.handle(1, 10, Event::Command(Command::Analyze)).await;
        h.runtime.handle(2, 20, Event::Command(Command::Analyze)).await;
        h.runtime.handle(1, 10, text("Retail")).await;

        let first = h.runtime.sessions().snapshot(1).await.unwrap();
        let second = h.runtime.sessions().snapshot(2).await.unwrap();
        assert_eq!(first.step, Step::Objective);
        assert_eq!(second.step, Step::Industry);
        assert_eq!(second.answers.industry, None);
    }

    #[tokio::test]
    async fn test_failed_send_does_not_stop_later_effects() {
        let h = harness(vec!["Smart bidding".to_string()]);
        h.outbox.fail_next_send();

        h.runtime.handle(USER, CHAT, Event::Command(Command::Trends)).await;
        h.runtime.handle(USER, CHAT, Event::Command(Command::Trends)).await;

        assert_eq!(h.outbox.texts_for(CHAT), vec!["Latest PPC Trends:\nSmart bidding"]);
    }

    #[test]
    fn test_format_keywords() {
        let keywords = vec!["a".to_string(), "b c".to_string()];
        assert_eq!(format_keywords(&keywords), "Generated Keywords: a, b c");
    }
}
