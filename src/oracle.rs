//! Free-form PPC questions answered by an LLM
//!
//! Every outcome is a reply string: failures and timeouts are reported as
//! `An error occurred: ...` instead of propagating.

use crate::llm::{LlmError, LlmRequest, LlmService};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AnswerOracle {
    llm: Option<Arc<dyn LlmService>>,
    max_tokens: u32,
    timeout: Duration,
}

impl AnswerOracle {
    /// `None` means no provider is configured; questions get an error reply
    pub fn new(llm: Option<Arc<dyn LlmService>>) -> Self {
        Self {
            llm,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_limits(mut self, max_tokens: u32, timeout: Duration) -> Self {
        self.max_tokens = max_tokens;
        self.timeout = timeout;
        self
    }

    pub async fn answer(&self, question: &str) -> String {
        match self.try_answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e.message, kind = ?e.kind, "Question could not be answered");
                format!("An error occurred: {}", e.message)
            }
        }
    }

    async fn try_answer(&self, question: &str) -> Result<String, LlmError> {
        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| LlmError::auth("OPENAI_API_KEY is not configured"))?;

        let request = LlmRequest::user(question.trim(), Some(self.max_tokens));
        let response = timeout(self.timeout, llm.complete(&request))
            .await
            .map_err(|_| LlmError::timeout(format!("No answer within {}s", self.timeout.as_secs())))??;

        match response.text() {
            "" => Err(LlmError::unknown("The model returned an empty answer")),
            text => Ok(text.to_string()),
        }
    }
}
