//! Mock implementations for testing
//!
//! These mocks enable testing the runtime and adapters without real I/O.

use super::traits::{GatewayError, Outbox};
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::state_machine::Prompt;
use crate::trends::{PpcTrendsLookup, RelatedQueries, TrendError, TrendSource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock Trend Source
// ============================================================================

/// Trend source that returns queued results, failing once the queue is empty
pub struct MockTrendSource {
    responses: Mutex<VecDeque<Result<RelatedQueries, TrendError>>>,
    calls: Mutex<Vec<(Vec<String>, String)>>,
}

impl MockTrendSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_response(&self, response: RelatedQueries) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_error(&self, error: TrendError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every `(terms, location)` pair requested so far
    pub fn recorded_calls(&self) -> Vec<(Vec<String>, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrendSource for MockTrendSource {
    async fn related_queries(
        &self,
        terms: &[String],
        location: &str,
    ) -> Result<RelatedQueries, TrendError> {
        self.calls
            .lock()
            .unwrap()
            .push((terms.to_vec(), location.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TrendError::Network("No mock response queued".to_string())))
    }
}

// ============================================================================
// Mock LLM Service
// ============================================================================

/// LLM service that returns queued responses
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    delay: Option<Duration>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering, to exercise timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Static PPC Trends
// ============================================================================

/// PPC trends lookup with a fixed answer
pub struct StaticPpcTrends {
    trends: Vec<String>,
}

impl StaticPpcTrends {
    pub fn new(trends: Vec<String>) -> Self {
        Self { trends }
    }
}

#[async_trait]
impl PpcTrendsLookup for StaticPpcTrends {
    async fn latest_trends(&self) -> Vec<String> {
        self.trends.clone()
    }
}

// ============================================================================
// Recording Outbox
// ============================================================================

/// Outbox that records every prompt instead of sending it
pub struct RecordingOutbox {
    sent: Mutex<Vec<(i64, Prompt)>>,
    fail_next: AtomicBool,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next send fail without recording it
    pub fn fail_next_send(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(i64, Prompt)> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts delivered to `chat_id`, in order
    pub fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(chat, _)| *chat == chat_id)
            .map(|(_, prompt)| prompt.text.clone())
            .collect()
    }
}

#[async_trait]
impl Outbox for RecordingOutbox {
    async fn send(&self, chat_id: i64, prompt: &Prompt) -> Result<(), GatewayError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Send {
                chat_id,
                message: "simulated delivery failure".to_string(),
            });
        }
        self.sent.lock().unwrap().push((chat_id, prompt.clone()));
        Ok(())
    }
}
