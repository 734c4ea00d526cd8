//! Common types for LLM interactions

/// Single-turn LLM request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmRequest {
    pub prompt: String,
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn user(prompt: impl Into<String>, max_tokens: Option<u32>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// LLM response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    pub content: Option<String>,
    pub usage: Usage,
}

impl LlmResponse {
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            usage: Usage::default(),
        }
    }

    /// Text content, trimmed; empty when the model returned none
    pub fn text(&self) -> &str {
        self.content.as_deref().map_or("", str::trim)
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
