//! Effects produced by state transitions

/// A labeled button offered alongside a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceButton {
    pub label: &'static str,
    pub token: &'static str,
}

impl ChoiceButton {
    pub const fn new(label: &'static str, token: &'static str) -> Self {
        Self { label, token }
    }
}

/// Outbound message: plain text, optionally with a set of choice buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub choices: Vec<ChoiceButton>,
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(text: impl Into<String>, choices: &[ChoiceButton]) -> Self {
        Self {
            text: text.into(),
            choices: choices.to_vec(),
        }
    }
}

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a prompt to the user
    Reply(Prompt),

    /// Fetch trends and assemble keywords for the collected answers
    GenerateKeywords {
        industry: String,
        objective: String,
        location: String,
    },

    /// Look up the latest PPC trends
    FetchPpcTrends,

    /// Ask the answer oracle a free-text question
    AskOracle { question: String },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(Prompt::text(text))
    }
}
