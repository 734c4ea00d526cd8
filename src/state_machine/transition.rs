//! Pure state transition function
//!
//! Given the same session and event, `transition` always produces the same
//! next session and effects. It performs no I/O; the runtime executes the
//! returned effects.

use super::effect::{Effect, Prompt};
use super::event::{Choice, Command, Event};
use super::prompts::{self, prompt_for};
use super::state::{Answers, Session, Step};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Append the question for `step`, if it has one
    fn with_prompt_for(self, step: Step) -> Self {
        match prompt_for(step) {
            Some(prompt) => self.with_effect(Effect::Reply(prompt)),
            None => self,
        }
    }
}

/// Rejected user input at a questionnaire step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty. Please provide a valid input.")]
    Empty { field: &'static str },
    #[error("Please provide a valid URL starting with http or https.")]
    WebsiteUrl,
    #[error("Please provide valid social media URL(s) starting with http or https.")]
    SocialMediaUrl,
    #[error("Please reply with 'Yes' or 'No'.")]
    YesNo,
}

/// Pure transition function
#[allow(clippy::too_many_lines)] // One arm per step and input kind
pub fn transition(session: &Session, event: Event) -> TransitionResult {
    match (session.step, event) {
        // ============================================================
        // Commands (accepted at any step)
        // ============================================================
        (_, Event::Command(Command::Analyze)) => start_intake(None),

        (_, Event::Command(Command::GenerateKeywords)) => start_intake(Some(prompts::FOLLOW_STEPS)),

        (_, Event::Command(Command::Start)) => unchanged(session).with_effect(Effect::Reply(
            Prompt::with_choices(prompts::WELCOME, prompts::WELCOME_BUTTONS),
        )),

        (_, Event::Command(Command::Menu)) => unchanged(session).with_effect(Effect::Reply(
            Prompt::with_choices(prompts::MENU, prompts::MENU_BUTTONS),
        )),

        (_, Event::Command(Command::Trends)) => {
            unchanged(session).with_effect(Effect::FetchPpcTrends)
        }

        (_, Event::Command(Command::Help)) => {
            unchanged(session).with_effect(Effect::reply(prompts::ASK_HINT))
        }

        (_, Event::Command(Command::Ask { question })) => {
            let question = question.trim();
            if question.is_empty() {
                unchanged(session).with_effect(Effect::reply(prompts::EMPTY_QUESTION))
            } else {
                unchanged(session).with_effect(Effect::AskOracle {
                    question: question.to_string(),
                })
            }
        }

        // ============================================================
        // Questionnaire
        // ============================================================
        (Step::Industry, Event::Text(text)) => match required(&text, "Industry") {
            Ok(industry) => advance(session, Step::Objective, |a| a.industry = Some(industry)),
            Err(e) => reject(session, &e),
        },

        (Step::Objective, Event::Text(text)) => match required(&text, "Objective") {
            Ok(objective) => advance(session, Step::Website, |a| a.objective = Some(objective)),
            Err(e) => reject(session, &e),
        },

        (Step::Website, Event::Choice(Choice::Website(yes))) => {
            let next = if yes { Step::WebsiteUrl } else { Step::SocialMedia };
            advance(session, next, |a| a.website = Some(yes))
        }

        (Step::WebsiteUrl, Event::Text(text)) => match url(&text, ValidationError::WebsiteUrl) {
            Ok(website_url) => {
                advance(session, Step::SocialMedia, |a| a.website_url = Some(website_url))
            }
            Err(e) => reject(session, &e),
        },

        (Step::SocialMedia, Event::Choice(Choice::SocialMedia(yes))) => {
            let next = if yes {
                Step::SocialMediaUrl
            } else {
                Step::PpcCampaigns
            };
            advance(session, next, |a| a.social_media = Some(yes))
        }

        (Step::SocialMediaUrl, Event::Text(text)) => {
            match url(&text, ValidationError::SocialMediaUrl) {
                Ok(social_media_url) => advance(session, Step::PpcCampaigns, |a| {
                    a.social_media_url = Some(social_media_url);
                }),
                Err(e) => reject(session, &e),
            }
        }

        (Step::PpcCampaigns, Event::Choice(Choice::PpcCampaigns(yes))) => {
            let next = if yes {
                Step::PpcPermission
            } else {
                Step::TargetAudience
            };
            advance(session, next, |a| a.ppc_campaigns = Some(yes))
        }

        (Step::PpcPermission, Event::Text(text)) => match yes_no(&text) {
            Ok(permission) => advance(session, Step::TargetAudience, |a| {
                a.ppc_permission = Some(permission);
            }),
            Err(e) => reject(session, &e),
        },

        (Step::TargetAudience, Event::Text(text)) => match required(&text, "Target audience") {
            Ok(audience) => advance(session, Step::Location, |a| a.target_audience = Some(audience)),
            Err(e) => reject(session, &e),
        },

        (Step::TargetAudience, Event::Choice(Choice::Audience(audience))) => {
            advance(session, Step::Location, |a| a.target_audience = Some(audience))
        }

        (Step::Location, Event::Text(text)) => match required(&text, "Location") {
            Ok(location) => finish(session, location),
            Err(e) => reject(session, &e),
        },

        (Step::Location, Event::Choice(Choice::Location(location))) => finish(session, location),

        // ============================================================
        // Anything else
        // ============================================================
        (_, Event::Unrecognized(_)) => unchanged(session)
            .with_effect(Effect::reply(prompts::NOT_UNDERSTOOD))
            .with_prompt_for(session.step),

        // Stale buttons, text where a button is expected
        (_, Event::Text(_) | Event::Choice(_)) => unexpected(session),
    }
}

// Helper functions

fn unchanged(session: &Session) -> TransitionResult {
    TransitionResult::new(session.clone())
}

fn start_intake(preface: Option<&str>) -> TransitionResult {
    let mut result = TransitionResult::new(Session::at(Step::Industry));
    if let Some(text) = preface {
        result = result.with_effect(Effect::reply(text));
    }
    result.with_prompt_for(Step::Industry)
}

fn advance(session: &Session, next: Step, update: impl FnOnce(&mut Answers)) -> TransitionResult {
    let mut answers = session.answers.clone();
    update(&mut answers);
    TransitionResult::new(Session {
        step: next,
        answers,
    })
    .with_prompt_for(next)
}

/// Keep the session as is, explain what was wrong, and ask again
fn reject(session: &Session, error: &ValidationError) -> TransitionResult {
    unchanged(session)
        .with_effect(Effect::reply(error.to_string()))
        .with_prompt_for(session.step)
}

fn unexpected(session: &Session) -> TransitionResult {
    if session.step.is_active() {
        unchanged(session).with_prompt_for(session.step)
    } else {
        unchanged(session).with_effect(Effect::reply(prompts::NOT_UNDERSTOOD))
    }
}

/// Store the location, return to `Step::None`, and request keyword generation.
///
/// Missing upstream answers are passed through as empty strings; the keyword
/// generator rejects them with a user-visible message.
fn finish(session: &Session, location: String) -> TransitionResult {
    let mut answers = session.answers.clone();
    answers.location = Some(location.clone());

    let generate = Effect::GenerateKeywords {
        industry: answers.industry.clone().unwrap_or_default(),
        objective: answers.objective.clone().unwrap_or_default(),
        location,
    };

    TransitionResult::new(Session {
        step: Step::None,
        answers,
    })
    .with_effect(Effect::reply(prompts::GENERATING))
    .with_effect(generate)
}

fn required(text: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(trimmed.to_string())
    }
}

fn url(text: &str, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.starts_with("http") {
        Ok(trimmed.to_string())
    } else {
        Err(error)
    }
}

fn yes_no(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("yes") || trimmed.eq_ignore_ascii_case("no") {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::YesNo)
    }
}
