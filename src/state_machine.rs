//! Intake conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod prompts;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{ChoiceButton, Effect, Prompt};
pub use event::Event;
pub use state::Session;
pub use transition::transition;
