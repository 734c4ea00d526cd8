//! Runtime for executing the intake conversation
//!
//! The runtime owns the per-user session store, runs the pure transition
//! function under a per-user lock, and executes the resulting effects
//! against the keyword generator, trend lookups, the answer oracle, and
//! the outbound messaging seam.

mod executor;
mod sessions;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::BotRuntime;
pub use traits::*;
