//! The specialist panel — fan one document out, gather one synthesis.
//!
//! A run has two phases:
//!
//! 1. **Fan-out**: every configured specialist reads the same document on a
//!    bounded worker pool. Each produces an [`Outcome`], success or failure.
//! 2. **Synthesis**: once *all* specialists are done, the team role reads
//!    their reports (a placeholder stands in for each failed one) and
//!    produces the final assessment.
//!
//! Failures never cross task boundaries: a broken specialist yields a
//! `Failure` outcome and its siblings carry on.
//!
//! [`Outcome`]: consilium_core::Outcome

pub mod orchestrator;
pub mod prompt;
pub mod store;
pub mod task;
pub mod templates;

pub use orchestrator::{NOT_CONSULTED, Orchestrator};
pub use prompt::{Inputs, PromptBuilder};
pub use store::{ResultStore, RunMetadata, RunResult};
pub use task::SpecialistTask;

#[cfg(test)]
pub(crate) mod test_helpers;
