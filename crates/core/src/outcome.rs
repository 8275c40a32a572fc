//! The result envelope every panel task produces.

use serde::{Deserialize, Serialize};

/// Terminal result of one dispatched task.
///
/// Failures are values here; nothing a single task does escapes as an
/// error to the run that dispatched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { text: String },
    Failure { message: String },
}

impl Outcome {
    pub fn success(text: impl Into<String>) -> Self {
        Outcome::Success { text: text.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Generated text, if the task succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Success { text } => Some(text),
            Outcome::Failure { .. } => None,
        }
    }

    /// Failure message, if the task failed.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { message } => Some(message),
        }
    }

    /// Text on success, `placeholder` on failure.
    pub fn text_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.text().unwrap_or(placeholder)
    }

    /// Whatever the outcome carries: generated text or failure message.
    pub fn body(&self) -> &str {
        match self {
            Outcome::Success { text } => text,
            Outcome::Failure { message } => message,
        }
    }
}
