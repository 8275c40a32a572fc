//! One unit of panel work: render a role's prompt, generate, wrap the result.

use std::sync::Arc;
use std::time::Duration;

use consilium_core::generation::GenerationClient;
use consilium_core::outcome::Outcome;
use consilium_core::role::Role;
use tracing::{debug, warn};

use crate::prompt::{Inputs, PromptBuilder};

/// Executes a role against a prompt builder and a generation client.
///
/// `execute` never returns an error: every failure, from a missing
/// template input to a dropped connection, comes back as
/// [`Outcome::Failure`]. Cheap to clone; clones share the builder and client.
#[derive(Clone)]
pub struct SpecialistTask {
    builder: Arc<PromptBuilder>,
    client: Arc<dyn GenerationClient>,
    deadline: Option<Duration>,
}

impl SpecialistTask {
    pub fn new(builder: Arc<PromptBuilder>, client: Arc<dyn GenerationClient>) -> Self {
        Self {
            builder,
            client,
            deadline: None,
        }
    }

    /// Give up on a generation call after `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn builder(&self) -> &PromptBuilder {
        &self.builder
    }

    pub async fn execute(&self, role: Role, inputs: &Inputs<'_>) -> Outcome {
        let prompt = match self.builder.render(role, inputs) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(role = %role, error = %e, "Prompt rendering failed; skipping generation");
                return Outcome::failure(e.to_string());
            }
        };

        debug!(role = %role, prompt_chars = prompt.len(), "Dispatching generation");

        let generated = match self.deadline {
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.client.generate(&prompt)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(role = %role, deadline_secs = deadline.as_secs_f64(), "Generation timed out");
                        return Outcome::failure(format!(
                            "timeout: no response within {:.1}s",
                            deadline.as_secs_f64()
                        ));
                    }
                }
            }
            None => self.client.generate(&prompt).await,
        };

        match generated {
            Ok(text) => Outcome::success(text),
            Err(e) => {
                warn!(role = %role, error = %e, "Generation failed");
                Outcome::failure(e.to_string())
            }
        }
    }
}
