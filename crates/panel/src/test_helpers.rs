//! Shared test helpers for panel tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use consilium_core::error::{GenerationError, ProviderError};
use consilium_core::generation::GenerationClient;
use consilium_core::role::Role;

/// Work out which built-in template produced `prompt` from its first line.
pub fn role_of_prompt(prompt: &str) -> Option<Role> {
    let first_line = prompt.lines().next()?.to_lowercase();
    if first_line.contains("multidisciplinary team") {
        return Some(Role::MultidisciplinaryTeam);
    }
    Role::SPECIALISTS
        .into_iter()
        .find(|role| first_line.contains(&role.name().to_lowercase()))
}

/// A fake client that answers `OK-<Role>` for built-in prompts.
///
/// Individual roles can be scripted to fail, hang, panic, or answer late.
/// Prompts it cannot attribute to a role get `OK`.
#[derive(Default)]
pub struct ScriptedClient {
    failures: HashMap<Role, ProviderError>,
    hanging: Vec<Role>,
    panicking: Vec<Role>,
    delays: HashMap<Role, Duration>,
    default_delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    prompts: Mutex<Vec<(Option<Role>, String)>>,
}

impl ScriptedClient {
    pub fn canned() -> Self {
        Self::default()
    }

    pub fn failing(mut self, role: Role, error: ProviderError) -> Self {
        self.failures.insert(role, error);
        self
    }

    pub fn hanging(mut self, role: Role) -> Self {
        self.hanging.push(role);
        self
    }

    pub fn panicking(mut self, role: Role) -> Self {
        self.panicking.push(role);
        self
    }

    pub fn delayed(mut self, role: Role, delay: Duration) -> Self {
        self.delays.insert(role, delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// The prompt sent for `role`, if any.
    pub fn prompt_for(&self, role: Role) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| *r == Some(role))
            .map(|(_, p)| p.clone())
    }

    /// Roles in the order their calls arrived.
    pub fn call_order(&self) -> Vec<Option<Role>> {
        self.prompts.lock().unwrap().iter().map(|(r, _)| *r).collect()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let role = role_of_prompt(prompt);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((role, prompt.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = role
            .and_then(|r| self.delays.get(&r).copied())
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let Some(role) = role else {
            return Ok("OK".into());
        };
        if self.hanging.contains(&role) {
            std::future::pending::<()>().await;
        }
        if self.panicking.contains(&role) {
            panic!("scripted panic for {role}");
        }
        if let Some(err) = self.failures.get(&role) {
            return Err(err.clone());
        }
        Ok(format!("OK-{role}"))
    }
}

#[test]
fn role_of_prompt_recognises_builtin_templates() {
    let builder = crate::prompt::PromptBuilder::default();
    for role in Role::SPECIALISTS {
        let inputs = HashMap::from([("document", "x")]);
        let prompt = builder.render(role, &inputs).unwrap();
        assert_eq!(role_of_prompt(&prompt), Some(role));
    }
}
