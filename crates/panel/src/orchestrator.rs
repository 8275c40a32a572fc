//! Panel orchestration — fan out to specialists, gather, synthesize.
//!
//! # Architecture
//!
//! ```text
//!                  document
//!                     │
//!       ┌──────┬──────┼──────┬──────┐
//!       ▼      ▼      ▼      ▼      ▼
//!    ┌──────┐┌──────┐   ┌──────┐┌──────┐   ← specialists on a bounded pool
//!    │ Card ││ Psy  │ … │ Derm ││ Endo │
//!    └──┬───┘└──┬───┘   └──┬───┘└──┬───┘
//!       └──────┴─────┬─────┴──────┘
//!                    ▼  barrier: every specialist has an Outcome
//!            ┌───────────────┐
//!            │     Team      │   ← one synthesis over all reports
//!            └───────────────┘
//! ```
//!
//! Specialist tasks run on a [`JoinSet`] gated by a [`Semaphore`]. The
//! orchestrator drains the set completely before synthesis starts.
//! Dropping a `run` future drops the set, which aborts every in-flight
//! specialist and discards whatever had been collected.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use consilium_core::error::OrchestrationError;
use consilium_core::event::{EventBus, RunEvent, RunPhase};
use consilium_core::generation::GenerationClient;
use consilium_core::outcome::Outcome;
use consilium_core::role::Role;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::prompt::{Inputs, PromptBuilder};
use crate::store::{ResultStore, RunMetadata, RunResult};
use crate::task::SpecialistTask;
use crate::templates;

/// Synthesis input for a specialist that was not part of the run.
pub const NOT_CONSULTED: &str = "not consulted";

const DEFAULT_FAILURE_PLACEHOLDER: &str = "analysis unavailable";

/// Runs a specialist panel over one document.
pub struct Orchestrator {
    builder: Arc<PromptBuilder>,
    client: Arc<dyn GenerationClient>,
    concurrency: Option<usize>,
    task_timeout: Option<Duration>,
    failure_placeholder: String,
    event_bus: Option<Arc<EventBus>>,
}

impl Orchestrator {
    /// Create an orchestrator with the built-in templates.
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            builder: Arc::new(PromptBuilder::default()),
            client,
            concurrency: None,
            task_timeout: None,
            failure_placeholder: DEFAULT_FAILURE_PLACEHOLDER.to_string(),
            event_bus: None,
        }
    }

    /// Use a custom template registry.
    pub fn with_prompt_builder(mut self, builder: PromptBuilder) -> Self {
        self.builder = Arc::new(builder);
        self
    }

    /// Bound the worker pool. Defaults to one worker per specialist.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    /// Deadline applied to each generation call, synthesis included.
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Text the synthesis receives in place of a failed specialist's report.
    pub fn with_failure_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.failure_placeholder = placeholder.into();
        self
    }

    /// Publish progress events on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn failure_placeholder(&self) -> &str {
        &self.failure_placeholder
    }

    fn task(&self) -> SpecialistTask {
        let task = SpecialistTask::new(self.builder.clone(), self.client.clone());
        match self.task_timeout {
            Some(deadline) => task.with_deadline(deadline),
            None => task,
        }
    }

    fn publish(&self, event: RunEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }

    fn enter(&self, run_id: &str, phase: RunPhase) {
        debug!(run_id, ?phase, "Run phase");
        self.publish(RunEvent::PhaseChanged {
            run_id: run_id.to_string(),
            phase,
            timestamp: Utc::now(),
        });
    }

    /// Run all six specialists and the multidisciplinary team.
    pub async fn run_panel(&self, document: &str) -> Result<RunResult, OrchestrationError> {
        self.run(document, &Role::SPECIALISTS, Role::MultidisciplinaryTeam)
            .await
    }

    /// Fan `document` out to `specialist_roles`, then synthesize with
    /// `synthesis_role`.
    ///
    /// Per-task failures are recorded as [`Outcome::Failure`]; only
    /// conditions that prevent the fan-out from starting are errors.
    /// Repeated roles are consulted once.
    pub async fn run(
        &self,
        document: &str,
        specialist_roles: &[Role],
        synthesis_role: Role,
    ) -> Result<RunResult, OrchestrationError> {
        let roles = dedup(specialist_roles);
        if roles.is_empty() {
            return Err(OrchestrationError::NoSpecialists);
        }
        if roles.contains(&synthesis_role) {
            return Err(OrchestrationError::SynthesisAmongSpecialists(synthesis_role));
        }
        let limit = self.concurrency.unwrap_or(roles.len());
        if limit == 0 {
            return Err(OrchestrationError::ZeroConcurrency);
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        self.enter(&run_id, RunPhase::Created);

        info!(
            run_id = %run_id,
            specialists = roles.len(),
            concurrency = limit,
            document_chars = document.len(),
            "Panel run starting"
        );

        // ── Phase 1: fan-out ──
        self.enter(&run_id, RunPhase::FanningOut);
        let specialists = self.fan_out(&run_id, document, &roles, limit).await;

        // ── Barrier ──
        self.enter(&run_id, RunPhase::Barrier);
        info!(
            run_id = %run_id,
            succeeded = specialists.success_count(),
            failed = ?specialists.failed_roles(),
            "All specialists finished"
        );

        // ── Phase 2: synthesis ──
        self.enter(&run_id, RunPhase::Synthesizing);
        let started = Instant::now();
        let synthesis = self.synthesize(&specialists, synthesis_role).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.publish(RunEvent::SynthesisFinished {
            run_id: run_id.clone(),
            role: synthesis_role,
            success: synthesis.is_success(),
            elapsed_ms,
            timestamp: Utc::now(),
        });

        self.enter(&run_id, RunPhase::Done);
        info!(
            run_id = %run_id,
            synthesis_success = synthesis.is_success(),
            elapsed_ms,
            "Panel run complete"
        );

        Ok(RunResult::new(
            RunMetadata {
                run_id,
                started_at,
                finished_at: Utc::now(),
            },
            specialists,
            synthesis_role,
            synthesis,
        ))
    }

    /// Run every role to an outcome and collect them by role.
    async fn fan_out(
        &self,
        run_id: &str,
        document: &str,
        roles: &[Role],
        limit: usize,
    ) -> ResultStore {
        let document: Arc<str> = Arc::from(document);
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut workers = JoinSet::new();
        let mut role_of_task = HashMap::new();

        for &role in roles {
            let task = self.task();
            let document = document.clone();
            let semaphore = semaphore.clone();
            let event_bus = self.event_bus.clone();
            let run_id = run_id.to_string();

            let handle = workers.spawn(async move {
                // The semaphore is never closed, so acquisition only waits.
                let _permit = semaphore.acquire_owned().await.ok();
                if let Some(bus) = &event_bus {
                    bus.publish(RunEvent::SpecialistStarted {
                        run_id,
                        role,
                        timestamp: Utc::now(),
                    });
                }

                let started = Instant::now();
                let inputs: Inputs = HashMap::from([(templates::DOCUMENT, &*document)]);
                let outcome = task.execute(role, &inputs).await;
                (role, outcome, started.elapsed())
            });
            role_of_task.insert(handle.id(), role);
        }

        let total = roles.len();
        let mut store = ResultStore::new();
        while let Some(joined) = workers.join_next_with_id().await {
            let (role, outcome, elapsed) = match joined {
                Ok((_, finished)) => finished,
                Err(e) => {
                    let Some(&role) = role_of_task.get(&e.id()) else {
                        warn!(error = %e, "Specialist task ended without a known role");
                        continue;
                    };
                    warn!(role = %role, error = %e, "Specialist task panicked");
                    (role, Outcome::failure(format!("task panicked: {e}")), Duration::ZERO)
                }
            };

            let success = outcome.is_success();
            store.put(role, outcome);
            let elapsed_ms = elapsed.as_millis() as u64;
            info!(role = %role, success, elapsed_ms, completed = store.len(), total, "Specialist finished");
            self.publish(RunEvent::SpecialistFinished {
                run_id: run_id.to_string(),
                role,
                success,
                completed: store.len(),
                total,
                elapsed_ms,
                timestamp: Utc::now(),
            });
        }

        // Every configured role leaves the barrier with an outcome.
        for &role in roles {
            if store.put(role, Outcome::failure("no outcome recorded")) {
                warn!(role = %role, "Specialist produced no outcome");
            }
        }
        store
    }

    /// Run the synthesis task on its own worker so a panic in the client
    /// becomes a `Failure` like any specialist's would.
    async fn synthesize(&self, specialists: &ResultStore, synthesis_role: Role) -> Outcome {
        let inputs: Vec<(String, String)> = self
            .gather_inputs(specialists)
            .into_iter()
            .map(|(name, text)| (name.to_string(), text.to_string()))
            .collect();
        let task = self.task();

        // Held in a JoinSet so dropping the run aborts the synthesis too.
        let mut worker = JoinSet::new();
        worker.spawn(async move {
            let inputs: Inputs = inputs
                .iter()
                .map(|(name, text)| (name.as_str(), text.as_str()))
                .collect();
            task.execute(synthesis_role, &inputs).await
        });

        match worker.join_next().await {
            Some(Ok(outcome)) => outcome,
            Some(Err(e)) => {
                warn!(role = %synthesis_role, error = %e, "Synthesis task panicked");
                Outcome::failure(format!("task panicked: {e}"))
            }
            None => Outcome::failure("no outcome recorded"),
        }
    }

    /// Synthesis inputs keyed by specialist name.
    ///
    /// Successful reports pass through verbatim; failed ones become the
    /// failure placeholder; specialists outside the run become
    /// [`NOT_CONSULTED`].
    pub fn gather_inputs<'a>(&'a self, specialists: &'a ResultStore) -> Inputs<'a> {
        Role::SPECIALISTS
            .into_iter()
            .map(|role| {
                let text = match specialists.get(role) {
                    Some(outcome) => outcome.text_or(&self.failure_placeholder),
                    None => NOT_CONSULTED,
                };
                (role.name(), text)
            })
            .collect()
    }
}

/// Keep the first occurrence of each role, preserving order.
fn dedup(roles: &[Role]) -> Vec<Role> {
    let mut unique = Vec::with_capacity(roles.len());
    for &role in roles {
        if !unique.contains(&role) {
            unique.push(role);
        }
    }
    unique
}

// ── Tests ─────────────────────────────────────────────────────────────────
