//! Run results — the keyed outcomes of one orchestration.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use consilium_core::outcome::Outcome;
use consilium_core::role::Role;
use serde::{Deserialize, Serialize};

/// Role → outcome pairs for one run.
///
/// Each role's slot is written at most once. Iteration follows the
/// canonical role order, never completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultStore {
    outcomes: BTreeMap<Role, Outcome>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `outcome` for `role`. Returns `false` (and keeps the
    /// existing value) if the slot was already filled.
    pub fn put(&mut self, role: Role, outcome: Outcome) -> bool {
        if self.outcomes.contains_key(&role) {
            return false;
        }
        self.outcomes.insert(role, outcome);
        true
    }

    pub fn get(&self, role: Role) -> Option<&Outcome> {
        self.outcomes.get(&role)
    }

    pub fn all(&self) -> &BTreeMap<Role, Outcome> {
        &self.outcomes
    }

    pub fn contains(&self, role: Role) -> bool {
        self.outcomes.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &Outcome)> + '_ {
        self.outcomes.iter().map(|(role, outcome)| (*role, outcome))
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.outcomes.keys().copied()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_success()).count()
    }

    /// Roles whose outcome is a failure, in canonical order.
    pub fn failed_roles(&self) -> Vec<Role> {
        self.iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(role, _)| role)
            .collect()
    }
}

/// Identity and timing of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Everything one orchestration produced.
///
/// Owned by the caller; fields are read-only once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    metadata: RunMetadata,
    specialists: ResultStore,
    synthesis_role: Role,
    synthesis: Outcome,
}

impl RunResult {
    pub fn new(
        metadata: RunMetadata,
        specialists: ResultStore,
        synthesis_role: Role,
        synthesis: Outcome,
    ) -> Self {
        Self {
            metadata,
            specialists,
            synthesis_role,
            synthesis,
        }
    }

    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    pub fn specialists(&self) -> &ResultStore {
        &self.specialists
    }

    pub fn synthesis_role(&self) -> Role {
        self.synthesis_role
    }

    pub fn synthesis(&self) -> &Outcome {
        &self.synthesis
    }

    /// Outcome for any role of the run, synthesis included.
    pub fn outcome(&self, role: Role) -> Option<&Outcome> {
        if role == self.synthesis_role {
            Some(&self.synthesis)
        } else {
            self.specialists.get(role)
        }
    }

    /// Whether every specialist and the synthesis succeeded.
    pub fn is_complete_success(&self) -> bool {
        self.synthesis.is_success() && self.specialists.failed_roles().is_empty()
    }

    /// Outcomes are equal, ignoring run id and timing.
    pub fn same_content(&self, other: &RunResult) -> bool {
        self.specialists == other.specialists
            && self.synthesis_role == other.synthesis_role
            && self.synthesis == other.synthesis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_writes_a_slot_once() {
        let mut store = ResultStore::new();
        assert!(store.put(Role::Cardiologist, Outcome::success("first")));
        assert!(!store.put(Role::Cardiologist, Outcome::success("second")));
        assert_eq!(store.get(Role::Cardiologist), Some(&Outcome::success("first")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn iteration_is_canonical_not_insertion_order() {
        let mut store = ResultStore::new();
        store.put(Role::Endocrinologist, Outcome::success("e"));
        store.put(Role::Cardiologist, Outcome::failure("c"));
        store.put(Role::Neurologist, Outcome::success("n"));

        let roles: Vec<Role> = store.roles().collect();
        assert_eq!(roles, vec![Role::Cardiologist, Role::Neurologist, Role::Endocrinologist]);
        assert_eq!(store.failed_roles(), vec![Role::Cardiologist]);
        assert_eq!(store.success_count(), 2);
    }

    #[test]
    fn serializes_as_role_keyed_map() {
        let mut store = ResultStore::new();
        store.put(Role::Psychologist, Outcome::success("calm"));
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["Psychologist"]["status"], "success");
        assert_eq!(json["Psychologist"]["text"], "calm");
    }

    #[test]
    fn outcome_lookup_covers_synthesis() {
        let now = Utc::now();
        let mut store = ResultStore::new();
        store.put(Role::Cardiologist, Outcome::success("c"));
        let result = RunResult::new(
            RunMetadata {
                run_id: "r".into(),
                started_at: now,
                finished_at: now,
            },
            store,
            Role::MultidisciplinaryTeam,
            Outcome::failure("no synthesis"),
        );
        assert_eq!(
            result.outcome(Role::MultidisciplinaryTeam),
            Some(&Outcome::failure("no synthesis"))
        );
        assert!(result.outcome(Role::Dermatologist).is_none());
        assert!(!result.is_complete_success());
    }
}
