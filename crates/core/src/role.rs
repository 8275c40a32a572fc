//! Panel roles — the closed set of perspectives a task can speak from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One fixed analysis perspective.
///
/// The six specialists each read the raw document; the
/// `MultidisciplinaryTeam` reads the specialists' outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Cardiologist,
    Psychologist,
    Pulmonologist,
    Neurologist,
    Dermatologist,
    Endocrinologist,
    MultidisciplinaryTeam,
}

impl Role {
    /// Specialist roles in canonical order.
    pub const SPECIALISTS: [Role; 6] = [
        Role::Cardiologist,
        Role::Psychologist,
        Role::Pulmonologist,
        Role::Neurologist,
        Role::Dermatologist,
        Role::Endocrinologist,
    ];

    /// Every role, synthesis last.
    pub const ALL: [Role; 7] = [
        Role::Cardiologist,
        Role::Psychologist,
        Role::Pulmonologist,
        Role::Neurologist,
        Role::Dermatologist,
        Role::Endocrinologist,
        Role::MultidisciplinaryTeam,
    ];

    /// Stable name, also used as the synthesis template placeholder.
    pub fn name(self) -> &'static str {
        match self {
            Role::Cardiologist => "Cardiologist",
            Role::Psychologist => "Psychologist",
            Role::Pulmonologist => "Pulmonologist",
            Role::Neurologist => "Neurologist",
            Role::Dermatologist => "Dermatologist",
            Role::Endocrinologist => "Endocrinologist",
            Role::MultidisciplinaryTeam => "MultidisciplinaryTeam",
        }
    }

    /// Whether this role reads the document directly.
    pub fn is_specialist(self) -> bool {
        !matches!(self, Role::MultidisciplinaryTeam)
    }

    /// Short display badge for progress output.
    pub fn icon(self) -> &'static str {
        match self {
            Role::Cardiologist => "🫀",
            Role::Psychologist => "🧠",
            Role::Pulmonologist => "🫁",
            Role::Neurologist => "🧬",
            Role::Dermatologist => "🩺",
            Role::Endocrinologist => "⚕️",
            Role::MultidisciplinaryTeam => "🏆",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role name: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(wanted))
            .or_else(|| {
                // "team" / "synthesis" are accepted shorthands
                match wanted.to_ascii_lowercase().as_str() {
                    "team" | "synthesis" | "synthesisteam" => Some(Role::MultidisciplinaryTeam),
                    _ => None,
                }
            })
            .ok_or_else(|| ParseRoleError(wanted.to_string()))
    }
}
