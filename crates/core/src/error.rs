//! Error types for the Consilium domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level [`Error`]
//! wraps them for callers that only need a single error type.

use thiserror::Error;

use crate::role::Role;

/// The top-level error type for all Consilium operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Prompt rendering ---
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    // --- Orchestration ---
    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned an empty response: {0}")]
    EmptyResponse(String),
}

/// Failure of a single text-generation call.
///
/// The panel only ever sees generation failures through this name; the
/// variants are the provider's transport-level kinds.
pub type GenerationError = ProviderError;

/// Failure to turn a role's template into a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Unknown role: no template registered for {0}")]
    UnknownRole(Role),

    #[error("Missing input for {role}: template placeholder {{{placeholder}}} has no value")]
    MissingInput { role: Role, placeholder: String },

    #[error("Malformed template for {role}: {reason}")]
    MalformedTemplate { role: Role, reason: String },
}

/// Conditions that stop a whole run before any specialist is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestrationError {
    #[error("Worker pool cannot start: concurrency limit must be at least 1")]
    ZeroConcurrency,

    #[error("No specialist roles configured for the run")]
    NoSpecialists,

    #[error("Synthesis role {0} cannot also be dispatched as a specialist")]
    SynthesisAmongSpecialists(Role),
}
