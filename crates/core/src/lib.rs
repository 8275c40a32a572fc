//! # Consilium Core
//!
//! Domain types, traits, and error definitions for the Consilium specialist
//! panel. This crate has **zero framework dependencies** — it defines the
//! domain model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! The text-generation backend is a trait here (`Provider`, narrowed to
//! `GenerationClient` for the panel). Implementations live in their
//! respective crates. This enables:
//! - Swapping LLM backends via configuration
//! - Easy testing with scripted fake clients
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod generation;
pub mod message;
pub mod outcome;
pub mod provider;
pub mod role;

// Re-export key types at crate root for ergonomics
pub use error::{Error, GenerationError, OrchestrationError, PromptError, ProviderError};
pub use event::{EventBus, RunEvent, RunPhase};
pub use generation::{GenerationClient, ProviderClient};
pub use message::{Message, MessageRole};
pub use outcome::Outcome;
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use role::{ParseRoleError, Role};
