//! Configuration loading, validation, and management for Consilium.
//!
//! Loads configuration from `~/.consilium/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use consilium_core::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.consilium/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Specialist panel settings
    #[serde(default)]
    pub panel: PanelConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    4096
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("panel", &self.panel)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// How a run fans out and what the synthesis sees for failed specialists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Worker pool size. Unset = one worker per specialist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Per-specialist deadline in seconds. Unset = wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_timeout_secs: Option<u64>,

    /// Text handed to the synthesis in place of a failed specialist's report
    #[serde(default = "default_failure_placeholder")]
    pub failure_placeholder: String,

    /// Specialist roles to consult, by name
    #[serde(default = "default_specialists")]
    pub specialists: Vec<String>,
}

fn default_failure_placeholder() -> String {
    "analysis unavailable".into()
}

fn default_specialists() -> Vec<String> {
    Role::SPECIALISTS.iter().map(|r| r.name().to_string()).collect()
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            task_timeout_secs: None,
            failure_placeholder: default_failure_placeholder(),
            specialists: default_specialists(),
        }
    }
}

impl PanelConfig {
    /// Resolve `specialists` into roles, rejecting unknown names and the team role.
    pub fn specialist_roles(&self) -> Result<Vec<Role>, ConfigError> {
        self.specialists
            .iter()
            .map(|name| {
                let role: Role = name
                    .parse()
                    .map_err(|e| ConfigError::ValidationError(format!("panel.specialists: {e}")))?;
                if !role.is_specialist() {
                    return Err(ConfigError::ValidationError(format!(
                        "panel.specialists: {role} is the synthesis role, not a specialist"
                    )));
                }
                Ok(role)
            })
            .collect()
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// HTTP request timeout in seconds. Unset = the provider's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.consilium/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `CONSILIUM_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `OPENROUTER_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("CONSILIUM_API_KEY")
                .or_else(|| lookup("OPENAI_API_KEY"))
                .or_else(|| lookup("OPENROUTER_API_KEY"));
        }

        if let Some(provider) = lookup("CONSILIUM_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("CONSILIUM_MODEL") {
            self.default_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".consilium")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.panel.concurrency == Some(0) {
            return Err(ConfigError::ValidationError(
                "panel.concurrency must be at least 1".into(),
            ));
        }

        if self.panel.task_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "panel.task_timeout_secs must be at least 1".into(),
            ));
        }

        if let Some(name) = self
            .providers
            .iter()
            .find_map(|(name, p)| (p.timeout_secs == Some(0)).then_some(name))
        {
            return Err(ConfigError::ValidationError(format!(
                "providers.{name}.timeout_secs must be at least 1"
            )));
        }

        if self.panel.specialist_roles()?.is_empty() {
            return Err(ConfigError::ValidationError(
                "panel.specialists must name at least one specialist".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some() || self.providers.values().any(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            panel: PanelConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
