//! Configuration System
//!
//! Engine limits and logging settings. Built from merge-policy defaults, an
//! optional TOML file and `DYNSCOPE_*` environment variables, in that order of
//! increasing precedence.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::types::Level;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Default cap on the nesting depth of a single scope family.
pub const DEFAULT_MAX_SCOPE_DEPTH: Level = 4096;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine limits
    #[serde(default)]
    pub limits: Limits,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-thread engine limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Deepest level any one scope family may reach on a chain
    #[serde(default = "default_max_scope_depth")]
    pub max_scope_depth: Level,
}

fn default_max_scope_depth() -> Level {
    DEFAULT_MAX_SCOPE_DEPTH
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_scope_depth: default_max_scope_depth(),
        }
    }
}

impl Limits {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_scope_depth == 0 {
            return Err("max_scope_depth must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Limits(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Limits(msg) => write!(f, "Limits: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl EngineConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.limits.validate() {
            errors.push(ValidationError::Limits(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, then apply the limits to the calling thread.
    pub fn apply(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        crate::context::configure(self.limits);
        Ok(())
    }
}
