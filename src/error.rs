//! Error types for the dynamic-scope engine.

use crate::types::{ChainId, Level, ScopeFamily};
use thiserror::Error;

/// Why an exit could not be matched with an enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imbalance {
    /// The family is at level 0 on the active chain.
    NotEntered,
    /// A guard entered at one level found the family at another.
    LevelMismatch { entered: Level, current: Level },
    /// The guard was entered on a chain that is not the active one.
    ForeignChain { entered_on: ChainId, active: ChainId },
}

impl std::fmt::Display for Imbalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Imbalance::NotEntered => write!(f, "exit without a matching enter"),
            Imbalance::LevelMismatch { entered, current } => write!(
                f,
                "scope entered at level {} but the active level is {}",
                entered, current
            ),
            Imbalance::ForeignChain { entered_on, active } => write!(
                f,
                "scope entered on {} but {} is active",
                entered_on, active
            ),
        }
    }
}

/// Usage errors raised by scope and boundary operations
#[derive(Debug, Clone, Error)]
pub enum ScopeError {
    #[error("Scope imbalance on {family}: {reason}")]
    ScopeImbalance {
        family: ScopeFamily,
        reason: Imbalance,
    },

    #[error("Resumable computation on {0} has already terminated")]
    ResumeAfterCompletion(ChainId),

    #[error("No value bound for {family} at level {level}")]
    UnboundKey { family: ScopeFamily, level: Level },

    #[error("Computation on {0} awaited a future that is not its own suspension point")]
    StrayPending(ChainId),

    #[error("Scope depth limit {limit} exceeded for {family}")]
    DepthExceeded { family: ScopeFamily, limit: Level },
}

impl ScopeError {
    pub(crate) fn imbalance(family: &ScopeFamily, reason: Imbalance) -> Self {
        ScopeError::ScopeImbalance {
            family: family.clone(),
            reason,
        }
    }

    /// True for the imbalance kind, whatever its reason.
    pub fn is_imbalance(&self) -> bool {
        matches!(self, ScopeError::ScopeImbalance { .. })
    }
}

/// Errors from the ambient layers (configuration, logging)
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
