//! Scoped acquisition of one level of a scope family.

use crate::context;
use crate::error::{Imbalance, ScopeError};
use crate::suspend::teardown;
use crate::types::{ChainId, Level, ScopeFamily};
use tracing::error;

/// Exits its scope when dropped, on whichever path leaves the enclosing block.
///
/// The guard remembers the chain and level it entered; exiting anywhere else
/// is a [`ScopeError::ScopeImbalance`] and leaves the active chain untouched.
#[must_use = "dropping the guard exits the scope immediately"]
#[derive(Debug)]
pub struct ScopeGuard {
    family: ScopeFamily,
    chain: ChainId,
    level: Level,
    released: bool,
}

impl ScopeGuard {
    pub(crate) fn enter(family: &ScopeFamily) -> Result<Self, ScopeError> {
        let level = context::enter(family)?;
        Ok(ScopeGuard {
            family: family.clone(),
            chain: context::active_id(),
            level,
            released: false,
        })
    }

    pub fn family(&self) -> &ScopeFamily {
        &self.family
    }

    /// The level this guard entered.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The chain this guard entered on.
    pub fn chain(&self) -> ChainId {
        self.chain
    }

    /// Exit now and surface any imbalance instead of logging it.
    pub fn exit(mut self) -> Result<(), ScopeError> {
        self.released = true;
        self.release()
    }

    fn release(&self) -> Result<(), ScopeError> {
        let active = context::active_id();
        if active != self.chain {
            return Err(ScopeError::imbalance(
                &self.family,
                Imbalance::ForeignChain {
                    entered_on: self.chain,
                    active,
                },
            ));
        }
        let current = context::level(&self.family);
        if current != self.level {
            return Err(ScopeError::imbalance(
                &self.family,
                Imbalance::LevelMismatch {
                    entered: self.level,
                    current,
                },
            ));
        }
        context::exit(&self.family)?;
        teardown::record_exit(&self.family, self.level);
        Ok(())
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = self.release() {
            if !teardown::report_failure(err.clone()) {
                error!(family = %self.family, level = self.level, error = %err, "Scope guard failed to exit");
            }
        }
    }
}
