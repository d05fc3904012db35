//! A logical thread's live reference to its current frame.

use crate::error::ScopeError;
use crate::frame::{compose, Frame};
use crate::store::BoundValue;
use crate::types::{ChainId, Level, ScopeFamily};
use im::HashSet;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static NEXT_CHAIN_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_chain_id() -> ChainId {
    ChainId(NEXT_CHAIN_ID.fetch_add(1, Ordering::Relaxed))
}

/// Context chain: the current frame of one logical thread, plus the families
/// that thread has taken ownership of.
#[derive(Debug, Clone)]
pub struct ContextChain {
    id: ChainId,
    root: bool,
    head: Rc<Frame>,
    owned: HashSet<ScopeFamily>,
}

impl ContextChain {
    /// The chain an OS thread starts on. Each one gets its own id, so a guard
    /// carried to another thread is seen as foreign there.
    pub fn root() -> Self {
        ContextChain {
            id: next_chain_id(),
            root: true,
            head: Frame::root(),
            owned: HashSet::new(),
        }
    }

    /// Chain for a computation created while `origin` was active.
    ///
    /// Families already entered at creation belong to the computation from
    /// the start; everything else is inherited from whoever resumes it until
    /// the computation enters or writes it.
    pub fn spawned_from(origin: &Rc<Frame>) -> Self {
        let owned = origin
            .active_families()
            .filter(|(_, level)| *level > 0)
            .map(|(family, _)| family.clone())
            .collect();
        ContextChain {
            id: next_chain_id(),
            root: false,
            head: Rc::clone(origin),
            owned,
        }
    }

    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Whether this is an OS thread's root chain rather than a computation's.
    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn head(&self) -> &Rc<Frame> {
        &self.head
    }

    pub fn owned(&self) -> &HashSet<ScopeFamily> {
        &self.owned
    }

    pub fn owns(&self, family: &ScopeFamily) -> bool {
        self.owned.contains(family)
    }

    pub fn level(&self, family: &ScopeFamily) -> Level {
        self.head.level(family)
    }

    pub(crate) fn enter(&mut self, family: &ScopeFamily, limit: Level) -> Result<Level, ScopeError> {
        let current = self.head.level(family);
        if current >= limit {
            return Err(ScopeError::DepthExceeded {
                family: family.clone(),
                limit,
            });
        }
        self.head = self.head.entered(family);
        self.claim(family);
        trace!(chain = %self.id, family = %family, level = current + 1, "enter");
        Ok(current + 1)
    }

    pub(crate) fn exit(&mut self, family: &ScopeFamily) -> Result<Level, ScopeError> {
        let head = self
            .head
            .exited(family)
            .map_err(|reason| ScopeError::imbalance(family, reason))?;
        self.head = head;
        self.claim(family);
        let level = self.head.level(family);
        trace!(chain = %self.id, family = %family, level, "exit");
        Ok(level)
    }

    pub(crate) fn set(&mut self, family: &ScopeFamily, value: BoundValue) {
        self.head = self.head.with_value(family, value);
        self.claim(family);
        trace!(chain = %self.id, family = %family, level = self.head.level(family), "set");
    }

    /// This chain as it should run when resumed under `caller`.
    pub(crate) fn resumed_under(&self, caller: &Rc<Frame>) -> ContextChain {
        ContextChain {
            id: self.id,
            root: self.root,
            head: compose(&self.head, caller, &self.owned),
            owned: self.owned.clone(),
        }
    }

    fn claim(&mut self, family: &ScopeFamily) {
        if !self.root && !self.owned.contains(family) {
            self.owned.insert(family.clone());
        }
    }
}
