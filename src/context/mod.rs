//! Execution context: the active context chain of the calling OS thread.
//!
//! Only one logical thread of control runs at a time, so the active chain is
//! a thread-local that is swapped wholesale at suspension boundaries. Scope
//! handles never hold a chain; every operation below reads or rewrites
//! whichever chain is installed when it runs.

pub mod chain;

pub use chain::ContextChain;

use crate::config::Limits;
use crate::error::ScopeError;
use crate::frame::Frame;
use crate::store::BoundValue;
use crate::types::{ChainId, Level, ScopeFamily};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

thread_local! {
    static ACTIVE: RefCell<ContextChain> = RefCell::new(ContextChain::root());
    static LIMITS: Cell<Limits> = Cell::new(Limits::default());
}

/// Apply engine limits to the calling thread.
pub fn configure(limits: Limits) {
    LIMITS.with(|cell| cell.set(limits));
}

pub fn limits() -> Limits {
    LIMITS.with(Cell::get)
}

/// Identity of the logical thread currently running.
pub fn active_id() -> ChainId {
    ACTIVE.with(|active| active.borrow().id())
}

/// Whether the calling OS thread is on its root chain, outside any computation.
pub fn on_root_chain() -> bool {
    ACTIVE.with(|active| active.borrow().is_root())
}

/// The current frame, shared.
pub fn snapshot() -> Rc<Frame> {
    ACTIVE.with(|active| Rc::clone(active.borrow().head()))
}

pub fn level(family: &ScopeFamily) -> Level {
    ACTIVE.with(|active| active.borrow().level(family))
}

/// Rewrite the active chain. The displaced frame is released after the
/// borrow ends: dropping a bound value may run code that reads the context.
fn update_active<R>(f: impl FnOnce(&mut ContextChain) -> R) -> R {
    let (out, _displaced) = ACTIVE.with(|active| {
        let mut chain = active.borrow_mut();
        let displaced = Rc::clone(chain.head());
        (f(&mut chain), displaced)
    });
    out
}

pub fn enter(family: &ScopeFamily) -> Result<Level, ScopeError> {
    let limit = limits().max_scope_depth;
    update_active(|chain| chain.enter(family, limit))
}

pub fn exit(family: &ScopeFamily) -> Result<Level, ScopeError> {
    update_active(|chain| chain.exit(family))
}

pub fn set_value(family: &ScopeFamily, value: BoundValue) {
    update_active(|chain| chain.set(family, value))
}

/// Value at `level`, or at the current level when `level` is `None`.
pub fn get_value(family: &ScopeFamily, level: Option<Level>) -> Option<BoundValue> {
    ACTIVE.with(|active| {
        let active = active.borrow();
        let head = active.head();
        let level = level.unwrap_or_else(|| head.level(family));
        head.get(family, level).cloned()
    })
}

/// Nearest bound value at or below the current level.
pub fn get_nearest(family: &ScopeFamily) -> Option<(Level, BoundValue)> {
    ACTIVE.with(|active| {
        let active = active.borrow();
        let head = active.head();
        head.bindings()
            .nearest(family, head.level(family))
            .map(|(level, value)| (level, value.clone()))
    })
}

/// Bound values for levels `1..=current`, root first.
pub fn get_stack(family: &ScopeFamily) -> Vec<Option<BoundValue>> {
    ACTIVE.with(|active| active.borrow().head().stack(family))
}

/// Install `chain` as the active chain and hand back the one it replaces.
pub(crate) fn install(chain: ContextChain) -> ContextChain {
    ACTIVE.with(|active| std::mem::replace(&mut *active.borrow_mut(), chain))
}
