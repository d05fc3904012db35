//! Scope handles
//!
//! A [`ContextStack`] is a typed accessor for one scope family. It holds no
//! chain state: entering, exiting, reading and writing always go through the
//! chain that is active when the call is made.

pub mod guard;

pub use guard::ScopeGuard;

use crate::context;
use crate::error::ScopeError;
use crate::types::{Level, OwnerTag, ScopeFamily};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Default owner marker for handles that do not name their own.
#[derive(Debug, Clone, Copy)]
pub struct Global;

/// Dynamically scoped stack of `T` values keyed by name.
///
/// The owner type is `ContextStack<T, O>` itself, so two handles only share
/// state when key, value type and owner marker all agree.
pub struct ContextStack<T, O = Global> {
    family: ScopeFamily,
    _marker: PhantomData<fn() -> (T, O)>,
}

impl<T, O> Clone for ContextStack<T, O> {
    fn clone(&self) -> Self {
        ContextStack {
            family: self.family.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, O> fmt::Debug for ContextStack<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextStack")
            .field("family", &self.family)
            .finish()
    }
}

impl<T: Clone + 'static, O: 'static> ContextStack<T, O> {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        ContextStack {
            family: ScopeFamily::new(OwnerTag::of::<Self>(), key),
            _marker: PhantomData,
        }
    }

    pub fn family(&self) -> &ScopeFamily {
        &self.family
    }

    pub fn key(&self) -> &str {
        self.family.key()
    }

    /// Current nesting depth on the active chain.
    pub fn level(&self) -> Level {
        context::level(&self.family)
    }

    /// Enter one level deeper; the returned guard exits on every exit path.
    pub fn enter(&self) -> Result<ScopeGuard, ScopeError> {
        ScopeGuard::enter(&self.family)
    }

    /// Enter without a guard. Pair with exactly one [`ContextStack::exit`].
    pub fn enter_unguarded(&self) -> Result<Level, ScopeError> {
        context::enter(&self.family)
    }

    /// Leave the innermost level; returns the level left active.
    pub fn exit(&self) -> Result<Level, ScopeError> {
        context::exit(&self.family)
    }

    /// Bind `value` at the current level. At level 0 this sets the base value.
    pub fn set_value(&self, value: T) {
        context::set_value(&self.family, crate::store::BoundValue::new(value));
    }

    pub fn get_value(&self) -> Option<T> {
        context::get_value(&self.family, None).and_then(|v| v.downcast::<T>())
    }

    pub fn get_value_or(&self, default: T) -> T {
        self.get_value().unwrap_or(default)
    }

    /// Read an explicit level, e.g. an enclosing scope of the current one.
    pub fn get_value_at(&self, level: Level) -> Option<T> {
        context::get_value(&self.family, Some(level)).and_then(|v| v.downcast::<T>())
    }

    /// Like [`ContextStack::get_value`], but absence is an error.
    pub fn require_value(&self) -> Result<T, ScopeError> {
        self.get_value().ok_or_else(|| ScopeError::UnboundKey {
            family: self.family.clone(),
            level: self.level(),
        })
    }

    /// Innermost bound value, skipping levels entered but never set.
    pub fn get_nearest(&self) -> Option<T> {
        context::get_nearest(&self.family).and_then(|(_, v)| v.downcast::<T>())
    }

    /// Values for levels `1..=level()`, outermost first. `None` marks a level
    /// that was entered but never set.
    pub fn get_stack(&self) -> Vec<Option<T>> {
        context::get_stack(&self.family)
            .into_iter()
            .map(|slot| slot.and_then(|v| v.downcast::<T>()))
            .collect()
    }

    /// Run `f` one level deeper with `value` bound, then exit.
    pub fn scope<R>(&self, value: T, f: impl FnOnce() -> R) -> Result<R, ScopeError> {
        let guard = self.enter()?;
        self.set_value(value);
        let out = f();
        guard.exit()?;
        Ok(out)
    }
}
