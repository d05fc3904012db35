//! Binding Store
//!
//! Persistent mapping from (family, level) to a bound value. Every write returns
//! a new store that shares all untouched structure with the receiver; a store
//! that has been handed out is never mutated.

pub mod value;

pub use value::BoundValue;

use crate::types::{Level, ScopeFamily};
use im::{HashMap, OrdMap};

/// Per-family slots, ordered by level.
pub type LevelSlots = OrdMap<Level, BoundValue>;

/// Immutable, structurally shared binding table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingStore {
    families: HashMap<ScopeFamily, LevelSlots>,
}

impl BindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound exactly at `level`.
    pub fn get(&self, family: &ScopeFamily, level: Level) -> Option<&BoundValue> {
        self.families.get(family)?.get(&level)
    }

    /// The highest bound slot at or below `level`.
    pub fn nearest(&self, family: &ScopeFamily, level: Level) -> Option<(Level, &BoundValue)> {
        self.families
            .get(family)?
            .range(..=level)
            .next_back()
            .map(|(l, value)| (*l, value))
    }

    /// Copy-on-write bind. The receiver is left untouched.
    pub fn with_binding(&self, family: &ScopeFamily, level: Level, value: BoundValue) -> Self {
        let slots = self
            .families
            .get(family)
            .cloned()
            .unwrap_or_default()
            .update(level, value);
        BindingStore {
            families: self.families.update(family.clone(), slots),
        }
    }

    /// Copy-on-write unbind of a single slot.
    pub fn without(&self, family: &ScopeFamily, level: Level) -> Self {
        match self.families.get(family) {
            Some(slots) if slots.contains_key(&level) => {
                let slots = slots.without(&level);
                let families = if slots.is_empty() {
                    self.families.without(family)
                } else {
                    self.families.update(family.clone(), slots)
                };
                BindingStore { families }
            }
            _ => self.clone(),
        }
    }

    /// All slots of one family, shared with this store.
    pub fn slots(&self, family: &ScopeFamily) -> Option<&LevelSlots> {
        self.families.get(family)
    }

    /// Replace every slot of `family` with `slots` (or drop the family on `None`).
    pub fn with_slots(&self, family: &ScopeFamily, slots: Option<LevelSlots>) -> Self {
        let families = match slots {
            Some(slots) if !slots.is_empty() => self.families.update(family.clone(), slots),
            _ => self.families.without(family),
        };
        BindingStore { families }
    }

    pub fn families(&self) -> impl Iterator<Item = &ScopeFamily> {
        self.families.keys()
    }

    pub fn len(&self) -> usize {
        self.families.values().map(|slots| slots.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}
