//! Context Frames
//!
//! Immutable snapshots of level counters and bindings. Each frame is created by
//! an enter, a copy-on-write rewrite (set or exit), or a suspension-boundary
//! restore, and holds a shared reference to the frame it was entered from.

pub mod compose;

pub use compose::compose;

use crate::error::Imbalance;
use crate::store::{BindingStore, BoundValue};
use crate::types::{Level, ScopeFamily};
use im::HashMap;
use std::fmt;
use std::rc::Rc;

/// How a frame came to occupy its position in the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOrigin {
    /// Bottom of a chain.
    Root,
    /// Pushed by entering this family.
    Enter(ScopeFamily),
}

/// Context frame
pub struct Frame {
    levels: HashMap<ScopeFamily, Level>,
    bindings: BindingStore,
    parent: Option<Rc<Frame>>,
    origin: FrameOrigin,
    depth: usize,
}

impl Frame {
    /// A frame with every family at level 0.
    pub fn root() -> Rc<Frame> {
        Rc::new(Frame {
            levels: HashMap::new(),
            bindings: BindingStore::new(),
            parent: None,
            origin: FrameOrigin::Root,
            depth: 0,
        })
    }

    pub fn level(&self, family: &ScopeFamily) -> Level {
        self.levels.get(family).copied().unwrap_or(0)
    }

    /// Value bound at an explicit level.
    pub fn get(&self, family: &ScopeFamily, level: Level) -> Option<&BoundValue> {
        self.bindings.get(family, level)
    }

    /// Value bound at the current level.
    pub fn current(&self, family: &ScopeFamily) -> Option<&BoundValue> {
        self.get(family, self.level(family))
    }

    pub fn bindings(&self) -> &BindingStore {
        &self.bindings
    }

    pub fn parent(&self) -> Option<&Rc<Frame>> {
        self.parent.as_ref()
    }

    pub fn origin(&self) -> &FrameOrigin {
        &self.origin
    }

    /// Number of frames between this one and the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Families entered at least once on this frame.
    pub fn active_families(&self) -> impl Iterator<Item = (&ScopeFamily, Level)> {
        self.levels.iter().map(|(family, level)| (family, *level))
    }

    /// Bound values for levels `1..=level`, root first.
    pub fn stack(&self, family: &ScopeFamily) -> Vec<Option<BoundValue>> {
        (1..=self.level(family))
            .map(|level| self.get(family, level).cloned())
            .collect()
    }

    /// Push a frame one level deeper for `family`, with nothing bound there yet.
    pub fn entered(self: &Rc<Self>, family: &ScopeFamily) -> Rc<Frame> {
        let level = self.level(family) + 1;
        Rc::new(Frame {
            levels: self.levels.update(family.clone(), level),
            bindings: self.bindings.without(family, level),
            parent: Some(Rc::clone(self)),
            origin: FrameOrigin::Enter(family.clone()),
            depth: self.depth + 1,
        })
    }

    /// Rewrite this frame with `value` bound at the current level of `family`.
    pub fn with_value(self: &Rc<Self>, family: &ScopeFamily, value: BoundValue) -> Rc<Frame> {
        let level = self.level(family);
        Rc::new(Frame {
            levels: self.levels.clone(),
            bindings: self.bindings.with_binding(family, level, value),
            parent: self.parent.clone(),
            origin: self.origin.clone(),
            depth: self.depth,
        })
    }

    /// Leave the innermost level of `family`.
    ///
    /// When the frame was pushed by entering `family` and nothing else changed
    /// since, the parent is returned as is. Otherwise the parent's position is
    /// rewritten with the decremented snapshot; an exit that does not match the
    /// frame's own enter rewrites this frame in place.
    pub fn exited(self: &Rc<Self>, family: &ScopeFamily) -> Result<Rc<Frame>, Imbalance> {
        let level = self.level(family);
        if level == 0 {
            return Err(Imbalance::NotEntered);
        }

        let levels = if level == 1 {
            self.levels.without(family)
        } else {
            self.levels.update(family.clone(), level - 1)
        };
        let bindings = self.bindings.without(family, level);

        let parent = match (&self.origin, &self.parent) {
            (FrameOrigin::Enter(entered), Some(parent)) if entered == family => parent,
            _ => {
                return Ok(Rc::new(Frame {
                    levels,
                    bindings,
                    parent: self.parent.clone(),
                    origin: self.origin.clone(),
                    depth: self.depth,
                }))
            }
        };

        if parent.levels == levels && parent.bindings == bindings {
            return Ok(Rc::clone(parent));
        }

        Ok(Rc::new(Frame {
            levels,
            bindings,
            parent: parent.parent.clone(),
            origin: parent.origin.clone(),
            depth: parent.depth,
        }))
    }

    pub(crate) fn from_parts(
        levels: HashMap<ScopeFamily, Level>,
        bindings: BindingStore,
        parent: Option<Rc<Frame>>,
        origin: FrameOrigin,
        depth: usize,
    ) -> Rc<Frame> {
        Rc::new(Frame {
            levels,
            bindings,
            parent,
            origin,
            depth,
        })
    }

    pub(crate) fn levels(&self) -> &HashMap<ScopeFamily, Level> {
        &self.levels
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("levels", &self.levels)
            .field("origin", &self.origin)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Unlinks uniquely held ancestors one at a time. A chain can be far deeper
/// than any single family's level, so the default recursive drop would run
/// out of stack.
impl Drop for Frame {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(parent) = next {
            next = match Rc::try_unwrap(parent) {
                Ok(mut frame) => frame.parent.take(),
                Err(_) => None,
            };
        }
    }
}
