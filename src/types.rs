//! Core identifiers shared by every layer of the engine.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Nesting depth of a scope family. Level 0 means "never entered".
pub type Level = usize;

/// Identity of one logical thread of control (an OS thread's root chain or a
/// resumable computation). Unique across the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain#{}", self.0)
    }
}

/// The owner type of a scope family.
///
/// Equality and hashing use the `TypeId` only; the name is kept for logs and errors.
#[derive(Clone, Copy)]
pub struct OwnerTag {
    id: TypeId,
    name: &'static str,
}

impl OwnerTag {
    pub fn of<O: ?Sized + 'static>() -> Self {
        OwnerTag {
            id: TypeId::of::<O>(),
            name: std::any::type_name::<O>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for OwnerTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OwnerTag {}

impl Hash for OwnerTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for OwnerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An (owner-type, key) pair identifying one dynamically scoped variable.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ScopeFamily {
    owner: OwnerTag,
    key: Arc<str>,
}

impl ScopeFamily {
    pub fn new(owner: OwnerTag, key: impl Into<Arc<str>>) -> Self {
        ScopeFamily {
            owner,
            key: key.into(),
        }
    }

    pub fn owner(&self) -> OwnerTag {
        self.owner
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for ScopeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", short_type_name(self.owner.name), &*self.key)
    }
}

impl fmt::Display for ScopeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", short_type_name(self.owner.name), self.key)
    }
}

/// Strip module paths so `dynscope::scope::ContextStack<alloc::string::String>`
/// reads as `ContextStack<String>`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            '<' | '>' | ',' | ' ' | '(' | ')' | '&' | '[' | ']' | ';' => {
                out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    out
}
