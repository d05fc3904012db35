//! Dynscope: Dynamically Scoped Context Variables
//!
//! Per-key, nestable, dynamically scoped state for cooperatively scheduled
//! code. Scopes are entered and exited through [`ContextStack`] handles; every
//! logical thread of control (the OS thread itself, or a [`Resumable`]
//! computation running on it) sees its own chain of immutable, structurally
//! shared frames. Suspension boundaries swap chains so that a computation
//! resumed from an unrelated context still sees the scopes it entered before
//! it suspended.
//!
//! ```
//! use dynscope::{Co, ContextStack, Resumable};
//!
//! let stack: ContextStack<&'static str> = ContextStack::new("mystack");
//!
//! let guard = stack.enter().unwrap();
//! stack.set_value("aaa");
//! let inner = stack.clone();
//! let mut gen = Resumable::new(move |co: Co<Vec<Option<&'static str>>>| async move {
//!     let _scope = inner.enter()?;
//!     inner.set_value("generator!");
//!     co.suspend(inner.get_stack()).await;
//!     anyhow::Ok(())
//! });
//! guard.exit().unwrap();
//!
//! let seen = gen.resume().unwrap().suspended().unwrap();
//! assert_eq!(seen, vec![Some("aaa"), Some("generator!")]);
//! assert_eq!(stack.level(), 0);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod frame;
pub mod logging;
pub mod scope;
pub mod store;
pub mod suspend;
pub mod types;

pub use crate::config::{ConfigLoader, EngineConfig, Limits};
pub use context::configure;
pub use error::{ApiError, Imbalance, ScopeError};
pub use scope::{ContextStack, Global, ScopeGuard};
pub use suspend::{CancelReport, Co, ExitRecord, ResumeOutcome, Resumable, Status};
pub use types::{ChainId, Level, ScopeFamily};
