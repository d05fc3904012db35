//! Suspension Boundary Manager
//!
//! A [`Resumable`] is a computation that can park itself with
//! `co.suspend(value).await` and be resumed later from an unrelated dynamic
//! context. Every resumption and every suspension is a boundary where the
//! active context chain is swapped:
//!
//! - on resume, the computation's chain captured at its last suspension is
//!   composed with the caller's current frame (families the computation owns
//!   come from its own chain, everything else from the caller) and installed;
//! - on suspend, the computation's chain is captured verbatim and the caller's
//!   chain is reinstalled.
//!
//! Nested computations follow the same rule one boundary per level, because
//! the "caller" of an inner computation is simply whatever chain is active.

pub mod co;
pub mod teardown;

pub use co::{Co, Suspend};
pub use teardown::{CancelReport, ExitRecord};

use crate::context::{self, ContextChain};
use crate::error::ScopeError;
use crate::frame::Frame;
use crate::types::ChainId;
use futures::future::LocalBoxFuture;
use futures::task::noop_waker_ref;
use futures::FutureExt;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::task::{Context, Poll};
use teardown::Journal;
use tracing::{debug, warn};

type Body<Y, R> = Box<dyn FnOnce(Co<Y>) -> LocalBoxFuture<'static, anyhow::Result<R>>>;

/// Lifecycle of a resumable computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Created, never resumed.
    Created,
    /// Parked at a suspension point.
    Suspended,
    /// Body returned `Ok`.
    Completed,
    /// Body returned `Err`, or awaited a foreign future.
    Failed,
    /// Torn down by [`Resumable::cancel`] or by drop.
    Cancelled,
    /// Body panicked while running.
    Poisoned,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Created | Status::Suspended)
    }
}

/// What a single resumption produced
pub enum ResumeOutcome<Y, R> {
    Suspended(Y),
    Completed(R),
    Failed(anyhow::Error),
}

impl<Y, R> ResumeOutcome<Y, R> {
    pub fn is_suspended(&self) -> bool {
        matches!(self, ResumeOutcome::Suspended(_))
    }

    /// The yielded value, if the computation suspended.
    pub fn suspended(self) -> Option<Y> {
        match self {
            ResumeOutcome::Suspended(value) => Some(value),
            _ => None,
        }
    }

    /// The return value, if the computation completed.
    pub fn completed(self) -> Option<R> {
        match self {
            ResumeOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }
}

impl<Y: fmt::Debug, R: fmt::Debug> fmt::Debug for ResumeOutcome<Y, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumeOutcome::Suspended(value) => f.debug_tuple("Suspended").field(value).finish(),
            ResumeOutcome::Completed(value) => f.debug_tuple("Completed").field(value).finish(),
            ResumeOutcome::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// Swaps a computation's chain in for the duration of one boundary crossing.
///
/// If the body panics, dropping the boundary puts the caller's chain back.
struct Boundary {
    caller: Option<ContextChain>,
}

impl Boundary {
    fn cross(chain: ContextChain) -> Self {
        Boundary {
            caller: Some(context::install(chain)),
        }
    }

    /// Reinstall the caller's chain and return the computation's.
    fn close(mut self) -> ContextChain {
        let caller = self.caller.take().unwrap_or_else(ContextChain::root);
        context::install(caller)
    }
}

impl Drop for Boundary {
    fn drop(&mut self) {
        if let Some(caller) = self.caller.take() {
            context::install(caller);
        }
    }
}

/// A resumable computation yielding `Y` and finishing with `R`.
pub struct Resumable<Y, R> {
    id: ChainId,
    chain: Option<ContextChain>,
    body: Option<Body<Y, R>>,
    future: Option<LocalBoxFuture<'static, anyhow::Result<R>>>,
    airlock: co::Airlock<Y>,
    status: Status,
}

impl<Y: 'static, R: 'static> Resumable<Y, R> {
    /// Create a computation from `body`. Nothing runs until the first resume.
    ///
    /// The active frame is captured now; families entered at this point stay
    /// with the computation for its whole life.
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Co<Y>) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<R>> + 'static,
    {
        let chain = ContextChain::spawned_from(&context::snapshot());
        debug!(chain = %chain.id(), owned = chain.owned().len(), "create");
        Resumable {
            id: chain.id(),
            chain: Some(chain),
            body: Some(Box::new(move |co| body(co).boxed_local())),
            future: None,
            airlock: Rc::new(RefCell::new(None)),
            status: Status::Created,
        }
    }
}

impl<Y, R> Resumable<Y, R> {
    pub fn id(&self) -> ChainId {
        self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// The frame captured at the last suspension (or creation).
    pub fn captured(&self) -> Option<&Rc<Frame>> {
        self.chain.as_ref().map(ContextChain::head)
    }

    /// Run the computation until it suspends or finishes.
    pub fn resume(&mut self) -> Result<ResumeOutcome<Y, R>, ScopeError> {
        if self.status.is_terminal() {
            return Err(ScopeError::ResumeAfterCompletion(self.id));
        }
        let own = self
            .chain
            .take()
            .ok_or(ScopeError::ResumeAfterCompletion(self.id))?;

        let resumed = own.resumed_under(&context::snapshot());
        debug!(chain = %self.id, owned = resumed.owned().len(), "resume");

        // Stays poisoned if the body unwinds past this point.
        self.status = Status::Poisoned;
        let boundary = Boundary::cross(resumed);

        let mut future = match (self.future.take(), self.body.take()) {
            (Some(future), _) => future,
            (None, Some(body)) => body(Co::new(Rc::clone(&self.airlock))),
            (None, None) => {
                self.chain = Some(boundary.close());
                self.status = Status::Failed;
                return Err(ScopeError::ResumeAfterCompletion(self.id));
            }
        };

        let mut cx = Context::from_waker(noop_waker_ref());
        let poll = future.as_mut().poll(&mut cx);
        self.chain = Some(boundary.close());

        match poll {
            Poll::Pending => {
                let yielded = self.airlock.borrow_mut().take();
                self.future = Some(future);
                match yielded {
                    Some(value) => {
                        debug!(chain = %self.id, "suspend");
                        self.status = Status::Suspended;
                        Ok(ResumeOutcome::Suspended(value))
                    }
                    None => {
                        warn!(chain = %self.id, "Computation awaited a foreign future; tearing down");
                        let report = self.teardown();
                        log_failures(self.id, &report);
                        self.status = Status::Failed;
                        Err(ScopeError::StrayPending(self.id))
                    }
                }
            }
            Poll::Ready(Ok(value)) => {
                debug!(chain = %self.id, "complete");
                self.status = Status::Completed;
                Ok(ResumeOutcome::Completed(value))
            }
            Poll::Ready(Err(err)) => {
                debug!(chain = %self.id, error = %err, "failed");
                self.status = Status::Failed;
                Ok(ResumeOutcome::Failed(err))
            }
        }
    }

    /// Abandon the computation, running every pending scope exit exactly once.
    ///
    /// Cancelling a computation that never started or already finished does
    /// nothing and returns an empty report.
    pub fn cancel(&mut self) -> CancelReport {
        match self.status {
            Status::Created => {
                self.body = None;
                self.status = Status::Cancelled;
                debug!(chain = %self.id, "cancel before start");
                CancelReport::default()
            }
            Status::Suspended => {
                let report = self.teardown();
                self.status = Status::Cancelled;
                debug!(
                    chain = %self.id,
                    exits = report.exited.len(),
                    failures = report.failures.len(),
                    "cancel"
                );
                report
            }
            _ => CancelReport::default(),
        }
    }

    /// Drop the parked body on its own chain so guard exits see the right frames.
    fn teardown(&mut self) -> CancelReport {
        let Some(future) = self.future.take() else {
            return CancelReport::default();
        };
        let Some(own) = self.chain.take() else {
            drop(future);
            return CancelReport::default();
        };

        let boundary = Boundary::cross(own.resumed_under(&context::snapshot()));
        let journal = Journal::open();
        drop(future);
        let report = journal.close();
        self.chain = Some(boundary.close());
        report
    }
}

fn log_failures(id: ChainId, report: &CancelReport) {
    for failure in &report.failures {
        warn!(chain = %id, error = %failure, "Cleanup failed during teardown");
    }
}

impl<Y, R> Drop for Resumable<Y, R> {
    fn drop(&mut self) {
        if self.status != Status::Suspended {
            return;
        }
        let report = self.teardown();
        debug!(chain = %self.id, exits = report.exited.len(), "teardown on drop");
        log_failures(self.id, &report);
    }
}

impl<Y, R> fmt::Debug for Resumable<Y, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resumable")
            .field("id", &self.id)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
