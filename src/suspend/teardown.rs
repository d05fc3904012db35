//! Teardown journal for cancelled computations.
//!
//! While a suspended computation is being torn down, every scope guard that
//! exits (or fails to) is recorded here so the canceller gets a full report
//! instead of a log line per guard.

use crate::error::ScopeError;
use crate::types::{Level, ScopeFamily};
use std::cell::RefCell;

/// One guard exit performed during teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitRecord {
    pub family: ScopeFamily,
    pub level: Level,
}

/// Outcome of cancelling a computation.
///
/// Failures are secondary: the computation is cancelled regardless.
#[derive(Debug, Default)]
pub struct CancelReport {
    /// Guard exits in the order they ran (innermost first).
    pub exited: Vec<ExitRecord>,
    /// Guards that could not exit.
    pub failures: Vec<ScopeError>,
}

impl CancelReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

thread_local! {
    static JOURNALS: RefCell<Vec<CancelReport>> = const { RefCell::new(Vec::new()) };
}

/// An open journal; teardowns nest, each one collecting only its own exits.
pub(crate) struct Journal {
    depth: usize,
    closed: bool,
}

impl Journal {
    pub(crate) fn open() -> Self {
        let depth = JOURNALS.with(|journals| {
            let mut journals = journals.borrow_mut();
            journals.push(CancelReport::default());
            journals.len() - 1
        });
        Journal {
            depth,
            closed: false,
        }
    }

    pub(crate) fn close(mut self) -> CancelReport {
        self.closed = true;
        JOURNALS.with(|journals| {
            let mut journals = journals.borrow_mut();
            let report = journals.pop().unwrap_or_default();
            journals.truncate(self.depth);
            report
        })
    }
}

impl Drop for Journal {
    fn drop(&mut self) {
        if !self.closed {
            JOURNALS.with(|journals| journals.borrow_mut().truncate(self.depth));
        }
    }
}

pub(crate) fn record_exit(family: &ScopeFamily, level: Level) {
    JOURNALS.with(|journals| {
        if let Some(report) = journals.borrow_mut().last_mut() {
            report.exited.push(ExitRecord {
                family: family.clone(),
                level,
            });
        }
    });
}

/// Hand a cleanup failure to the open journal. Returns false when no
/// teardown is in progress and the caller has to report it itself.
pub(crate) fn report_failure(err: ScopeError) -> bool {
    JOURNALS.with(|journals| match journals.borrow_mut().last_mut() {
        Some(report) => {
            report.failures.push(err);
            true
        }
        None => false,
    })
}
