//! The yielder handed to a resumable body.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

pub(crate) type Airlock<Y> = Rc<RefCell<Option<Y>>>;

/// Suspension capability of one resumable computation.
///
/// `co.suspend(value).await` parks the computation and hands `value` to
/// whoever called [`Resumable::resume`](super::Resumable::resume).
pub struct Co<Y> {
    airlock: Airlock<Y>,
}

impl<Y> Co<Y> {
    pub(crate) fn new(airlock: Airlock<Y>) -> Self {
        Co { airlock }
    }

    pub fn suspend(&self, value: Y) -> Suspend<Y> {
        Suspend {
            airlock: Rc::clone(&self.airlock),
            value: Some(value),
        }
    }
}

impl<Y> Clone for Co<Y> {
    fn clone(&self) -> Self {
        Co {
            airlock: Rc::clone(&self.airlock),
        }
    }
}

impl<Y> fmt::Debug for Co<Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Co").finish_non_exhaustive()
    }
}

/// Future returned by [`Co::suspend`]: pending once, ready on the next poll.
#[must_use = "a suspension point does nothing unless awaited"]
pub struct Suspend<Y> {
    airlock: Airlock<Y>,
    value: Option<Y>,
}

// Never pinned-projected; the value is moved out by `Option::take`.
impl<Y> Unpin for Suspend<Y> {}

impl<Y> Future for Suspend<Y> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match this.value.take() {
            Some(value) => {
                *this.airlock.borrow_mut() = Some(value);
                Poll::Pending
            }
            None => Poll::Ready(()),
        }
    }
}
