//! Type-erased bound values.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A value bound at one (family, level) slot.
///
/// Cloning shares the allocation. Two bound values are equal only when they
/// are the same allocation, so frame comparison never needs `T: PartialEq`.
#[derive(Clone)]
pub struct BoundValue(Rc<dyn Any>);

impl BoundValue {
    pub fn new<T: 'static>(value: T) -> Self {
        BoundValue(Rc::new(value))
    }

    /// Borrow the value as `T`, if that is what was bound.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    pub fn ptr_eq(&self, other: &BoundValue) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for BoundValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for BoundValue {}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundValue({:p})", Rc::as_ptr(&self.0))
    }
}
