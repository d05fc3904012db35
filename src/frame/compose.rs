//! Composition of a suspended computation's frame with its caller's frame.

use super::Frame;
use crate::types::ScopeFamily;
use im::HashSet;
use std::rc::Rc;

/// Build the frame a computation resumes on.
///
/// Families in `owned` (level counter and every bound slot) come from `own`,
/// the frame captured at the computation's last suspension. All other
/// families come from `caller`. The result keeps `own`'s chain position so
/// that exits of scopes entered before the suspension still pop correctly.
pub fn compose(own: &Rc<Frame>, caller: &Rc<Frame>, owned: &HashSet<ScopeFamily>) -> Rc<Frame> {
    if Rc::ptr_eq(own, caller) {
        return Rc::clone(own);
    }

    let mut levels = caller.levels().clone();
    let mut bindings = caller.bindings().clone();
    for family in owned.iter() {
        levels = match own.level(family) {
            0 => levels.without(family),
            level => levels.update(family.clone(), level),
        };
        bindings = bindings.with_slots(family, own.bindings().slots(family).cloned());
    }

    Frame::from_parts(
        levels,
        bindings,
        own.parent().cloned(),
        own.origin().clone(),
        own.depth(),
    )
}
