//! Wrapper nodes modifying a single child's result.

use crate::node::{Behavior, BoxedBehavior};
use crate::Status;

/// Flips the child's result (logical NOT).
pub struct Invert<C> {
    child: BoxedBehavior<C>,
}

impl<C> Invert<C> {
    pub fn new(child: BoxedBehavior<C>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Invert<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        self.child.tick(ctx).flip()
    }
}

/// Runs the child and succeeds regardless of its result.
///
/// Lets a non-essential step sit inside a [`crate::Sequence`] without being
/// able to break it.
pub struct Optional<C> {
    child: BoxedBehavior<C>,
}

impl<C> Optional<C> {
    pub fn new(child: BoxedBehavior<C>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Optional<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let _ = self.child.tick(ctx);
        Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{action, condition};

    #[test]
    fn invert_flips_both_ways() {
        let yes = Invert::new(condition(|_: &()| true));
        let no = Invert::new(condition(|_: &()| false));
        assert_eq!(yes.tick(&mut ()), Status::Failure);
        assert_eq!(no.tick(&mut ()), Status::Success);
    }

    #[test]
    fn optional_swallows_failure_but_still_runs_child() {
        let opt = Optional::new(action(|v: &mut u32| {
            *v += 1;
            false
        }));
        let mut v = 0;
        assert_eq!(opt.tick(&mut v), Status::Success);
        assert_eq!(v, 1);
    }
}
