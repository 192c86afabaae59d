//! Closure leaves.
//!
//! Leaves are where a tree touches the blackboard. Rather than asking users
//! to implement [`Behavior`] for every check, the two leaf kinds wrap plain
//! closures: a [`Condition`] reads the context, an [`Action`] mutates it.

use crate::node::Behavior;
use crate::Status;

/// Read-only predicate over the context.
pub struct Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    check: F,
    _ctx: std::marker::PhantomData<fn(&C)>,
}

impl<C, F> Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    pub fn new(check: F) -> Self {
        Self {
            check,
            _ctx: std::marker::PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    fn tick(&self, ctx: &mut C) -> Status {
        Status::from_bool((self.check)(ctx))
    }
}

/// Mutating step. The closure returns whether the step applied.
pub struct Action<C, F>
where
    F: Fn(&mut C) -> bool + Send + Sync,
{
    apply: F,
    _ctx: std::marker::PhantomData<fn(&C)>,
}

impl<C, F> Action<C, F>
where
    F: Fn(&mut C) -> bool + Send + Sync,
{
    pub fn new(apply: F) -> Self {
        Self {
            apply,
            _ctx: std::marker::PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Action<C, F>
where
    F: Fn(&mut C) -> bool + Send + Sync,
{
    fn tick(&self, ctx: &mut C) -> Status {
        Status::from_bool((self.apply)(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_reads_without_mutating() {
        let over_ten = Condition::new(|v: &i32| *v > 10);
        let mut low = 5;
        let mut high = 15;
        assert_eq!(over_ten.tick(&mut low), Status::Failure);
        assert_eq!(over_ten.tick(&mut high), Status::Success);
        assert_eq!(low, 5);
    }

    #[test]
    fn action_mutates_and_reports() {
        let drain = Action::new(|v: &mut i32| {
            if *v > 0 {
                *v -= 1;
                true
            } else {
                false
            }
        });
        let mut v = 1;
        assert_eq!(drain.tick(&mut v), Status::Success);
        assert_eq!(v, 0);
        assert_eq!(drain.tick(&mut v), Status::Failure);
    }
}
