//! Branch nodes controlling the flow over multiple children.

use crate::node::{Behavior, BoxedBehavior};
use crate::Status;

/// Evaluates children left to right until one fails.
///
/// Short-circuited AND: the first `Failure` stops evaluation and becomes
/// the sequence result; if every child succeeds the sequence succeeds.
/// An empty sequence is vacuously `Success`.
pub struct Sequence<C> {
    children: Vec<BoxedBehavior<C>>,
}

impl<C> Sequence<C> {
    pub fn new(children: Vec<BoxedBehavior<C>>) -> Self {
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_failure() {
                return Status::Failure;
            }
        }
        Status::Success
    }
}

/// Evaluates children left to right until one succeeds.
///
/// Short-circuited OR: the first `Success` stops evaluation and becomes
/// the selector result; if every child fails the selector fails.
/// An empty selector is `Failure` (nothing was selected).
pub struct Selector<C> {
    children: Vec<BoxedBehavior<C>>,
}

impl<C> Selector<C> {
    pub fn new(children: Vec<BoxedBehavior<C>>) -> Self {
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}
