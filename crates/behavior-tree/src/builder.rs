//! Shorthand constructors for tree assembly.
//!
//! Each helper boxes its node so templates compose as nested calls:
//!
//! ```rust
//! use behavior_tree::builder::{action, condition, selector, sequence};
//!
//! struct Ctx { hp: i32, fled: bool }
//!
//! let tree = selector(vec![
//!     sequence(vec![
//!         condition(|c: &Ctx| c.hp < 10),
//!         action(|c: &mut Ctx| { c.fled = true; true }),
//!     ]),
//!     action(|_: &mut Ctx| true),
//! ]);
//! # let _ = tree;
//! ```

use crate::branch::{Selector, Sequence};
use crate::leaf::{Action, Condition};
use crate::node::BoxedBehavior;
use crate::wrap::{Invert, Optional};

pub fn sequence<C: 'static>(children: Vec<BoxedBehavior<C>>) -> BoxedBehavior<C> {
    Box::new(Sequence::new(children))
}

pub fn selector<C: 'static>(children: Vec<BoxedBehavior<C>>) -> BoxedBehavior<C> {
    Box::new(Selector::new(children))
}

pub fn condition<C: 'static, F>(check: F) -> BoxedBehavior<C>
where
    F: Fn(&C) -> bool + Send + Sync + 'static,
{
    Box::new(Condition::new(check))
}

pub fn action<C: 'static, F>(apply: F) -> BoxedBehavior<C>
where
    F: Fn(&mut C) -> bool + Send + Sync + 'static,
{
    Box::new(Action::new(apply))
}

pub fn invert<C: 'static>(child: BoxedBehavior<C>) -> BoxedBehavior<C> {
    Box::new(Invert::new(child))
}

pub fn optional<C: 'static>(child: BoxedBehavior<C>) -> BoxedBehavior<C> {
    Box::new(Optional::new(child))
}
