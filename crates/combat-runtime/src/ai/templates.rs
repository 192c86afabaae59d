//! Builtin behavior tree templates and the type-tag lookup.

use std::collections::HashMap;

use behavior_tree::builder::{action, condition, selector, sequence};
use behavior_tree::node::BoxedBehavior;

use super::context::{AiContext, AiDecision};

pub const BOSS_BASIC: &str = "boss_basic";
pub const RANGED_BASIC: &str = "ranged_enemy_basic";
pub const MELEE_BASIC: &str = "melee_enemy_basic";

/// Picks a template for an entity's type tag.
///
/// First match wins, so a tag like `"boss_ranged_construct"` resolves to the
/// boss template even though it would also match "ranged".
pub fn template_for_kind(kind: &str) -> &'static str {
    if kind.contains("boss") {
        BOSS_BASIC
    } else if kind.contains("ranged") {
        RANGED_BASIC
    } else {
        MELEE_BASIC
    }
}

/// Named, reusable tree definitions.
///
/// Trees are stateless (`tick` takes `&self`) so one boxed instance serves
/// every entity assigned to it.
pub struct TreeLibrary {
    templates: HashMap<String, BoxedBehavior<AiContext>>,
}

impl TreeLibrary {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Library preloaded with the three builtin templates.
    pub fn with_defaults() -> Self {
        let mut lib = Self::new();
        lib.register(BOSS_BASIC, boss_basic());
        lib.register(RANGED_BASIC, ranged_enemy_basic());
        lib.register(MELEE_BASIC, melee_enemy_basic());
        lib
    }

    pub fn register(&mut self, id: impl Into<String>, tree: BoxedBehavior<AiContext>) {
        self.templates.insert(id.into(), tree);
    }

    pub fn get(&self, id: &str) -> Option<&BoxedBehavior<AiContext>> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }
}

impl Default for TreeLibrary {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Boss: mend when badly hurt, otherwise slam the target.
fn boss_basic() -> BoxedBehavior<AiContext> {
    selector(vec![
        sequence(vec![
            condition(|c: &AiContext| c.me.health_fraction() < 0.3),
            action(|c: &mut AiContext| {
                c.decide_cast("mend", false);
                true
            }),
        ]),
        sequence(vec![
            condition(AiContext::target_alive),
            action(|c: &mut AiContext| {
                c.decide_cast("slam", true);
                true
            }),
        ]),
        action(|c: &mut AiContext| {
            c.decide(AiDecision::Hold);
            true
        }),
    ])
}

/// Ranged: bolt the target while the energy holds out.
fn ranged_enemy_basic() -> BoxedBehavior<AiContext> {
    selector(vec![
        sequence(vec![
            condition(AiContext::target_alive),
            condition(|c: &AiContext| c.me.energy >= 8),
            action(|c: &mut AiContext| {
                c.decide_cast("piercing_bolt", true);
                true
            }),
        ]),
        action(|c: &mut AiContext| {
            c.decide(AiDecision::Hold);
            true
        }),
    ])
}

/// Melee: claw whatever is standing.
fn melee_enemy_basic() -> BoxedBehavior<AiContext> {
    selector(vec![
        sequence(vec![
            condition(AiContext::target_alive),
            action(|c: &mut AiContext| {
                c.decide_cast("claw", true);
                true
            }),
        ]),
        action(|c: &mut AiContext| {
            c.decide(AiDecision::Hold);
            true
        }),
    ])
}
