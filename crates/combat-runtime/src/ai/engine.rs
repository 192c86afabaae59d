//! Tree assignment and per-tick evaluation.

use std::collections::HashMap;
use std::sync::Arc;

use behavior_tree::Behavior;
use combat_core::EntityId;
use tracing::{debug, trace, warn};

use super::context::{AiContext, AiDecision};
use super::templates::TreeLibrary;

/// Maps AI entities to tree templates and runs their evaluations.
pub struct BehaviorEngine {
    library: Arc<TreeLibrary>,
    assignments: HashMap<EntityId, String>,
}

impl BehaviorEngine {
    pub fn new(library: Arc<TreeLibrary>) -> Self {
        Self {
            library,
            assignments: HashMap::new(),
        }
    }

    /// Assigns a template to an entity. Last write wins.
    pub fn assign(&mut self, entity: EntityId, template: &str) {
        if !self.library.contains(template) {
            warn!(
                target: "combat::ai",
                entity = %entity,
                template,
                "assigning unknown template, entity will idle"
            );
        }
        debug!(target: "combat::ai", entity = %entity, template, "behavior tree assigned");
        self.assignments.insert(entity, template.to_owned());
    }

    pub fn unassign(&mut self, entity: &EntityId) {
        self.assignments.remove(entity);
    }

    /// The template currently assigned to an entity, if any.
    pub fn assignment(&self, entity: &EntityId) -> Option<&str> {
        self.assignments.get(entity).map(String::as_str)
    }

    /// Drops every assignment at the end of an engagement.
    pub fn clear(&mut self) {
        self.assignments.clear();
    }

    /// Evaluates the entity's assigned tree once against `ctx`.
    ///
    /// Unassigned entities are skipped silently; an assignment pointing at a
    /// template the library no longer holds is logged and skipped.
    pub fn evaluate(&self, entity: &EntityId, ctx: &mut AiContext) -> Option<AiDecision> {
        let template = self.assignments.get(entity)?;
        let Some(tree) = self.library.get(template) else {
            warn!(target: "combat::ai", entity = %entity, template, "assigned template not in library");
            return None;
        };
        let status = tree.tick(ctx);
        trace!(target: "combat::ai", entity = %entity, template, ?status, "tree evaluated");
        ctx.take_decision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::context::EntitySnapshot;
    use crate::ai::templates::{MELEE_BASIC, RANGED_BASIC};
    use combat_core::SkillId;

    fn ctx_with_target() -> AiContext {
        AiContext::new(
            EntitySnapshot {
                id: EntityId::from("e1"),
                kind: "melee_goblin".into(),
                health: 30,
                max_health: 30,
                energy: 20,
                alive: true,
            },
            Some(EntitySnapshot {
                id: EntityId::from("p1"),
                kind: "hero".into(),
                health: 100,
                max_health: 100,
                energy: 50,
                alive: true,
            }),
        )
    }

    #[test]
    fn unassigned_entity_is_skipped_without_error() {
        let engine = BehaviorEngine::new(Arc::new(TreeLibrary::with_defaults()));
        let mut ctx = ctx_with_target();
        assert_eq!(engine.evaluate(&EntityId::from("e1"), &mut ctx), None);
    }

    #[test]
    fn reassignment_is_last_write_wins() {
        let mut engine = BehaviorEngine::new(Arc::new(TreeLibrary::with_defaults()));
        engine.assign(EntityId::from("e1"), MELEE_BASIC);
        engine.assign(EntityId::from("e1"), RANGED_BASIC);
        assert_eq!(engine.assignment(&EntityId::from("e1")), Some(RANGED_BASIC));

        let mut ctx = ctx_with_target();
        let decision = engine.evaluate(&EntityId::from("e1"), &mut ctx);
        assert_eq!(
            decision,
            Some(AiDecision::Cast {
                skill: SkillId::from("piercing_bolt"),
                target: Some(EntityId::from("p1")),
            })
        );

        engine.unassign(&EntityId::from("e1"));
        assert_eq!(engine.assignment(&EntityId::from("e1")), None);
    }

    #[test]
    fn unknown_template_assignment_evaluates_to_nothing() {
        let mut engine = BehaviorEngine::new(Arc::new(TreeLibrary::with_defaults()));
        engine.assign(EntityId::from("e1"), "not_a_template");
        let mut ctx = ctx_with_target();
        assert_eq!(engine.evaluate(&EntityId::from("e1"), &mut ctx), None);
    }
}
