//! Blackboard the behavior trees evaluate against.

use combat_core::{AttributeKind, CombatEntity, EntityId, SkillId};

/// Scalar view of one entity, copied out of the registry for the duration
/// of a single evaluation.
#[derive(Clone, Debug)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: String,
    pub health: i32,
    pub max_health: i32,
    pub energy: i32,
    pub alive: bool,
}

impl EntitySnapshot {
    pub fn of(entity: &CombatEntity) -> Self {
        Self {
            id: entity.id.clone(),
            kind: entity.kind.clone(),
            health: entity.health(),
            max_health: entity.attributes.get(AttributeKind::MaxHealth),
            energy: entity.attributes.get(AttributeKind::Energy),
            alive: entity.alive,
        }
    }

    /// Current health as a fraction of max. Zero max reads as empty.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// What a tree decided this tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiDecision {
    Cast {
        skill: SkillId,
        target: Option<EntityId>,
    },
    Hold,
}

/// Per-evaluation blackboard: the acting entity, its chosen target, and the
/// decision slot the action leaves write into.
#[derive(Debug)]
pub struct AiContext {
    pub me: EntitySnapshot,
    pub target: Option<EntitySnapshot>,
    decision: Option<AiDecision>,
}

impl AiContext {
    pub fn new(me: EntitySnapshot, target: Option<EntitySnapshot>) -> Self {
        Self {
            me,
            target,
            decision: None,
        }
    }

    pub fn target_alive(&self) -> bool {
        self.target.as_ref().is_some_and(|t| t.alive)
    }

    /// Records the decision. First write wins within one evaluation, which
    /// matches selector short-circuiting.
    pub fn decide(&mut self, decision: AiDecision) {
        if self.decision.is_none() {
            self.decision = Some(decision);
        }
    }

    /// Convenience for the common "cast at my target" leaf.
    pub fn decide_cast(&mut self, skill: &str, at_target: bool) {
        let target = if at_target {
            self.target.as_ref().map(|t| t.id.clone())
        } else {
            None
        };
        self.decide(AiDecision::Cast {
            skill: SkillId::from(skill),
            target,
        });
    }

    pub(crate) fn take_decision(&mut self) -> Option<AiDecision> {
        self.decision.take()
    }
}
