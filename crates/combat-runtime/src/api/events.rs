//! Events emitted during an engagement for front-ends to observe.
//!
//! Consumers subscribe through the orchestrator's broadcast bus and react to
//! combat progress without blocking the tick. The bus is observability, not
//! control flow; a lagging subscriber loses the oldest events.
use combat_core::{EntityId, SkillId};

/// Events published by the orchestrator and its sub-managers.
#[derive(Debug, Clone)]
pub enum CombatEvent {
    /// An engagement transitioned into InCombat.
    CombatStarted { combat_id: String },
    /// The outcome was recorded and the engagement is ending.
    CombatEnded { victory: bool },
    /// A skill invocation finished resolution.
    SkillResolved {
        caster: EntityId,
        skill: SkillId,
        target: Option<EntityId>,
        success: bool,
    },
    /// An entity's health reached zero during the liveness sync.
    EntityDown { entity: EntityId },
}
