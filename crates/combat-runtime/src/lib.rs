//! Real-time combat orchestration.
//!
//! This crate wires the deterministic model from `combat-core` into a
//! host-driven runtime: the host delivers a per-frame tick, entity spawn
//! data, and interaction events; the [`CombatOrchestrator`] owns the entity
//! registry, skill engine, behavior engine, state machine, and interaction
//! handler, and drives them in a fixed order each tick.
//!
//! Construction is explicit dependency injection through [`CombatDeps`]; no
//! globals, the host owns the orchestrator's lifecycle.
pub mod ai;
pub mod api;
pub mod interaction;
pub mod orchestrator;
pub mod skills;

pub use ai::{AiContext, AiDecision, BehaviorEngine, EntitySnapshot, TreeLibrary};
pub use api::{CombatEvent, Result, RuntimeError};
pub use interaction::{InteractionEvent, InteractionHandler};
pub use orchestrator::{CombatDeps, CombatOrchestrator, OrchestratorConfig};
pub use skills::{
    CastConfirmer, CastRejection, CastRequest, CastTicket, Confirmation, InstantConfirmer,
    SkillEngine, Submission,
};
