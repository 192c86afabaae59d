//! Per-entity combat AI driven by behavior trees.
//!
//! Each AI entity is assigned a named tree template; once per tick the
//! orchestrator builds an [`AiContext`] snapshot for the entity and asks the
//! [`BehaviorEngine`] to evaluate its tree. Evaluation is synchronous and
//! produces at most one [`AiDecision`], which the orchestrator turns into a
//! skill submission.
pub mod context;
pub mod engine;
pub mod templates;

pub use context::{AiContext, AiDecision, EntitySnapshot};
pub use engine::BehaviorEngine;
pub use templates::{
    BOSS_BASIC, MELEE_BASIC, RANGED_BASIC, TreeLibrary, template_for_kind,
};
