//! Deterministic combat model shared across the runtime and offline tools.
//!
//! `combat-core` defines the canonical combat data (entities, attributes,
//! the engagement state machine, skill definitions) and the pure resolution
//! rules over them. It performs no I/O and holds no async state; the
//! orchestration layer drives every mutation through the types exported
//! here.
pub mod attributes;
pub mod entity;
pub mod fsm;
pub mod registry;
pub mod skill;

pub use attributes::{AttributeKind, Attributes};
pub use entity::{CombatEntity, EntityId, Side, SpawnData, Vec3};
pub use fsm::{CombatOutcome, CombatPhase, CombatStateMachine};
pub use registry::{EntityRegistry, RegistryError};
pub use skill::{SkillCatalog, SkillDefinition, SkillEffect, SkillId, spell_damage, strike_damage};
