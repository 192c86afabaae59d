//! Unified error types surfaced by the orchestrator API.
//!
//! Every failure is handled where it arises and surfaced as a value; no
//! error here is fatal to the host. The worst case is an engagement that
//! cannot progress, recovered by `end_combat`/`shutdown` and a fresh
//! `initialize`.
use thiserror::Error;

use combat_core::{CombatPhase, EntityId, RegistryError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("combat orchestrator is not initialized")]
    NotInitialized,

    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("operation requires phase {expected}, current phase is {actual}")]
    InvalidPhase {
        expected: CombatPhase,
        actual: CombatPhase,
    },
}
