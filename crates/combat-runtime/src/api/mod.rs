//! Public API types shared across the runtime surface.
pub mod errors;
pub mod events;

pub use errors::{Result, RuntimeError};
pub use events::CombatEvent;
