//! Static combat content: skill catalogs and their file loaders.
//!
//! The runtime treats content as read-only input behind the
//! [`combat_core::SkillCatalog`] trait. This crate provides the concrete
//! [`SkillBook`] implementation, a TOML loader for it, and a builtin catalog
//! for tests and quick starts.
pub mod book;
pub mod loaders;

pub use book::SkillBook;
pub use loaders::SkillLoader;
