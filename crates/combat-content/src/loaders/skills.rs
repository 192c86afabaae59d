//! Skill catalog loader.

use std::path::Path;

use combat_core::SkillDefinition;
use serde::Deserialize;

use crate::book::SkillBook;
use crate::loaders::{LoadResult, read_file};

#[derive(Deserialize)]
struct SkillFile {
    #[serde(default)]
    skill: Vec<SkillDefinition>,
}

/// Loader for skill catalogs from TOML files.
///
/// File shape:
///
/// ```toml
/// [[skill]]
/// id = "fireball"
/// name = "Fireball"
/// cost = 10
/// cooldown = 1.5
/// effect = { kind = "damage", amount = 30 }
/// ```
pub struct SkillLoader;

impl SkillLoader {
    /// Load a skill catalog from a TOML file.
    pub fn load(path: &Path) -> LoadResult<SkillBook> {
        let content = read_file(path)?;
        Self::load_str(&content)
    }

    /// Parse a skill catalog from TOML text.
    pub fn load_str(content: &str) -> LoadResult<SkillBook> {
        let file: SkillFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill TOML: {}", e))?;

        let mut book = SkillBook::new();
        for skill in file.skill {
            book.insert(skill);
        }
        Ok(book)
    }
}
