//! File loaders for combat content.

mod skills;

use std::path::Path;

pub use skills::SkillLoader;

pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a content file to a string with path context on failure.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read content file {}: {}", path.display(), e))
}
