//! Content loaders for reading combatant data from files.
//!
//! RON holds templates (fighter, monsters); TOML holds encounter tuning.

pub mod config;
pub mod factory;
pub mod fighter;
pub mod monsters;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use fighter::FighterLoader;
pub use monsters::{MonsterCatalog, MonsterLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
