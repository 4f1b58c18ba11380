//! Content factory for loading every data file from one directory.

use std::path::{Path, PathBuf};

use combat_core::EncounterConfig;

use crate::fighter::FighterTemplate;
use crate::loaders::{ConfigLoader, FighterLoader, LoadResult, MonsterCatalog, MonsterLoader};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── encounter.toml
/// ├── fighter.ron
/// └── monsters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load encounter configuration from `encounter.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<EncounterConfig> {
        let path = self.data_dir.join("encounter.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no encounter config, using defaults");
            return Ok(EncounterConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the fighter template from `fighter.ron`.
    pub fn load_fighter(&self) -> LoadResult<FighterTemplate> {
        let path = self.data_dir.join("fighter.ron");
        FighterLoader::load(&path)
    }

    /// Load the monster catalog from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<MonsterCatalog> {
        let path = self.data_dir.join("monsters.ron");
        MonsterLoader::load(&path)
    }
}
