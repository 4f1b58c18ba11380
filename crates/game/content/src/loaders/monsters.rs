//! Monster catalog loader.

use std::collections::HashSet;
use std::path::Path;

use combat_core::Dice;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::monster::MonsterTemplate;

/// Monster catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonsterCatalog {
    pub monsters: Vec<MonsterTemplate>,
}

impl MonsterCatalog {
    pub fn get(&self, id: &str) -> Option<&MonsterTemplate> {
        self.monsters.iter().find(|template| template.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.monsters.iter().map(|template| template.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Uniformly picks a template.
    pub fn choose(&self, dice: &mut Dice<'_>) -> Option<&MonsterTemplate> {
        let last = u32::try_from(self.monsters.len()).ok()?.checked_sub(1)?;
        let index = dice.roll(0, last) as usize;
        self.monsters.get(index)
    }
}

/// Loader for the monster catalog from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    /// Load the monster catalog from a RON file.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed RON, and duplicate monster ids.
    /// Ability effects with unsupported kinds are not errors; they are
    /// dropped when the ability is used.
    pub fn load(path: &Path) -> LoadResult<MonsterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MonsterCatalog> {
        let catalog: MonsterCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for template in &catalog.monsters {
            if !seen.insert(template.id.as_str()) {
                anyhow::bail!("Duplicate monster id '{}'", template.id);
            }
        }

        tracing::debug!(count = catalog.len(), "monster catalog loaded");
        Ok(catalog)
    }
}
