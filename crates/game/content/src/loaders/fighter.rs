//! Fighter template loader.

use std::path::Path;

use crate::fighter::FighterTemplate;
use crate::loaders::{LoadResult, read_file};

/// Loader for the fighter template from RON files.
pub struct FighterLoader;

impl FighterLoader {
    /// Load the fighter template from a RON file.
    ///
    /// Omitted fields take the built-in starting values.
    pub fn load(path: &Path) -> LoadResult<FighterTemplate> {
        let content = read_file(path)?;
        let template: FighterTemplate = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse fighter template RON: {}", e))?;

        Ok(template)
    }
}
