//! Session-scoped registry of active character names.

use std::collections::BTreeSet;

use crate::error::{CombatError, ErrorSeverity};

/// Maximum number of spaces allowed in a character name.
pub const MAX_NAME_SPACES: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("character name must not be empty")]
    Empty,

    #[error("invalid character name {0:?}: use letters and at most {MAX_NAME_SPACES} spaces")]
    InvalidName(String),

    #[error("a character named {0} already exists")]
    Duplicate(String),
}

impl CombatError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "REGISTRY_EMPTY_NAME",
            Self::InvalidName(_) => "REGISTRY_INVALID_NAME",
            Self::Duplicate(_) => "REGISTRY_DUPLICATE_NAME",
        }
    }
}

/// Validates a raw name and returns its title-cased form.
pub fn normalize_name(raw: &str) -> Result<String, RegistryError> {
    let letters: Vec<char> = raw.chars().filter(|c| *c != ' ').collect();
    if letters.is_empty() {
        return Err(RegistryError::Empty);
    }

    let spaces = raw.chars().filter(|c| *c == ' ').count();
    if spaces > MAX_NAME_SPACES || !letters.iter().all(|c| c.is_alphabetic()) {
        return Err(RegistryError::InvalidName(raw.to_string()));
    }

    let mut titled = String::with_capacity(raw.len());
    let mut word_start = true;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if word_start {
                titled.extend(c.to_uppercase());
            } else {
                titled.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            titled.push(c);
            word_start = true;
        }
    }
    Ok(titled)
}

/// Names of the characters alive in the current session.
///
/// Created once per session and cleared on teardown.
#[derive(Clone, Debug, Default)]
pub struct CharacterRegistry {
    names: BTreeSet<String>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `raw` and returns the stored, title-cased name.
    pub fn register(&mut self, raw: &str) -> Result<String, RegistryError> {
        let name = normalize_name(raw)?;
        if !self.names.insert(name.clone()) {
            return Err(RegistryError::Duplicate(name));
        }
        tracing::debug!(%name, "character registered");
        Ok(name)
    }

    /// Frees a name. Returns false when it was not registered.
    pub fn release(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}
