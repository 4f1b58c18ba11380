//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`LedgerError`, `EncounterError`, `RegistryError`)
//! live next to the types they guard. They share the severity classification
//! defined here.
//!
//! Failures a player can cause (no potions left, no escape scrolls) are never
//! errors: combatants narrate them and return a zero-effect bundle. The error
//! types in this crate describe programmer mistakes and protocol misuse.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Caller may retry with a different request.
    ///
    /// Examples: name already registered, dispatch for the side not to move
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: malformed character name
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    ///
    /// Examples: write to an element a ledger does not track
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for the variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
