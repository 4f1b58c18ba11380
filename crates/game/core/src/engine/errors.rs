//! Error types for the encounter engine.

use crate::combatant::Side;
use crate::error::{CombatError, ErrorSeverity};
use crate::ledger::LedgerError;

use super::Termination;

/// Errors surfaced while driving an encounter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("encounter already ended ({0:?})")]
    Terminated(Termination),

    #[error("{side} acted out of turn: {active} is to move")]
    OutOfTurn { side: Side, active: Side },

    #[error("ledger update failed: {0}")]
    Ledger(#[from] LedgerError),
}

impl CombatError for EncounterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Terminated(_) | Self::OutOfTurn { .. } => ErrorSeverity::Recoverable,
            Self::Ledger(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Terminated(_) => "ENCOUNTER_TERMINATED",
            Self::OutOfTurn { .. } => "ENCOUNTER_OUT_OF_TURN",
            Self::Ledger(error) => error.error_code(),
        }
    }
}
