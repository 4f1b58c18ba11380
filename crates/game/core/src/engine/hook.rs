//! Presentation hooks invoked by the engine.
//!
//! The presentation layer owns the screen; the engine only tells it when the
//! combat pane is stale. Ledger effects (Aura, Battle Cry, Hex) always trigger
//! a refresh.

use crate::log::CombatLog;

/// Receives freshly rendered combat panes.
pub trait PresentationHook {
    fn refresh(&mut self, pane: &str, log: &CombatLog);
}

/// Hook that ignores every refresh.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHook;

impl PresentationHook for NoopHook {
    fn refresh(&mut self, _pane: &str, _log: &CombatLog) {}
}
