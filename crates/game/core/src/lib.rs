//! Combat rules for Dungeon Dudes.
//!
//! `combat-core` defines the protocol between combatants and the encounter
//! engine: effects grouped into action bundles, element-keyed modifier
//! ledgers, the [`Combatant`] capability, and the [`Encounter`] state machine
//! that turns bundles into damage, buffs, and termination. Concrete combatant
//! families live in `combat-content`; this crate never names them.
//!
//! All randomness is drawn through an injected [`RngOracle`] and all narration
//! goes into the encounter's [`CombatLog`], so a fight is fully replayable
//! from its seed.
pub mod combatant;
pub mod config;
pub mod effect;
pub mod element;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod log;
pub mod registry;
pub mod render;
pub mod rng;

pub use combatant::{
    CombatContext, Combatant, DefensePipeline, DefenseStage, DefenseStageSpec, DefenseView,
    Growth, IncomingHit, Side, SpecialResource, StatKind, Stats, TurnAction,
};
pub use config::EncounterConfig;
pub use effect::{ActionBundle, Effect, EffectKind, EffectSpec, VALUE_PLACEHOLDER};
pub use element::{Element, ElementSet};
pub use engine::{
    Command, DispatchOutcome, Encounter, EncounterError, EncounterState, Initiative, NoopHook,
    PresentationHook, Termination,
};
pub use error::{CombatError, ErrorSeverity};
pub use ledger::{LedgerError, ModifierLedger, Multiplier, SideModifiers};
pub use log::CombatLog;
pub use registry::{CharacterRegistry, RegistryError};
pub use rng::{Dice, PcgRng, RngOracle, compute_seed};
