//! Combatant families and the data files that describe them.
//!
//! This crate houses the concrete [`combat_core::Combatant`] implementations
//! and provides loaders for RON/TOML data files:
//! - Fighter template (base stats, starting loadout, consumables)
//! - Monster templates (stats, defenses, weighted abilities)
//! - Encounter configuration (modifier bounds, log size, fog of war)
//!
//! The encounter engine never names these types; it only sees the
//! `Combatant` capability.

pub mod fighter;
pub mod monster;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use fighter::{Armor, Fighter, FighterTemplate, Loadout, Shield, Weapon};
pub use monster::{AbilityTemplate, Monster, MonsterTemplate, Variance};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, FighterLoader, LoadResult, MonsterCatalog, MonsterLoader,
};
