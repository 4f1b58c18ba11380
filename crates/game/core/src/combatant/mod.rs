//! Combatant capability consumed by the encounter engine.
//!
//! The engine never sees a concrete combatant family. Everything it needs,
//! producing action bundles, resolving incoming damage, and reading the stats
//! shown on the combat pane, goes through [`Combatant`].
//!
//! Every call that may narrate or draw randomness receives the encounter's
//! [`CombatContext`], so combatants never reach for global loggers or RNGs.

pub mod defense;
pub mod stats;

pub use defense::{
    ArmorMitigation, DefensePipeline, DefenseStage, DefenseStageSpec, DefenseView,
    ElementalResistance, Evasion, Immunity, IncomingHit, MinimumDamage,
};
pub use stats::{Growth, StatKind, Stats};

use crate::effect::ActionBundle;
use crate::element::Element;
use crate::ledger::ModifierLedger;
use crate::log::CombatLog;
use crate::rng::Dice;

/// One of the two encounter sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Side 1, player-controlled.
    Hero,
    /// Side 2, AI-controlled.
    Foe,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Hero => Self::Foe,
            Self::Foe => Self::Hero,
        }
    }

    /// 1 for the hero, 2 for the foe.
    pub const fn number(self) -> u8 {
        match self {
            Self::Hero => 1,
            Self::Foe => 2,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Hero => 0,
            Self::Foe => 1,
        }
    }
}

/// Narration sink and random source handed to combatants.
#[derive(Debug)]
pub struct CombatContext<'r> {
    pub log: CombatLog,
    pub dice: Dice<'r>,
}

impl<'r> CombatContext<'r> {
    pub fn new(log: CombatLog, dice: Dice<'r>) -> Self {
        Self { log, dice }
    }

    /// Shorthand for `self.log.push`.
    pub fn narrate(&mut self, message: impl AsRef<str>) {
        self.log.push(message);
    }
}

/// Result of a turn-taking call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnAction {
    /// False grants the same side another action without yielding.
    pub ends_turn: bool,
    pub bundle: ActionBundle,
}

impl TurnAction {
    pub fn ends(bundle: ActionBundle) -> Self {
        Self {
            ends_turn: true,
            bundle,
        }
    }

    pub fn continues(bundle: ActionBundle) -> Self {
        Self {
            ends_turn: false,
            bundle,
        }
    }
}

/// Named special resource (Heroism, Mana, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecialResource<'a> {
    pub name: &'a str,
    pub amount: u32,
}

/// Capability every combatant family implements.
pub trait Combatant {
    // ===== identity and stats =====
    fn name(&self) -> &str;

    /// Class or family label shown next to the level.
    fn class_name(&self) -> &str;

    fn level(&self) -> u32;

    fn hit_points(&self) -> u32;

    fn max_hit_points(&self) -> u32;

    fn attack_power(&self) -> u32;

    fn defense_power(&self) -> u32;

    fn agility(&self) -> u32;

    /// Outgoing damage modifiers by element (percent).
    fn damage_modifiers(&self) -> &ModifierLedger;

    /// Incoming damage modifiers by element (percent).
    fn defense_modifiers(&self) -> &ModifierLedger;

    fn special(&self) -> Option<SpecialResource<'_>> {
        None
    }

    fn is_alive(&self) -> bool {
        self.hit_points() > 0
    }

    // ===== actions =====
    /// Basic attack.
    fn attack(&mut self, ctx: &mut CombatContext<'_>) -> ActionBundle;

    /// AI turn. Defaults to a basic attack that ends the turn.
    fn take_turn(&mut self, ctx: &mut CombatContext<'_>) -> TurnAction {
        TurnAction::ends(self.attack(ctx))
    }

    /// Names of the special actions currently available, in menu order.
    fn skills(&self) -> Vec<String> {
        Vec::new()
    }

    /// Runs the special action at `index` (0-based) in [`Combatant::skills`].
    /// Returns `None` when no action exists at that slot.
    fn special_action(&mut self, index: usize, ctx: &mut CombatContext<'_>) -> Option<TurnAction> {
        let _ = (index, ctx);
        None
    }

    /// Resolves incoming damage and returns whether the combatant is still alive.
    fn take_damage(
        &mut self,
        amount: u32,
        element: Element,
        template: &str,
        ctx: &mut CombatContext<'_>,
    ) -> bool;

    // ===== consumables =====
    fn healing_potions(&self) -> u32 {
        0
    }

    fn escape_scrolls(&self) -> u32 {
        0
    }

    /// Drinks a healing potion. Healing is applied here; the returned bundle
    /// only carries a `Heal` record. A failed attempt does not end the turn.
    fn drink_potion(&mut self, ctx: &mut CombatContext<'_>) -> TurnAction {
        ctx.narrate(format!("{} has no healing potions", self.name()));
        TurnAction::continues(ActionBundle::empty(""))
    }

    /// Consumes an escape scroll, returning false when none are left.
    fn use_escape_scroll(&mut self) -> bool {
        false
    }

    // ===== rewards =====
    fn gold(&self) -> u32 {
        0
    }

    /// Experience granted to whoever defeats this combatant.
    fn experience_reward(&self) -> u32 {
        0
    }

    /// Called on the survivor when the opponent dies.
    fn win_battle(&mut self, defeated: &dyn Combatant, ctx: &mut CombatContext<'_>) {
        let _ = (defeated, ctx);
    }
}
