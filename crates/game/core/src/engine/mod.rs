//! Encounter engine: turn order, effect dispatch, and termination.
//!
//! An [`Encounter`] is created per fight. It borrows both combatants for its
//! whole lifetime and exclusively owns everything that only exists during the
//! fight: both sides' modifier ledgers, liveness flags, identified flags, the
//! turn counter, the combat log, and the dice.
//!
//! # State machine
//!
//! ```text
//! new() ──initiative──▶ Active(first)
//! Active(side) ──end_turn──▶ Active(side.opponent())
//! Active(_) ──death──▶ Terminated(Victory | Defeat)
//! Active(_) ──escape──▶ Terminated(Escaped(side))
//! ```
//!
//! Terminal states are absorbing: every mutating call on a terminated
//! encounter returns [`EncounterError::Terminated`].

mod commands;
mod dispatch;
mod errors;
mod hook;
mod turns;

pub use commands::Command;
pub use dispatch::DispatchOutcome;
pub use errors::EncounterError;
pub use hook::{NoopHook, PresentationHook};
pub use turns::Initiative;

use crate::combatant::{CombatContext, Combatant, Side};
use crate::config::EncounterConfig;
use crate::element::Element;
use crate::ledger::{Multiplier, SideModifiers};
use crate::log::CombatLog;
use crate::rng::{Dice, RngOracle};

/// How a finished encounter ended, from the hero's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The foe died.
    Victory,
    /// The hero died.
    Defeat,
    /// The given side left the fight.
    Escaped(Side),
}

/// Current position in the encounter state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterState {
    Active(Side),
    Terminated(Termination),
}

impl EncounterState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    pub fn side_to_move(&self) -> Option<Side> {
        match self {
            Self::Active(side) => Some(*side),
            Self::Terminated(_) => None,
        }
    }
}

/// One fight between a hero and a foe.
pub struct Encounter<'a> {
    combatants: [&'a mut dyn Combatant; 2],
    modifiers: [SideModifiers; 2],
    alive: [bool; 2],
    identified: [bool; 2],
    state: EncounterState,
    initiative: Initiative,
    turn: u32,
    actions_this_turn: u32,
    config: EncounterConfig,
    ctx: CombatContext<'a>,
    hook: Box<dyn PresentationHook + 'a>,
}

impl<'a> Encounter<'a> {
    /// Upper bound on consecutive actions by one side before its turn is
    /// ended regardless of what the actions request.
    pub const MAX_ACTIONS_PER_TURN: u32 = 8;

    /// Starts a fight and rolls initiative.
    ///
    /// The hero's speed is its defense power; the foe's speed is its agility.
    pub fn new(
        hero: &'a mut dyn Combatant,
        foe: &'a mut dyn Combatant,
        rng: &'a dyn RngOracle,
        seed: u64,
        config: EncounterConfig,
    ) -> Self {
        let mut dice = Dice::new(rng, seed);
        let initiative = Initiative::roll(hero.defense_power(), foe.agility(), &mut dice);
        let first = initiative.first();

        let mut ctx = CombatContext::new(CombatLog::from_config(&config), dice);
        if first == Side::Foe {
            ctx.narrate(format!("{} acts before you are ready!", foe.name()));
        }

        tracing::info!(
            hero = hero.name(),
            foe = foe.name(),
            hero_initiative = initiative.hero,
            foe_initiative = initiative.foe,
            first = %first,
            "encounter started"
        );

        Self {
            combatants: [hero, foe],
            modifiers: [SideModifiers::new(), SideModifiers::new()],
            alive: [true, true],
            identified: [true, config.reveal_foe],
            state: EncounterState::Active(first),
            initiative,
            turn: 1,
            actions_this_turn: 0,
            config,
            ctx,
            hook: Box::new(NoopHook),
        }
    }

    /// Installs the presentation hook called after ledger changes.
    #[must_use]
    pub fn with_hook(mut self, hook: impl PresentationHook + 'a) -> Self {
        self.hook = Box::new(hook);
        self
    }

    // ===== queries =====

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminated()
    }

    /// Side whose combatant won, if the fight ended by death.
    pub fn winner(&self) -> Option<Side> {
        match self.state {
            EncounterState::Terminated(Termination::Victory) => Some(Side::Hero),
            EncounterState::Terminated(Termination::Defeat) => Some(Side::Foe),
            _ => None,
        }
    }

    /// True while both liveness flags are set.
    pub fn combatants_alive(&self) -> bool {
        self.alive[0] && self.alive[1]
    }

    pub fn is_alive(&self, side: Side) -> bool {
        self.alive[side.index()]
    }

    pub fn is_identified(&self, side: Side) -> bool {
        self.identified[side.index()]
    }

    pub fn initiative(&self) -> Initiative {
        self.initiative
    }

    /// Turn counter, starting at 1 and advanced by every completed turn.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn combatant(&self, side: Side) -> &dyn Combatant {
        &*self.combatants[side.index()]
    }

    pub fn modifiers(&self, side: Side) -> &SideModifiers {
        &self.modifiers[side.index()]
    }

    /// Read-time multiplier for an attack of `element` by `attacker`.
    pub fn multiplier(&self, attacker: Side, element: Element) -> Multiplier {
        Multiplier::between(
            &self.modifiers[attacker.index()],
            &self.modifiers[attacker.opponent().index()],
            element,
            &self.config,
        )
    }

    pub fn log(&self) -> &CombatLog {
        &self.ctx.log
    }

    /// Appends narration to the combat log.
    pub fn narrate(&mut self, message: impl AsRef<str>) {
        self.ctx.narrate(message);
    }

    // ===== presentation =====

    /// Renders the combat pane and hands it to the presentation hook.
    pub fn refresh(&mut self) {
        let pane = crate::render::combat_pane(self);
        self.hook.refresh(&pane, &self.ctx.log);
    }

    // ===== turn flow =====

    /// Passes the move to the other side.
    pub fn end_turn(&mut self) -> Result<EncounterState, EncounterError> {
        let side = self.active_side()?;
        self.state = EncounterState::Active(side.opponent());
        self.turn += 1;
        self.actions_this_turn = 0;
        tracing::trace!(turn = self.turn, next = %side.opponent(), "turn ended");
        Ok(self.state)
    }

    fn active_side(&self) -> Result<Side, EncounterError> {
        match self.state {
            EncounterState::Active(side) => Ok(side),
            EncounterState::Terminated(reason) => Err(EncounterError::Terminated(reason)),
        }
    }

    fn ensure_to_move(&self, side: Side) -> Result<(), EncounterError> {
        let active = self.active_side()?;
        if active != side {
            return Err(EncounterError::OutOfTurn { side, active });
        }
        Ok(())
    }

    fn terminate(&mut self, reason: Termination) {
        tracing::info!(?reason, turn = self.turn, "encounter ended");
        self.state = EncounterState::Terminated(reason);
    }
}

impl std::fmt::Debug for Encounter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encounter")
            .field("hero", &self.combatants[0].name())
            .field("foe", &self.combatants[1].name())
            .field("state", &self.state)
            .field("turn", &self.turn)
            .field("alive", &self.alive)
            .field("identified", &self.identified)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Encounter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::render::combat_pane(self))
    }
}
