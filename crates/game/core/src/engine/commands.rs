//! Turn-level operations layered on top of [`Encounter::dispatch`].

use crate::combatant::{Side, TurnAction};

use super::{Encounter, EncounterError, EncounterState, Termination};

/// Player command for side 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Attack,
    /// 0-based index into the hero's current skill list.
    Special(usize),
    HealingPotion,
    EscapeScroll,
}

impl Encounter<'_> {
    /// Dispatches `action` for `side`, then passes the turn when the action
    /// ends it and the fight is still on.
    pub fn resolve(
        &mut self,
        side: Side,
        action: TurnAction,
    ) -> Result<EncounterState, EncounterError> {
        self.dispatch(side, &action.bundle)?;
        if self.is_over() {
            return Ok(self.state);
        }
        if action.ends_turn || self.actions_this_turn >= Self::MAX_ACTIONS_PER_TURN {
            self.end_turn()?;
        }
        Ok(self.state)
    }

    /// Executes a player command for the hero.
    ///
    /// Commands that fail locally (unknown skill, no potions, no scrolls) are
    /// narrated and leave the hero to move.
    pub fn player_command(&mut self, command: Command) -> Result<EncounterState, EncounterError> {
        self.ensure_to_move(Side::Hero)?;
        let hero = Side::Hero.index();

        match command {
            Command::Attack => {
                let bundle = self.combatants[hero].attack(&mut self.ctx);
                self.resolve(Side::Hero, TurnAction::ends(bundle))
            }
            Command::Special(index) => {
                match self.combatants[hero].special_action(index, &mut self.ctx) {
                    Some(action) => self.resolve(Side::Hero, action),
                    None => {
                        self.ctx.narrate(format!("No special action in slot {}", index + 1));
                        Ok(self.state)
                    }
                }
            }
            Command::HealingPotion => {
                let action = self.combatants[hero].drink_potion(&mut self.ctx);
                self.resolve(Side::Hero, action)
            }
            Command::EscapeScroll => self.escape_with_scroll(Side::Hero),
        }
    }

    /// Runs the foe's turn until it yields or the fight ends.
    ///
    /// The foe gets at most [`Self::MAX_ACTIONS_PER_TURN`] actions, empty
    /// ones included.
    pub fn ai_turn(&mut self) -> Result<EncounterState, EncounterError> {
        self.ensure_to_move(Side::Foe)?;
        let foe = Side::Foe.index();

        let mut actions = 0;
        while self.state == EncounterState::Active(Side::Foe) {
            if actions == Self::MAX_ACTIONS_PER_TURN {
                self.end_turn()?;
                break;
            }
            actions += 1;
            let action = self.combatants[foe].take_turn(&mut self.ctx);
            self.resolve(Side::Foe, action)?;
        }
        Ok(self.state)
    }

    /// Leaves the fight by consuming an escape scroll.
    ///
    /// Without scrolls the attempt is narrated and `side` stays to move.
    pub fn escape_with_scroll(&mut self, side: Side) -> Result<EncounterState, EncounterError> {
        self.ensure_to_move(side)?;
        let combatant = &mut self.combatants[side.index()];

        if combatant.use_escape_scroll() {
            let line = format!("{} escapes to town with a scroll of escape", combatant.name());
            self.ctx.narrate(line);
            self.terminate(Termination::Escaped(side));
        } else {
            let line = format!("{} has no scrolls of escape", combatant.name());
            self.ctx.narrate(line);
        }
        Ok(self.state)
    }
}
