//! Effect dispatch: applies one action bundle to the encounter.

use crate::combatant::Side;
use crate::effect::{ActionBundle, Effect, EffectKind};

use super::{Encounter, EncounterError, EncounterState, Termination};

/// Summary of one [`Encounter::dispatch`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Effects processed, including no-op heals.
    pub applied: usize,
    /// Effects skipped because the encounter ended mid-bundle.
    pub skipped: usize,
    /// Total post-multiplier damage handed to targets.
    pub damage_sent: u64,
    /// State after the bundle.
    pub state: EncounterState,
}

impl Encounter<'_> {
    /// Applies every effect of `bundle` in order on behalf of `side`.
    ///
    /// Processing stops at the first effect that terminates the encounter.
    pub fn dispatch(
        &mut self,
        side: Side,
        bundle: &ActionBundle,
    ) -> Result<DispatchOutcome, EncounterError> {
        self.ensure_to_move(side)?;
        // Zero-effect bundles are local failures and never use up the turn.
        if !bundle.is_empty() {
            self.actions_this_turn += 1;
        }

        if !bundle.message().is_empty() {
            self.ctx.narrate(bundle.message());
        }

        let mut outcome = DispatchOutcome {
            applied: 0,
            skipped: 0,
            damage_sent: 0,
            state: self.state,
        };

        for (index, effect) in bundle.iter().enumerate() {
            if let Some(damage) = self.apply(side, effect)? {
                outcome.damage_sent += u64::from(damage);
            }
            outcome.applied += 1;

            if self.is_over() {
                outcome.skipped = bundle.len() - index - 1;
                break;
            }
        }

        outcome.state = self.state;
        tracing::debug!(
            side = %side,
            applied = outcome.applied,
            skipped = outcome.skipped,
            damage = outcome.damage_sent,
            "bundle dispatched"
        );
        Ok(outcome)
    }

    /// Applies a single effect. Returns the damage sent for attacks.
    fn apply(&mut self, side: Side, effect: &Effect) -> Result<Option<u32>, EncounterError> {
        let own = side.index();
        let target = side.opponent();

        match effect.kind {
            EffectKind::Attack => {
                let damage = self.multiplier(side, effect.element).apply(effect.magnitude);
                let alive = self.combatants[target.index()].take_damage(
                    damage,
                    effect.element,
                    &effect.template,
                    &mut self.ctx,
                );
                if !alive {
                    self.resolve_death(target);
                }
                return Ok(Some(damage));
            }
            EffectKind::Heal => {}
            EffectKind::Aura => {
                self.modifiers[own]
                    .aura
                    .add(effect.element, i64::from(effect.magnitude))?;
                self.refresh();
            }
            EffectKind::BattleCry => {
                self.modifiers[own]
                    .battle_cry
                    .add(effect.element, i64::from(effect.magnitude))?;
                self.refresh();
            }
            EffectKind::Hex => {
                self.modifiers[target.index()]
                    .aura
                    .subtract(effect.element, i64::from(effect.magnitude))?;
                self.refresh();
            }
            EffectKind::Escape => {
                let line = if effect.template.is_empty() {
                    let name = self.combatants[own].name();
                    match side {
                        Side::Hero => format!("{name} escapes to town"),
                        Side::Foe => format!("{name} flees the battle"),
                    }
                } else {
                    effect.narrate(effect.magnitude)
                };
                self.ctx.narrate(line);
                self.terminate(Termination::Escaped(side));
            }
            EffectKind::Identify => {
                self.identified[target.index()] = true;
            }
        }

        Ok(None)
    }

    /// Marks `fallen` dead, ends the fight, and rewards the survivor.
    fn resolve_death(&mut self, fallen: Side) {
        self.alive[fallen.index()] = false;

        let [hero, foe] = &mut self.combatants;
        match fallen {
            Side::Foe => {
                hero.win_battle(&**foe, &mut self.ctx);
                self.terminate(Termination::Victory);
            }
            Side::Hero => {
                foe.win_battle(&**hero, &mut self.ctx);
                self.terminate(Termination::Defeat);
            }
        }
    }
}
