use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use combat_core::{
    ActionBundle, CombatContext, CombatLog, Combatant, Command, Effect, EffectKind, Element,
    Encounter, EncounterConfig, EncounterError, EncounterState, ModifierLedger,
    PresentationHook, RngOracle, Side, Termination, TurnAction, effect,
};
use proptest::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

/// Oracle whose raw output never changes; every initiative draw is 1.
struct Constant(u32);

impl RngOracle for Constant {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Minimal combatant that takes damage unmitigated and replays scripted turns.
struct Dummy {
    name: String,
    hp: u32,
    max_hp: u32,
    attack: u32,
    defense: u32,
    agility: u32,
    scrolls: u32,
    script: VecDeque<TurnAction>,
    received: Vec<u32>,
    wins: u32,
    neutral: ModifierLedger,
}

impl Dummy {
    fn new(name: &str, hp: u32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            max_hp: hp,
            attack: 10,
            defense: 5,
            agility: 5,
            scrolls: 0,
            script: VecDeque::new(),
            received: Vec::new(),
            wins: 0,
            neutral: ModifierLedger::neutral(),
        }
    }

    fn speed(mut self, defense: u32, agility: u32) -> Self {
        self.defense = defense;
        self.agility = agility;
        self
    }

    fn scripted(mut self, actions: impl IntoIterator<Item = TurnAction>) -> Self {
        self.script.extend(actions);
        self
    }
}

impl Combatant for Dummy {
    fn name(&self) -> &str {
        &self.name
    }

    fn class_name(&self) -> &str {
        "Dummy"
    }

    fn level(&self) -> u32 {
        1
    }

    fn hit_points(&self) -> u32 {
        self.hp
    }

    fn max_hit_points(&self) -> u32 {
        self.max_hp
    }

    fn attack_power(&self) -> u32 {
        self.attack
    }

    fn defense_power(&self) -> u32 {
        self.defense
    }

    fn agility(&self) -> u32 {
        self.agility
    }

    fn damage_modifiers(&self) -> &ModifierLedger {
        &self.neutral
    }

    fn defense_modifiers(&self) -> &ModifierLedger {
        &self.neutral
    }

    fn attack(&mut self, _ctx: &mut CombatContext<'_>) -> ActionBundle {
        ActionBundle::new(
            [Effect::attack(self.attack as i32, Element::Physical, "<value> damage")],
            "",
        )
    }

    fn take_turn(&mut self, ctx: &mut CombatContext<'_>) -> TurnAction {
        match self.script.pop_front() {
            Some(action) => action,
            None => TurnAction::ends(self.attack(ctx)),
        }
    }

    fn take_damage(
        &mut self,
        amount: u32,
        _element: Element,
        template: &str,
        ctx: &mut CombatContext<'_>,
    ) -> bool {
        self.received.push(amount);
        self.hp = self.hp.saturating_sub(amount);
        ctx.narrate(effect::narrate(template, amount));
        self.hp > 0
    }

    fn escape_scrolls(&self) -> u32 {
        self.scrolls
    }

    fn use_escape_scroll(&mut self) -> bool {
        if self.scrolls == 0 {
            return false;
        }
        self.scrolls -= 1;
        true
    }

    fn win_battle(&mut self, _defeated: &dyn Combatant, _ctx: &mut CombatContext<'_>) {
        self.wins += 1;
    }
}

#[derive(Clone, Default)]
struct CountingHook(Rc<Cell<usize>>);

impl PresentationHook for CountingHook {
    fn refresh(&mut self, _pane: &str, _log: &CombatLog) {
        self.0.set(self.0.get() + 1);
    }
}

fn ledger(kind: EffectKind, magnitude: i32, element: Element) -> Effect {
    Effect::silent(kind, magnitude, element)
}

fn bundle(effects: impl IntoIterator<Item = Effect>) -> ActionBundle {
    ActionBundle::new(effects, "")
}

// ============================================================================
// Turn order
// ============================================================================

#[test]
fn ties_favor_the_hero() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 50).speed(7, 0);
    let mut foe = Dummy::new("Foe", 50).speed(0, 7);
    let encounter = Encounter::new(&mut hero, &mut foe, &rng, 1, EncounterConfig::default());
    assert_eq!(encounter.state(), EncounterState::Active(Side::Hero));
    assert_eq!(encounter.turn(), 1);
}

#[test]
fn faster_foe_moves_first_and_is_announced() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 50).speed(2, 0);
    let mut foe = Dummy::new("Ghoul", 50).speed(0, 9);
    let encounter = Encounter::new(&mut hero, &mut foe, &rng, 1, EncounterConfig::default());
    assert_eq!(encounter.state(), EncounterState::Active(Side::Foe));
    assert_eq!(encounter.log().last(), Some("Ghoul acts before you are ready!"));
}

proptest! {
    #[test]
    fn turn_order_replays_from_seed(hero_speed in 0u32..64, foe_speed in 0u32..64, seed in any::<u64>()) {
        let rng = combat_core::PcgRng;
        let first = |seed| {
            let mut hero = Dummy::new("Hero", 10).speed(hero_speed, 0);
            let mut foe = Dummy::new("Foe", 10).speed(0, foe_speed);
            let encounter = Encounter::new(&mut hero, &mut foe, &rng, seed, EncounterConfig::default());
            (encounter.initiative(), encounter.state())
        };
        let (initiative, state) = first(seed);
        prop_assert_eq!((initiative, state), first(seed));

        let ceiling = hero_speed.max(foe_speed).max(1);
        prop_assert!(initiative.hero > hero_speed && initiative.hero <= hero_speed + ceiling);
        prop_assert!(initiative.foe > foe_speed && initiative.foe <= foe_speed + ceiling);
    }

    #[test]
    fn dispatched_ledger_effects_keep_multiplier_in_bounds(
        pushes in prop::collection::vec((0u8..3, -500i32..500), 0..40)
    ) {
        let rng = Constant(0);
        let mut hero = Dummy::new("Hero", 10);
        let mut foe = Dummy::new("Foe", 10);
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());

        for (kind, magnitude) in pushes {
            let kind = match kind {
                0 => EffectKind::Aura,
                1 => EffectKind::BattleCry,
                _ => EffectKind::Hex,
            };
            encounter.dispatch(Side::Hero, &bundle([ledger(kind, magnitude, Element::Fire)])).unwrap();
            for side in [Side::Hero, Side::Foe] {
                let multiplier = encounter.multiplier(side, Element::Fire);
                prop_assert!((10..=200).contains(&multiplier.defensive));
                prop_assert!((10..=200).contains(&multiplier.offensive));
            }
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn battle_cry_scales_the_next_attack() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 50);
    let mut foe = Dummy::new("Foe", 50);
    {
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
        let outcome = encounter
            .dispatch(
                Side::Hero,
                &bundle([
                    ledger(EffectKind::BattleCry, 50, Element::Fire),
                    Effect::attack(20, Element::Fire, "<value>"),
                ]),
            )
            .unwrap();
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.damage_sent, 30);
    }
    assert_eq!(foe.received, vec![30]);
}

#[test]
fn aura_protects_the_caster() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    {
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
        encounter
            .resolve(
                Side::Hero,
                TurnAction::ends(bundle([ledger(EffectKind::Aura, 15, Element::Physical)])),
            )
            .unwrap();
        assert_eq!(encounter.modifiers(Side::Hero).aura.get(Element::Physical), Some(115));
        assert_eq!(encounter.multiplier(Side::Foe, Element::Physical).defensive, 85);

        encounter
            .resolve(
                Side::Foe,
                TurnAction::ends(bundle([Effect::attack(40, Element::Physical, "")])),
            )
            .unwrap();
    }
    assert_eq!(hero.received, vec![34]);
}

#[test]
fn hex_weakens_the_opponent() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    {
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
        encounter
            .dispatch(
                Side::Hero,
                &bundle([
                    ledger(EffectKind::Hex, 20, Element::Ice),
                    Effect::attack(10, Element::Ice, ""),
                ]),
            )
            .unwrap();
        assert_eq!(encounter.modifiers(Side::Foe).aura.get(Element::Ice), Some(80));
        assert_eq!(encounter.modifiers(Side::Hero).aura.get(Element::Ice), Some(100));
    }
    assert_eq!(foe.received, vec![12]);
}

#[test]
fn aura_then_hex_nets_back_to_neutral() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());

    encounter
        .resolve(
            Side::Hero,
            TurnAction::ends(bundle([ledger(EffectKind::Aura, 25, Element::Holy)])),
        )
        .unwrap();
    encounter
        .resolve(
            Side::Foe,
            TurnAction::ends(bundle([ledger(EffectKind::Hex, 25, Element::Holy)])),
        )
        .unwrap();
    assert_eq!(encounter.modifiers(Side::Hero).aura.get(Element::Holy), Some(100));
}

#[test]
fn killing_blow_skips_the_rest_of_the_bundle() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 10);
    {
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
        let outcome = encounter
            .dispatch(
                Side::Hero,
                &bundle([
                    Effect::attack(50, Element::Physical, "<value> damage"),
                    ledger(EffectKind::Heal, 10, Element::Physical),
                ]),
            )
            .unwrap();

        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.state, EncounterState::Terminated(Termination::Victory));
        assert!(!encounter.is_alive(Side::Foe));
        assert!(!encounter.combatants_alive());
        assert_eq!(encounter.winner(), Some(Side::Hero));
    }
    assert_eq!(foe.received.len(), 1);
    assert_eq!(hero.wins, 1);
    assert_eq!(foe.wins, 0);
}

#[test]
fn hero_death_is_a_defeat() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 5);
    let mut foe = Dummy::new("Foe", 50).speed(0, 40);
    {
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
        assert_eq!(encounter.ai_turn().unwrap(), EncounterState::Terminated(Termination::Defeat));
        assert_eq!(encounter.winner(), Some(Side::Foe));
    }
    assert_eq!(foe.wins, 1);
}

#[test]
fn terminated_encounter_absorbs_every_call() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 1);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
    encounter.player_command(Command::Attack).unwrap();
    assert!(encounter.is_over());

    let terminated = EncounterError::Terminated(Termination::Victory);
    assert_eq!(encounter.dispatch(Side::Hero, &bundle([])).unwrap_err(), terminated);
    assert_eq!(encounter.dispatch(Side::Foe, &bundle([])).unwrap_err(), terminated);
    assert_eq!(encounter.end_turn().unwrap_err(), terminated);
    assert_eq!(encounter.player_command(Command::Attack).unwrap_err(), terminated);
    assert_eq!(encounter.ai_turn().unwrap_err(), terminated);
}

#[test]
fn out_of_turn_dispatch_is_rejected() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());

    let err = encounter
        .dispatch(Side::Foe, &bundle([Effect::attack(10, Element::Physical, "")]))
        .unwrap_err();
    assert_eq!(
        err,
        EncounterError::OutOfTurn {
            side: Side::Foe,
            active: Side::Hero
        }
    );
    assert_eq!(encounter.combatant(Side::Hero).hit_points(), 100);
    assert!(encounter.ai_turn().is_err());
}

#[test]
fn escape_mid_bundle_applies_earlier_effects_only() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    {
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
        let outcome = encounter
            .dispatch(
                Side::Hero,
                &bundle([
                    ledger(EffectKind::Aura, 15, Element::Physical),
                    ledger(EffectKind::Escape, 0, Element::Physical),
                    Effect::attack(99, Element::Physical, ""),
                ]),
            )
            .unwrap();

        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(encounter.state(), EncounterState::Terminated(Termination::Escaped(Side::Hero)));
        assert_eq!(encounter.winner(), None);
        assert!(encounter.combatants_alive());
        assert_eq!(encounter.modifiers(Side::Hero).aura.get(Element::Physical), Some(115));
        assert_eq!(encounter.log().last(), Some("Hero escapes to town"));
    }
    assert!(foe.received.is_empty());
    assert_eq!(hero.scrolls, 0);
}

#[test]
fn identify_reveals_the_foe_for_good() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 77);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
    assert!(encounter.is_identified(Side::Hero));
    assert!(!encounter.is_identified(Side::Foe));

    let pane = encounter.to_string();
    assert!(pane.contains("HP: ??/??"));
    assert!(pane.contains("HP: 100/100"));
    assert!(!pane.contains("77"));

    encounter
        .resolve(
            Side::Hero,
            TurnAction::ends(bundle([ledger(EffectKind::Identify, 0, Element::Physical)])),
        )
        .unwrap();
    encounter.ai_turn().unwrap();
    assert!(encounter.is_identified(Side::Foe));
    assert!(encounter.to_string().contains("HP: 77/77"));
}

#[test]
fn reveal_foe_config_skips_the_fog() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 77);
    let config = EncounterConfig::default().with_reveal_foe(true);
    let encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, config);
    assert!(!encounter.to_string().contains("??"));
}

// ============================================================================
// Turn flow
// ============================================================================

#[test]
fn resolve_alternates_sides_and_counts_turns() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());

    let state = encounter
        .resolve(Side::Hero, TurnAction::continues(bundle([])))
        .unwrap();
    assert_eq!(state, EncounterState::Active(Side::Hero));
    assert_eq!(encounter.turn(), 1);

    let state = encounter.player_command(Command::Attack).unwrap();
    assert_eq!(state, EncounterState::Active(Side::Foe));
    assert_eq!(encounter.turn(), 2);

    let state = encounter.ai_turn().unwrap();
    assert_eq!(state, EncounterState::Active(Side::Hero));
    assert_eq!(encounter.turn(), 3);
    assert_eq!(encounter.combatant(Side::Hero).hit_points(), 90);
}

#[test]
fn unknown_special_does_not_consume_the_turn() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());

    let state = encounter.player_command(Command::Special(3)).unwrap();
    assert_eq!(state, EncounterState::Active(Side::Hero));
    assert_eq!(encounter.log().last(), Some("No special action in slot 4"));

    let state = encounter.player_command(Command::HealingPotion).unwrap();
    assert_eq!(state, EncounterState::Active(Side::Hero));
    assert_eq!(encounter.log().last(), Some("Hero has no healing potions"));
}

#[test]
fn exhausted_scrolls_keep_the_hero_to_move() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());

    let state = encounter.player_command(Command::EscapeScroll).unwrap();
    assert_eq!(state, EncounterState::Active(Side::Hero));
    assert_eq!(encounter.log().last(), Some("Hero has no scrolls of escape"));
    assert_eq!(encounter.turn(), 1);
}

#[test]
fn scroll_escape_ends_the_fight() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    hero.scrolls = 1;
    let mut foe = Dummy::new("Foe", 100);
    {
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
        let state = encounter.player_command(Command::EscapeScroll).unwrap();
        assert_eq!(state, EncounterState::Terminated(Termination::Escaped(Side::Hero)));
    }
    assert_eq!(hero.scrolls, 0);
}

#[test]
fn foe_extra_actions_are_capped() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 1_000);
    let mut foe = Dummy::new("Foe", 100)
        .speed(0, 50)
        .scripted((0..20).map(|_| {
            TurnAction::continues(bundle([Effect::attack(1, Element::Physical, "")]))
        }));
    {
        let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
        assert_eq!(encounter.ai_turn().unwrap(), EncounterState::Active(Side::Hero));
    }
    assert_eq!(hero.received.len(), Encounter::MAX_ACTIONS_PER_TURN as usize);
}

#[test]
fn refused_potions_never_pass_the_turn() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());

    for _ in 0..(Encounter::MAX_ACTIONS_PER_TURN * 2) {
        let state = encounter.player_command(Command::HealingPotion).unwrap();
        assert_eq!(state, EncounterState::Active(Side::Hero));
    }
    assert_eq!(encounter.turn(), 1);

    let state = encounter.player_command(Command::Attack).unwrap();
    assert_eq!(state, EncounterState::Active(Side::Foe));
}

#[test]
fn foe_stalling_with_empty_actions_still_yields() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100)
        .speed(0, 50)
        .scripted((0..20).map(|_| TurnAction::continues(ActionBundle::empty("..."))));
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());

    assert_eq!(encounter.ai_turn().unwrap(), EncounterState::Active(Side::Hero));
    assert_eq!(encounter.turn(), 2);
}

#[test]
fn foe_flight_terminates_with_escape() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Bat", 100).speed(0, 50).scripted([TurnAction::ends(
        ActionBundle::new([ledger(EffectKind::Escape, 0, Element::Physical)], "The bat panics"),
    )]);
    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default());
    let state = encounter.ai_turn().unwrap();
    assert_eq!(state, EncounterState::Terminated(Termination::Escaped(Side::Foe)));
    let history: Vec<_> = encounter.log().history().collect();
    assert!(history.contains(&"The bat panics"));
    assert_eq!(encounter.log().last(), Some("Bat flees the battle"));
}

// ============================================================================
// Presentation
// ============================================================================

#[test]
fn ledger_effects_refresh_the_pane() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    let hook = CountingHook::default();
    let calls = hook.0.clone();

    let mut encounter = Encounter::new(&mut hero, &mut foe, &rng, 0, EncounterConfig::default())
        .with_hook(hook);
    encounter
        .dispatch(
            Side::Hero,
            &bundle([
                ledger(EffectKind::Aura, 5, Element::Fire),
                ledger(EffectKind::BattleCry, 5, Element::Fire),
                ledger(EffectKind::Hex, 5, Element::Fire),
                Effect::attack(1, Element::Fire, ""),
                ledger(EffectKind::Heal, 5, Element::Fire),
                ledger(EffectKind::Identify, 0, Element::Fire),
            ]),
        )
        .unwrap();
    assert_eq!(calls.get(), 3);
}

#[test]
fn pane_lines_share_one_width() {
    let rng = Constant(0);
    let mut hero = Dummy::new("Hero", 100);
    let mut foe = Dummy::new("Foe", 100);
    let encounter = Encounter::new(
        &mut hero,
        &mut foe,
        &rng,
        0,
        EncounterConfig::default().with_reveal_foe(true),
    );
    let pane = encounter.to_string();
    assert!(pane.lines().all(|line| line.chars().count() == combat_core::render::PANE_WIDTH));
    assert!(pane.contains("Fire: 100"));
}
