//! Data-driven monsters.
//!
//! A [`MonsterTemplate`] describes a monster family member at level 1 plus its
//! growth. [`Monster::spawn`] levels a template to the requested level and
//! produces a combatant with its own hit points, ledgers, and defense
//! pipeline.
//!
//! # Abilities
//!
//! Abilities are weighted alternatives to the basic attack. Their effects are
//! stored as untyped [`EffectSpec`]s and converted through
//! [`ActionBundle::from_specs`], so entries with kinds the engine does not
//! support are dropped instead of failing the fight. For `Attack` effects the
//! magnitude is a percentage of the ability's scaling stat.

use std::str::FromStr;

use combat_core::{
    ActionBundle, CombatContext, Combatant, DefensePipeline, DefenseStageSpec, DefenseView, Dice,
    Effect, EffectKind, EffectSpec, Element, ElementSet, ModifierLedger, StatKind, Stats,
    TurnAction, effect,
};
use serde::{Deserialize, Serialize};

const EXPERIENCE_PER_LEVEL: u32 = 20;
const EXPERIENCE_OFFSET: u32 = 8;
const GOLD_PER_LEVEL: u32 = 4;

fn physical() -> Element {
    Element::Physical
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

fn standard_defenses() -> Vec<DefenseStageSpec> {
    vec![DefenseStageSpec::Armor, DefenseStageSpec::Resistance]
}

// ============================================================================
// Templates
// ============================================================================

/// Uniform damage spread, as percentages of the base amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variance {
    pub min_percent: u32,
    pub max_percent: u32,
}

impl Variance {
    pub fn apply(&self, base: u32, dice: &mut Dice<'_>) -> u32 {
        if base == 0 {
            return 0;
        }
        let min = base.saturating_mul(self.min_percent) / 100;
        let max = base.saturating_mul(self.max_percent) / 100;
        dice.roll(min, max.max(min)).max(1)
    }
}

impl Default for Variance {
    fn default() -> Self {
        Self {
            min_percent: 92,
            max_percent: 108,
        }
    }
}

/// Weighted special action available to a monster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityTemplate {
    pub name: String,
    pub weight: u32,
    #[serde(default)]
    pub min_level: u32,
    /// Stat that `Attack` magnitudes scale with. Attack power when absent.
    #[serde(default)]
    pub scaling: Option<StatKind>,
    /// Only eligible while hit points are below this percentage.
    #[serde(default)]
    pub below_health_percent: Option<u32>,
    #[serde(default)]
    pub once_per_battle: bool,
    /// Negates the next incoming hit.
    #[serde(default)]
    pub wards_next_hit: bool,
    #[serde(default = "yes")]
    pub ends_turn: bool,
    #[serde(default)]
    pub message: String,
    pub effects: Vec<EffectSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub id: String,
    pub name: String,
    /// Family label shown as the class (Undead, Golem, ...).
    pub family: String,
    pub stats: Stats,
    pub attack_stat: StatKind,
    pub defense_stat: StatKind,
    #[serde(default = "physical")]
    pub attack_element: Element,
    /// Narration for the basic attack; `<value>` is the damage dealt.
    #[serde(default)]
    pub attack_message: Option<String>,
    /// Elements tracked by the outgoing damage ledger besides the attack element.
    #[serde(default)]
    pub damage_elements: Vec<Element>,
    /// Incoming damage reductions in percentage points; negative values are weaknesses.
    #[serde(default)]
    pub resistances: Vec<(Element, i64)>,
    #[serde(default = "standard_defenses")]
    pub defenses: Vec<DefenseStageSpec>,
    #[serde(default)]
    pub variance: Variance,
    #[serde(default = "one")]
    pub attack_weight: u32,
    /// Survives the first lethal hit with 1 hit point.
    #[serde(default)]
    pub resist_death: bool,
    /// Flees once hit points drop below this percentage.
    #[serde(default)]
    pub flee_below_percent: Option<u32>,
    #[serde(default)]
    pub flee_message: Option<String>,
    #[serde(default)]
    pub abilities: Vec<AbilityTemplate>,
}

// ============================================================================
// Monster
// ============================================================================

#[derive(Debug)]
pub struct Monster {
    template: MonsterTemplate,
    level: u32,
    stats: Stats,
    hit_points: u32,
    attack_power: u32,
    defense_power: u32,
    damage_modifiers: ModifierLedger,
    defense_modifiers: ModifierLedger,
    defenses: DefensePipeline,
    death_resisted: bool,
    warded: bool,
    spent: Vec<bool>,
}

impl Monster {
    /// Levels `template` up to `level` (at least 1).
    pub fn spawn(template: &MonsterTemplate, level: u32) -> Self {
        let level = level.max(1);
        let mut stats = template.stats.clone();
        for _ in 1..level {
            stats.level_up();
        }

        let tracked: ElementSet = template
            .damage_elements
            .iter()
            .copied()
            .chain([template.attack_element])
            .collect();
        let damage_modifiers = ModifierLedger::restricted(tracked);

        let mut defense_modifiers = ModifierLedger::neutral();
        for (element, reduction) in &template.resistances {
            if defense_modifiers.subtract(*element, *reduction).is_err() {
                tracing::warn!(monster = %template.id, %element, "untracked resistance ignored");
            }
        }

        tracing::debug!(monster = %template.id, level, "monster spawned");
        Self {
            level,
            hit_points: stats.max_hit_points(),
            attack_power: stats.get(template.attack_stat),
            defense_power: stats.get(template.defense_stat),
            damage_modifiers,
            defense_modifiers,
            defenses: DefensePipeline::from_specs(&template.defenses),
            death_resisted: false,
            warded: false,
            spent: vec![false; template.abilities.len()],
            stats,
            template: template.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.template.id
    }

    pub fn template(&self) -> &MonsterTemplate {
        &self.template
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn is_warded(&self) -> bool {
        self.warded
    }

    fn health_percent(&self) -> u32 {
        let max = self.max_hit_points().max(1);
        self.hit_points.saturating_mul(100) / max
    }

    fn is_eligible(&self, index: usize, ability: &AbilityTemplate) -> bool {
        if self.level < ability.min_level {
            return false;
        }
        if ability.once_per_battle && self.spent.get(index).copied().unwrap_or(false) {
            return false;
        }
        match ability.below_health_percent {
            Some(percent) => self.health_percent() < percent,
            None => true,
        }
    }

    fn should_flee(&self) -> bool {
        self.template
            .flee_below_percent
            .is_some_and(|percent| self.is_alive() && self.health_percent() < percent)
    }

    fn flee(&self) -> TurnAction {
        let template = self.template.flee_message.clone().unwrap_or_default();
        TurnAction::ends(ActionBundle::new(
            [Effect::new(EffectKind::Escape, 0, Element::Physical, template)],
            "",
        ))
    }

    /// Resolves an ability's effect specs into a bundle.
    fn use_ability(&mut self, index: usize, ctx: &mut CombatContext<'_>) -> TurnAction {
        let ability = &self.template.abilities[index];
        let scale = ability
            .scaling
            .map_or(self.attack_power, |stat| self.stats.get(stat));

        let specs: Vec<EffectSpec> = ability
            .effects
            .iter()
            .map(|spec| {
                let is_attack = EffectKind::from_str(spec.kind.trim()) == Ok(EffectKind::Attack);
                if !is_attack {
                    return spec.clone();
                }
                let base = scale.saturating_mul(spec.magnitude.max(0) as u32) / 100;
                let magnitude = self.template.variance.apply(base, &mut ctx.dice);
                EffectSpec {
                    magnitude: i32::try_from(magnitude).unwrap_or(i32::MAX),
                    ..spec.clone()
                }
            })
            .collect();

        let bundle = ActionBundle::from_specs(specs, ability.message.clone())
            .with_special(ability.name.clone());
        let ends_turn = ability.ends_turn;
        if ability.wards_next_hit {
            self.warded = true;
        }
        if let Some(spent) = self.spent.get_mut(index) {
            *spent = true;
        }
        tracing::debug!(monster = %self.template.id, ability = %self.template.abilities[index].name, "ability used");

        TurnAction { ends_turn, bundle }
    }
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        &self.template.name
    }

    fn class_name(&self) -> &str {
        &self.template.family
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn hit_points(&self) -> u32 {
        self.hit_points
    }

    fn max_hit_points(&self) -> u32 {
        self.stats.max_hit_points()
    }

    fn attack_power(&self) -> u32 {
        self.attack_power
    }

    fn defense_power(&self) -> u32 {
        self.defense_power
    }

    fn agility(&self) -> u32 {
        self.stats.agility()
    }

    fn damage_modifiers(&self) -> &ModifierLedger {
        &self.damage_modifiers
    }

    fn defense_modifiers(&self) -> &ModifierLedger {
        &self.defense_modifiers
    }

    fn attack(&mut self, ctx: &mut CombatContext<'_>) -> ActionBundle {
        let element = self.template.attack_element;
        let damage = self.template.variance.apply(self.attack_power, &mut ctx.dice);
        let template = self.template.attack_message.clone().unwrap_or_else(|| {
            format!("{} attacks for <value> {element} damage", self.template.name)
        });
        ActionBundle::new(
            [Effect::attack(i32::try_from(damage).unwrap_or(i32::MAX), element, template)],
            "",
        )
    }

    fn take_turn(&mut self, ctx: &mut CombatContext<'_>) -> TurnAction {
        if self.should_flee() {
            return self.flee();
        }

        let eligible: Vec<usize> = self
            .template
            .abilities
            .iter()
            .enumerate()
            .filter(|(index, ability)| self.is_eligible(*index, ability))
            .map(|(index, _)| index)
            .collect();
        let weights: Vec<u32> = std::iter::once(self.template.attack_weight)
            .chain(eligible.iter().map(|index| self.template.abilities[*index].weight))
            .collect();

        match ctx.dice.pick_weighted(&weights) {
            Some(pick) if pick > 0 => self.use_ability(eligible[pick - 1], ctx),
            _ => TurnAction::ends(self.attack(ctx)),
        }
    }

    fn skills(&self) -> Vec<String> {
        self.template
            .abilities
            .iter()
            .filter(|ability| self.level >= ability.min_level)
            .map(|ability| ability.name.clone())
            .collect()
    }

    fn take_damage(
        &mut self,
        amount: u32,
        element: Element,
        template: &str,
        ctx: &mut CombatContext<'_>,
    ) -> bool {
        if self.warded {
            self.warded = false;
            ctx.narrate(effect::narrate(template, 0));
            ctx.narrate(format!("The blow passes harmlessly through {}", self.name()));
            return true;
        }

        let view = DefenseView {
            defense_power: self.defense_power,
            modifiers: &self.defense_modifiers,
            roll: ctx.dice.roll_d100(),
        };
        let damage = self.defenses.resolve(amount, element, &view);

        if damage < self.hit_points {
            self.hit_points -= damage;
            ctx.narrate(effect::narrate(template, damage));
            return true;
        }

        if self.template.resist_death && !self.death_resisted {
            self.death_resisted = true;
            ctx.narrate(effect::narrate(template, self.hit_points - 1));
            self.hit_points = 1;
            ctx.narrate(format!("{} refuses to die!", self.name()));
            return true;
        }

        ctx.narrate(effect::narrate(template, self.hit_points));
        self.hit_points = 0;
        false
    }

    fn gold(&self) -> u32 {
        GOLD_PER_LEVEL * self.level
    }

    fn experience_reward(&self) -> u32 {
        EXPERIENCE_PER_LEVEL * self.level - EXPERIENCE_OFFSET
    }
}
