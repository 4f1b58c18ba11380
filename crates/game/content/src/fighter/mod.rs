//! The Fighter: a heavily armored melee class powered by Heroism.
//!
//! Heroism is the fighter's special resource. Each point absorbs one lethal
//! hit, leaving the fighter at a quarter of their maximum hit points. The
//! pool grows by one every fourth level.

mod loadout;

pub use loadout::{Armor, Loadout, Shield, Weapon};

use combat_core::{
    ActionBundle, CharacterRegistry, CombatContext, CombatLog, Combatant, DefensePipeline,
    DefenseView, Effect, EffectKind, Element, ElementSet, Growth, ModifierLedger, RegistryError,
    SpecialResource, Stats, TurnAction, effect,
};
use serde::{Deserialize, Serialize};

pub const CLASS_NAME: &str = "Fighter";
pub const SPECIAL_RESOURCE: &str = "Heroism";
pub const MAX_LEVEL: u32 = 50;

/// Percent of max HP restored by a healing potion.
const POTION_HEAL_PERCENT: u32 = 45;
/// Damage variance applied to every strike, in percent.
const DAMAGE_VARIANCE: u32 = 8;
const CRITICAL_CHANCE: u32 = 10;
const HEROISM_GROWTH_LEVELS: u32 = 4;
const LEVEL_UP_ATTACK: u32 = 2;

// ============================================================================
// Skills
// ============================================================================

/// Active skills in the order they unlock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Skill {
    Whirlwind,
    Fortify,
    Weaken,
    Strengthen,
    Rampage,
}

impl Skill {
    pub const fn unlock_level(self) -> u32 {
        match self {
            Self::Whirlwind => 3,
            Self::Fortify => 10,
            Self::Weaken => 13,
            Self::Strengthen => 17,
            Self::Rampage => 25,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Whirlwind => "Physical damage based on your shield and defense to all enemies",
            Self::Fortify => {
                "Raise resistance to Physical, Fire, Ice and Lightning by 15 for the encounter"
            }
            Self::Weaken => "Strike for half damage and lower the target's physical aura by 10",
            Self::Strengthen => "Strike for half damage and raise your physical battle cry by 10",
            Self::Rampage => "Once per battle: an attack that always critically strikes",
        }
    }
}

/// Passive skills and their unlock levels.
const PASSIVES: [(u32, &str, &str); 3] = [
    (5, "Critical Strikes", "Your attacks have a 10% chance to deal double damage"),
    (8, "Second Wind", "You heal 25% of your maximum hit points whenever you defeat an enemy"),
    (20, "Improved Critical Strikes", "Your critical strikes now deal triple damage"),
];

/// Experience needed to advance past `level`.
pub fn experience_to_next(level: u32) -> u32 {
    if level >= MAX_LEVEL {
        return u32::MAX;
    }
    40 * level * level
}

// ============================================================================
// Template
// ============================================================================

/// Starting state for a new fighter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterTemplate {
    pub stats: Stats,
    pub loadout: Loadout,
    pub healing_potions: u32,
    pub escape_scrolls: u32,
    pub gold: u32,
}

impl Default for FighterTemplate {
    fn default() -> Self {
        Self {
            stats: Stats {
                hit_points: Growth::new(100, 25),
                strength: Growth::new(13, 2),
                agility: Growth::new(10, 1),
                intelligence: Growth::new(5, 0),
                special: Growth::new(1, 0),
            },
            loadout: Loadout::starter(),
            healing_potions: 1,
            escape_scrolls: 1,
            gold: 100,
        }
    }
}

// ============================================================================
// Fighter
// ============================================================================

#[derive(Debug)]
pub struct Fighter {
    name: String,
    level: u32,
    stats: Stats,
    hit_points: u32,
    heroism: u32,
    experience: u32,
    experience_to_next: u32,
    gold: u32,
    battles_won: u32,
    healing_potions: u32,
    escape_scrolls: u32,
    loadout: Loadout,
    attack_power: u32,
    defense_power: u32,
    critical_multiplier: u32,
    rampaged: bool,
    damage_modifiers: ModifierLedger,
    defense_modifiers: ModifierLedger,
    defenses: DefensePipeline,
}

impl Fighter {
    /// Creates a level 1 fighter and claims `name` in the registry.
    pub fn new(
        name: &str,
        template: &FighterTemplate,
        registry: &mut CharacterRegistry,
    ) -> Result<Self, RegistryError> {
        let name = registry.register(name)?;
        let stats = template.stats.clone();
        let loadout = template.loadout.clone();

        let mut damage_modifiers =
            ModifierLedger::restricted(ElementSet::PHYSICAL | loadout.weapon.element.set());
        let mut defense_modifiers = ModifierLedger::neutral();
        loadout.apply(&mut damage_modifiers, &mut defense_modifiers);

        tracing::info!(%name, class = CLASS_NAME, "fighter created");
        Ok(Self {
            name,
            level: 1,
            hit_points: stats.max_hit_points(),
            heroism: stats.special(),
            experience: 0,
            experience_to_next: experience_to_next(1),
            gold: template.gold,
            battles_won: 0,
            healing_potions: template.healing_potions,
            escape_scrolls: template.escape_scrolls,
            attack_power: stats.strength() + loadout.attack_bonus(),
            defense_power: stats.agility() / 2 + loadout.defense_bonus(),
            critical_multiplier: 1,
            rampaged: false,
            damage_modifiers,
            defense_modifiers,
            defenses: DefensePipeline::standard(),
            stats,
            loadout,
        })
    }

    /// Frees the fighter's name for reuse.
    pub fn retire(self, registry: &mut CharacterRegistry) {
        registry.release(&self.name);
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn experience_needed(&self) -> u32 {
        self.experience_to_next
    }

    pub fn battles_won(&self) -> u32 {
        self.battles_won
    }

    pub fn max_heroism(&self) -> u32 {
        self.stats.special()
    }

    pub fn critical_multiplier(&self) -> u32 {
        self.critical_multiplier
    }

    pub fn add_healing_potions(&mut self, count: u32) {
        self.healing_potions += count;
    }

    pub fn add_escape_scrolls(&mut self, count: u32) {
        self.escape_scrolls += count;
    }

    /// Skills unlocked at the current level, Rampage included even when spent.
    pub fn learned_skills(&self) -> Vec<Skill> {
        use strum::IntoEnumIterator;
        Skill::iter()
            .filter(|skill| skill.unlock_level() <= self.level)
            .collect()
    }

    fn available_skills(&self) -> Vec<Skill> {
        let mut skills = self.learned_skills();
        if self.rampaged {
            skills.retain(|skill| *skill != Skill::Rampage);
        }
        skills
    }

    // ===== progression =====

    /// Adds experience and applies every level it pays for.
    pub fn gain_experience(&mut self, amount: u32, log: &mut CombatLog) {
        self.experience = self.experience.saturating_add(amount);
        while self.level < MAX_LEVEL && self.experience >= self.experience_to_next {
            self.level_up(log);
        }
    }

    /// Advances one level. Does nothing at [`MAX_LEVEL`].
    pub fn level_up(&mut self, log: &mut CombatLog) {
        if self.level >= MAX_LEVEL {
            return;
        }
        self.stats.level_up();
        self.hit_points += self.stats.hp_growth();
        self.level += 1;
        log.push(format!(
            "{} the {CLASS_NAME} has reached level {}!",
            self.name, self.level
        ));

        self.experience = self.experience.saturating_sub(self.experience_to_next);
        self.experience_to_next = experience_to_next(self.level);
        if self.level >= MAX_LEVEL {
            log.push("You've reached maximum level!");
        }

        for skill in self.learned_skills() {
            if skill.unlock_level() == self.level {
                log.push(format!("New Skill - {skill}: {}", skill.description()));
            }
        }
        for (level, name, description) in PASSIVES {
            if level == self.level {
                log.push(format!("New Skill - {name}: {description}"));
                if name.contains("Critical") {
                    self.critical_multiplier += 1;
                }
            }
        }

        if self.level % HEROISM_GROWTH_LEVELS == 0 {
            self.stats.set_special(self.stats.special() + 1);
            self.heroism = (self.heroism + 1).min(self.stats.special());
        }
        self.attack_power += LEVEL_UP_ATTACK;
        if self.stats.agility() % 2 == 0 {
            self.defense_power += 1;
        }
        tracing::info!(name = %self.name, level = self.level, "level up");
    }

    // ===== damage =====

    /// Varies `base` and rolls for a critical strike.
    fn strike(&self, base: u32, auto_crit: bool, ctx: &mut CombatContext<'_>) -> u32 {
        let damage = ctx.dice.vary(base, DAMAGE_VARIANCE).max(1);
        let critical = auto_crit || (self.critical_multiplier > 1 && ctx.dice.chance(CRITICAL_CHANCE));
        if critical {
            ctx.narrate("Critical Hit!");
            return damage * self.critical_multiplier;
        }
        damage
    }

    /// Weapon strike scaled by the fighter's damage modifier for its element.
    fn weapon_strike(&self, auto_crit: bool, ctx: &mut CombatContext<'_>) -> (i32, Element) {
        let element = self.loadout.weapon.element;
        let damage = self.strike(self.attack_power, auto_crit, ctx);
        let modifier = self.damage_modifiers.get_or_neutral(element);
        let scaled = i64::from(damage) * modifier / 100;
        (i32::try_from(scaled.max(0)).unwrap_or(i32::MAX), element)
    }

    fn whirlwind(&self, ctx: &mut CombatContext<'_>) -> TurnAction {
        let base = 2 * self.loadout.shield.defense + self.defense_power * 3 / 4;
        let damage = self.strike(base, false, ctx);
        let template = format!(
            "{} unleashes a whirlwind hitting all enemies for <value> Physical damage",
            self.name
        );
        TurnAction::ends(ActionBundle::new(
            [Effect::attack(damage as i32, Element::Physical, template)],
            "",
        ))
    }

    fn fortify(&self, ctx: &mut CombatContext<'_>) -> TurnAction {
        ctx.narrate(format!("{} defends and braces against the elements", self.name));
        let auras = [Element::Physical, Element::Fire, Element::Ice, Element::Lightning]
            .map(|element| Effect::silent(EffectKind::Aura, 15, element));
        TurnAction::ends(ActionBundle::new(auras, ""))
    }

    fn half_strike(&self, follow_up: Effect, what: &str, ctx: &mut CombatContext<'_>) -> TurnAction {
        let (damage, element) = self.weapon_strike(false, ctx);
        let template = format!(
            "{} makes a calculated strike for <value> {element} damage, and {what}",
            self.name
        );
        TurnAction::ends(ActionBundle::new(
            [Effect::attack(damage / 2, element, template), follow_up],
            "",
        ))
    }

    fn rampage(&mut self, ctx: &mut CombatContext<'_>) -> TurnAction {
        self.rampaged = true;
        let (damage, element) = self.weapon_strike(true, ctx);
        let template = format!(
            "{} rampages, critically striking with {} for <value> {element} damage",
            self.name, self.loadout.weapon.name
        );
        TurnAction::ends(ActionBundle::new([Effect::attack(damage, element, template)], ""))
    }
}

impl Combatant for Fighter {
    fn name(&self) -> &str {
        &self.name
    }

    fn class_name(&self) -> &str {
        CLASS_NAME
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

    fn special(&self) -> Option<SpecialResource<'_>> {
        Some(SpecialResource {
            name: SPECIAL_RESOURCE,
            amount: self.heroism,
        })
    }

    fn attack(&mut self, ctx: &mut CombatContext<'_>) -> ActionBundle {
        let (damage, element) = self.weapon_strike(false, ctx);
        let template = format!(
            "{} attacks with {} for <value> {element} damage",
            self.name, self.loadout.weapon.name
        );
        ActionBundle::new([Effect::attack(damage, element, template)], "")
    }

    fn skills(&self) -> Vec<String> {
        self.available_skills()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn special_action(&mut self, index: usize, ctx: &mut CombatContext<'_>) -> Option<TurnAction> {
        let skill = *self.available_skills().get(index)?;
        tracing::debug!(name = %self.name, %skill, "special action");
        let action = match skill {
            Skill::Whirlwind => self.whirlwind(ctx),
            Skill::Fortify => self.fortify(ctx),
            Skill::Weaken => self.half_strike(
                Effect::silent(EffectKind::Hex, 10, Element::Physical),
                "weakens the target's physical mitigation",
                ctx,
            ),
            Skill::Strengthen => self.half_strike(
                Effect::silent(EffectKind::BattleCry, 10, Element::Physical),
                "strengthens their future physical attacks",
                ctx,
            ),
            Skill::Rampage => self.rampage(ctx),
        };
        Some(action)
    }

    fn take_damage(
        &mut self,
        amount: u32,
        element: Element,
        template: &str,
        ctx: &mut CombatContext<'_>,
    ) -> bool {
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

        if self.heroism > 0 {
            ctx.narrate(effect::narrate(template, damage));
            ctx.narrate(format!(
                "Incoming damage {damage} greater than current hit points: {}",
                self.hit_points
            ));
            self.heroism -= 1;
            self.hit_points = self.max_hit_points() / 4;
            ctx.narrate(format!(
                "{SPECIAL_RESOURCE} consumed, {} remaining. Hit points set to: {}",
                self.heroism, self.hit_points
            ));
            tracing::debug!(name = %self.name, heroism = self.heroism, "heroism triggered");
            return true;
        }

        ctx.narrate(effect::narrate(template, self.hit_points));
        self.hit_points = 0;
        ctx.narrate(format!(
            "You have died. The epic adventure of {} comes to an end.",
            self.name
        ));
        false
    }

    fn healing_potions(&self) -> u32 {
        self.healing_potions
    }

    fn escape_scrolls(&self) -> u32 {
        self.escape_scrolls
    }

    fn drink_potion(&mut self, ctx: &mut CombatContext<'_>) -> TurnAction {
        if self.hit_points >= self.max_hit_points() {
            ctx.narrate("Cannot use healing potion, already at max health");
            return TurnAction::continues(ActionBundle::empty(""));
        }
        if self.healing_potions == 0 {
            ctx.narrate("Cannot use healing potion, no healing potions left");
            return TurnAction::continues(ActionBundle::empty(""));
        }

        let before = self.hit_points;
        let heal = self.max_hit_points() * POTION_HEAL_PERCENT / 100;
        self.hit_points = (self.hit_points + heal).min(self.max_hit_points());
        self.healing_potions -= 1;
        ctx.narrate(format!(
            "Drank a healing potion and healed {} hit points",
            self.hit_points - before
        ));
        TurnAction::ends(ActionBundle::new(
            [Effect::silent(EffectKind::Heal, heal as i32, Element::Holy)],
            "",
        ))
    }

    fn use_escape_scroll(&mut self) -> bool {
        if self.escape_scrolls == 0 {
            return false;
        }
        self.escape_scrolls -= 1;
        true
    }

    fn gold(&self) -> u32 {
        self.gold
    }

    fn win_battle(&mut self, defeated: &dyn Combatant, ctx: &mut CombatContext<'_>) {
        let gold = defeated.gold();
        let experience = defeated.experience_reward();
        self.battles_won += 1;
        self.rampaged = false;
        ctx.narrate(format!(
            "You have defeated {}! Gained {gold} gold. Gained {experience} experience",
            defeated.name()
        ));

        if self.level >= 8 {
            let before = self.hit_points;
            let heal = self.max_hit_points() / 4;
            self.hit_points = (self.hit_points + heal).min(self.max_hit_points());
            ctx.narrate(format!(
                "You heal {} hit points from Second Wind",
                self.hit_points - before
            ));
        }

        self.gold += gold;
        self.gain_experience(experience, &mut ctx.log);
    }
}
