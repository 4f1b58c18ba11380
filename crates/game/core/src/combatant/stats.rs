//! Ability score block with per-level growth.

/// A stat value and how much it grows each level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Growth {
    pub base: u32,
    pub per_level: u32,
}

impl Growth {
    pub const fn new(base: u32, per_level: u32) -> Self {
        Self { base, per_level }
    }

    fn grow(&mut self) {
        self.base = self.base.saturating_add(self.per_level);
    }
}

/// Stat selector used by templates to derive attack/defense power and
/// ability scaling.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum StatKind {
    Strength,
    Agility,
    Intelligence,
}

/// Ability scores shared by every combatant family.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hit_points: Growth,
    pub strength: Growth,
    pub agility: Growth,
    pub intelligence: Growth,
    pub special: Growth,
}

impl Stats {
    pub fn max_hit_points(&self) -> u32 {
        self.hit_points.base
    }

    /// Hit points gained per level.
    pub fn hp_growth(&self) -> u32 {
        self.hit_points.per_level
    }

    pub fn strength(&self) -> u32 {
        self.strength.base
    }

    pub fn agility(&self) -> u32 {
        self.agility.base
    }

    pub fn intelligence(&self) -> u32 {
        self.intelligence.base
    }

    /// Maximum special resource.
    pub fn special(&self) -> u32 {
        self.special.base
    }

    pub fn set_special(&mut self, value: u32) {
        self.special.base = value;
    }

    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Strength => self.strength(),
            StatKind::Agility => self.agility(),
            StatKind::Intelligence => self.intelligence(),
        }
    }

    /// Applies one level of growth to every score.
    pub fn level_up(&mut self) {
        self.hit_points.grow();
        self.strength.grow();
        self.agility.grow();
        self.intelligence.grow();
        self.special.grow();
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:20}{:5}\t{:20}{:5}\t{:20}{:5}",
            "Strength:",
            self.strength(),
            "Agility:",
            self.agility(),
            "Intelligence:",
            self.intelligence()
        )
    }
}
