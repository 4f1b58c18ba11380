//! Defense pipeline - composable damage transforms selected per combatant.
//!
//! Incoming damage flows through an ordered list of [`DefenseStage`]s. Each
//! stage is a pure function of the hit and a read-only [`DefenseView`] of the
//! defender; the random roll a stage may need is drawn once by the caller and
//! carried in the view. State such as "prevent the first lethal hit" belongs to
//! the combatant and runs after the pipeline.

use std::fmt;

use crate::config::EncounterConfig;
use crate::element::{Element, ElementSet};
use crate::ledger::ModifierLedger;

/// Damage in flight through the pipeline. The amount may go negative
/// mid-pipeline; [`DefensePipeline::resolve`] floors the result at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncomingHit {
    pub amount: i64,
    pub element: Element,
}

impl IncomingHit {
    pub fn new(amount: u32, element: Element) -> Self {
        Self {
            amount: i64::from(amount),
            element,
        }
    }

    fn with_amount(self, amount: i64) -> Self {
        Self { amount, ..self }
    }
}

/// Read-only defender state visible to the stages.
#[derive(Clone, Copy, Debug)]
pub struct DefenseView<'a> {
    pub defense_power: u32,
    pub modifiers: &'a ModifierLedger,
    /// d100 roll drawn for this hit.
    pub roll: u32,
}

/// One pure transform of incoming damage.
pub trait DefenseStage: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, hit: IncomingHit, view: &DefenseView<'_>) -> IncomingHit;
}

// ============================================================================
// Stages
// ============================================================================

/// Subtracts half the defense power from hits of the listed elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArmorMitigation {
    pub elements: ElementSet,
}

impl Default for ArmorMitigation {
    fn default() -> Self {
        Self {
            elements: ElementSet::PHYSICAL,
        }
    }
}

impl DefenseStage for ArmorMitigation {
    fn name(&self) -> &'static str {
        "armor"
    }

    fn apply(&self, hit: IncomingHit, view: &DefenseView<'_>) -> IncomingHit {
        if !self.elements.has(hit.element) {
            return hit;
        }
        hit.with_amount(hit.amount - i64::from(view.defense_power / 2))
    }
}

/// Scales by the defender's defense modifier for the element (percent).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElementalResistance;

impl DefenseStage for ElementalResistance {
    fn name(&self) -> &'static str {
        "resistance"
    }

    fn apply(&self, hit: IncomingHit, view: &DefenseView<'_>) -> IncomingHit {
        let percent = view.modifiers.get_or_neutral(hit.element);
        hit.with_amount(hit.amount.saturating_mul(percent) / EncounterConfig::PERCENT)
    }
}

/// Zeroes hits of the listed elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Immunity(pub ElementSet);

impl DefenseStage for Immunity {
    fn name(&self) -> &'static str {
        "immunity"
    }

    fn apply(&self, hit: IncomingHit, _view: &DefenseView<'_>) -> IncomingHit {
        if self.0.has(hit.element) {
            hit.with_amount(0)
        } else {
            hit
        }
    }
}

/// Avoids the hit entirely when the roll is within `percent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evasion {
    pub percent: u32,
}

impl DefenseStage for Evasion {
    fn name(&self) -> &'static str {
        "evasion"
    }

    fn apply(&self, hit: IncomingHit, view: &DefenseView<'_>) -> IncomingHit {
        if view.roll <= self.percent {
            hit.with_amount(0)
        } else {
            hit
        }
    }
}

/// Raises any hit to at least this amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimumDamage(pub u32);

impl DefenseStage for MinimumDamage {
    fn name(&self) -> &'static str {
        "minimum"
    }

    fn apply(&self, hit: IncomingHit, _view: &DefenseView<'_>) -> IncomingHit {
        hit.with_amount(hit.amount.max(i64::from(self.0)))
    }
}

// ============================================================================
// Stage Specs (data-driven construction)
// ============================================================================

/// Serializable description of a stage, used by content templates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefenseStageSpec {
    Armor,
    Resistance,
    Immunity(Vec<Element>),
    Evasion(u32),
    Minimum(u32),
}

impl DefenseStageSpec {
    pub fn build(&self) -> Box<dyn DefenseStage> {
        match self {
            Self::Armor => Box::new(ArmorMitigation::default()),
            Self::Resistance => Box::new(ElementalResistance),
            Self::Immunity(elements) => Box::new(Immunity(elements.iter().copied().collect())),
            Self::Evasion(percent) => Box::new(Evasion { percent: *percent }),
            Self::Minimum(amount) => Box::new(MinimumDamage(*amount)),
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Ordered list of defense stages.
#[derive(Debug, Default)]
pub struct DefensePipeline {
    stages: Vec<Box<dyn DefenseStage>>,
}

impl DefensePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Armor against physical hits, then elemental resistance.
    pub fn standard() -> Self {
        Self::new()
            .with(ArmorMitigation::default())
            .with(ElementalResistance)
    }

    pub fn from_specs<'s>(specs: impl IntoIterator<Item = &'s DefenseStageSpec>) -> Self {
        Self {
            stages: specs.into_iter().map(DefenseStageSpec::build).collect(),
        }
    }

    #[must_use]
    pub fn with(mut self, stage: impl DefenseStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Runs every stage in order and floors the result at zero.
    pub fn resolve(&self, amount: u32, element: Element, view: &DefenseView<'_>) -> u32 {
        let hit = self
            .stages
            .iter()
            .fold(IncomingHit::new(amount, element), |hit, stage| {
                stage.apply(hit, view)
            });
        u32::try_from(hit.amount.max(0)).unwrap_or(u32::MAX)
    }
}
