//! Element-keyed modifier ledgers.
//!
//! A [`ModifierLedger`] maps each allowed element to an integer percentage
//! (100 = neutral). Storage is never clamped: stacked buffs and debuffs keep
//! accumulating, and only the read-time view in [`Multiplier`] is bounded by
//! the [`EncounterConfig`] floor and ceiling.
//!
//! Each encounter side carries two ledgers in [`SideModifiers`]:
//!
//! - **Aura**: modifier to incoming damage (written by Aura and Hex)
//! - **Battle cry**: modifier to outgoing damage (written by Battle Cry)
//!
//! Combatants reuse the same type with a restricted key set for their
//! equipment-derived damage and defense modifiers.

use strum::EnumCount;

use crate::config::EncounterConfig;
use crate::element::{Element, ElementSet};
use crate::error::{CombatError, ErrorSeverity};

/// Errors raised by ledger writes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("element {element} is not tracked by this ledger (allowed: {allowed:?})")]
    DisallowedElement {
        element: Element,
        allowed: ElementSet,
    },
}

impl CombatError for LedgerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DisallowedElement { .. } => "LEDGER_DISALLOWED_ELEMENT",
        }
    }
}

// ============================================================================
// Modifier Ledger
// ============================================================================

/// Per-element accumulator restricted to an allowed key set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierLedger {
    allowed: ElementSet,
    values: [i64; Element::COUNT],
}

impl ModifierLedger {
    /// Ledger tracking `allowed`, every entry starting at `default`.
    pub fn new(allowed: ElementSet, default: i64) -> Self {
        Self {
            allowed,
            values: [default; Element::COUNT],
        }
    }

    /// Ledger tracking every element at the neutral value.
    pub fn neutral() -> Self {
        Self::new(ElementSet::all(), EncounterConfig::NEUTRAL_MODIFIER)
    }

    /// Ledger tracking only `allowed` at the neutral value.
    pub fn restricted(allowed: impl Into<ElementSet>) -> Self {
        Self::new(allowed.into(), EncounterConfig::NEUTRAL_MODIFIER)
    }

    pub fn allowed(&self) -> ElementSet {
        self.allowed
    }

    pub fn tracks(&self, element: Element) -> bool {
        self.allowed.has(element)
    }

    /// Reads an entry. Elements outside the allowed set yield `None`.
    pub fn get(&self, element: Element) -> Option<i64> {
        self.tracks(element).then(|| self.values[element.index()])
    }

    /// Reads an entry, treating untracked elements as neutral.
    pub fn get_or_neutral(&self, element: Element) -> i64 {
        self.get(element)
            .unwrap_or(EncounterConfig::NEUTRAL_MODIFIER)
    }

    /// Adds `delta` to an entry and returns the new stored value.
    ///
    /// Accumulation saturates at the `i64` bounds instead of wrapping.
    pub fn add(&mut self, element: Element, delta: i64) -> Result<i64, LedgerError> {
        let slot = self.slot_mut(element)?;
        *slot = slot.saturating_add(delta);
        Ok(*slot)
    }

    /// Subtracts `delta` from an entry and returns the new stored value.
    pub fn subtract(&mut self, element: Element, delta: i64) -> Result<i64, LedgerError> {
        let slot = self.slot_mut(element)?;
        *slot = slot.saturating_sub(delta);
        Ok(*slot)
    }

    /// Overwrites an entry.
    pub fn set(&mut self, element: Element, value: i64) -> Result<(), LedgerError> {
        *self.slot_mut(element)? = value;
        Ok(())
    }

    /// Tracked entries in element order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, i64)> + '_ {
        self.allowed
            .elements()
            .map(|element| (element, self.values[element.index()]))
    }

    fn slot_mut(&mut self, element: Element) -> Result<&mut i64, LedgerError> {
        if !self.tracks(element) {
            return Err(LedgerError::DisallowedElement {
                element,
                allowed: self.allowed,
            });
        }
        Ok(&mut self.values[element.index()])
    }
}

impl Default for ModifierLedger {
    fn default() -> Self {
        Self::neutral()
    }
}

// ============================================================================
// Side Modifiers
// ============================================================================

/// Aura and battle cry ledgers owned by one encounter side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideModifiers {
    pub aura: ModifierLedger,
    pub battle_cry: ModifierLedger,
}

impl SideModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamped defensive percentage for incoming damage of `element`.
    ///
    /// `defensive = clamp(200 - aura, floor, ceiling)`
    pub fn defensive(&self, element: Element, config: &EncounterConfig) -> i64 {
        let aura = self.aura.get_or_neutral(element);
        config.clamp_modifier(
            (2 * EncounterConfig::NEUTRAL_MODIFIER).saturating_sub(aura),
        )
    }

    /// Clamped offensive percentage for outgoing damage of `element`.
    pub fn offensive(&self, element: Element, config: &EncounterConfig) -> i64 {
        config.clamp_modifier(self.battle_cry.get_or_neutral(element))
    }
}

// ============================================================================
// Multiplier
// ============================================================================

/// Read-time damage multiplier, kept as two clamped percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Multiplier {
    pub defensive: i64,
    pub offensive: i64,
}

impl Multiplier {
    /// Multiplier for an attack from `attacker` against `defender`.
    pub fn between(
        attacker: &SideModifiers,
        defender: &SideModifiers,
        element: Element,
        config: &EncounterConfig,
    ) -> Self {
        Self {
            defensive: defender.defensive(element, config),
            offensive: attacker.offensive(element, config),
        }
    }

    /// Scales `magnitude`, flooring the result. Negative magnitudes deal 0.
    ///
    /// `floor(magnitude * defensive/100 * offensive/100)`
    pub fn apply(&self, magnitude: i32) -> u32 {
        let magnitude = i64::from(magnitude.max(0));
        let scaled = magnitude * self.defensive * self.offensive
            / (EncounterConfig::PERCENT * EncounterConfig::PERCENT);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }

    pub fn as_f64(&self) -> f64 {
        (self.defensive as f64 / 100.0) * (self.offensive as f64 / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn disallowed_read_is_none_and_write_fails() {
        let mut ledger = ModifierLedger::restricted(Element::Physical);
        assert_eq!(ledger.get(Element::Physical), Some(100));
        assert_eq!(ledger.get(Element::Fire), None);

        let err = ledger.add(Element::Fire, 10).unwrap_err();
        assert_eq!(
            err,
            LedgerError::DisallowedElement {
                element: Element::Fire,
                allowed: ElementSet::PHYSICAL,
            }
        );
        assert_eq!(err.error_code(), "LEDGER_DISALLOWED_ELEMENT");
        assert!(err.severity().is_internal());
    }

    #[test]
    fn storage_is_not_clamped() {
        let mut ledger = ModifierLedger::neutral();
        for _ in 0..100 {
            ledger.add(Element::Ice, 50).unwrap();
        }
        assert_eq!(ledger.get(Element::Ice), Some(5_100));
        assert_eq!(ledger.add(Element::Ice, i64::MAX).unwrap(), i64::MAX);
    }

    #[test]
    fn aura_then_hex_nets_back_to_original() {
        let mut side = SideModifiers::new();
        side.aura.add(Element::Holy, 35).unwrap();
        side.aura.subtract(Element::Holy, 35).unwrap();
        assert_eq!(side.aura.get(Element::Holy), Some(100));
    }

    #[test]
    fn battle_cry_scales_outgoing_damage() {
        let config = EncounterConfig::default();
        let mut attacker = SideModifiers::new();
        let defender = SideModifiers::new();
        attacker.battle_cry.add(Element::Fire, 50).unwrap();

        let multiplier = Multiplier::between(&attacker, &defender, Element::Fire, &config);
        assert_eq!(multiplier, Multiplier { defensive: 100, offensive: 150 });
        assert_eq!(multiplier.apply(20), 30);
        assert!((multiplier.as_f64() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn aura_reduces_incoming_damage() {
        let config = EncounterConfig::default();
        let attacker = SideModifiers::new();
        let mut defender = SideModifiers::new();
        defender.aura.add(Element::Physical, 15).unwrap();

        let multiplier = Multiplier::between(&attacker, &defender, Element::Physical, &config);
        assert_eq!(multiplier.defensive, 85);
        assert_eq!(multiplier.apply(40), 34);
    }

    #[test]
    fn negative_magnitude_deals_nothing() {
        let multiplier = Multiplier { defensive: 200, offensive: 200 };
        assert_eq!(multiplier.apply(-10), 0);
        assert_eq!(multiplier.apply(i32::MAX), (i32::MAX as u32).saturating_mul(4));
    }

    proptest! {
        #[test]
        fn defensive_stays_within_bounds(pushes in prop::collection::vec((any::<bool>(), any::<i32>()), 0..64)) {
            let config = EncounterConfig::default();
            let mut side = SideModifiers::new();
            for (is_hex, magnitude) in pushes {
                if is_hex {
                    side.aura.subtract(Element::Fire, i64::from(magnitude)).unwrap();
                } else {
                    side.aura.add(Element::Fire, i64::from(magnitude)).unwrap();
                }
                let defensive = side.defensive(Element::Fire, &config);
                prop_assert!((10..=200).contains(&defensive), "defensive={defensive}");
            }
        }

        #[test]
        fn offensive_stays_within_bounds(pushes in prop::collection::vec(any::<i64>(), 0..64)) {
            let config = EncounterConfig::default();
            let mut side = SideModifiers::new();
            for magnitude in pushes {
                side.battle_cry.add(Element::Lightning, magnitude).unwrap();
                let offensive = side.offensive(Element::Lightning, &config);
                prop_assert!((10..=200).contains(&offensive), "offensive={offensive}");
            }
        }
    }
}
