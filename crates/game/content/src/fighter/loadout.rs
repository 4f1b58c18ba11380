//! Fighter equipment: one weapon, one suit of armor, one shield.

use combat_core::{Element, ModifierLedger};
use serde::{Deserialize, Serialize};

fn physical() -> Element {
    Element::Physical
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub attack: u32,
    #[serde(default = "physical")]
    pub element: Element,
    /// Outgoing damage adjustments, in percentage points.
    #[serde(default)]
    pub modifiers: Vec<(Element, i64)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub defense: u32,
    /// Incoming damage reductions, in percentage points.
    #[serde(default)]
    pub resistances: Vec<(Element, i64)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    pub name: String,
    pub defense: u32,
    #[serde(default)]
    pub resistances: Vec<(Element, i64)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub weapon: Weapon,
    pub armor: Armor,
    pub shield: Shield,
}

impl Loadout {
    /// Equipment a new fighter walks out of town with.
    pub fn starter() -> Self {
        Self {
            weapon: Weapon {
                name: "Short Sword".into(),
                attack: 4,
                element: Element::Physical,
                modifiers: Vec::new(),
            },
            armor: Armor {
                name: "Leather Armor".into(),
                defense: 2,
                resistances: Vec::new(),
            },
            shield: Shield {
                name: "Buckler".into(),
                defense: 1,
                resistances: Vec::new(),
            },
        }
    }

    pub fn attack_bonus(&self) -> u32 {
        self.weapon.attack
    }

    pub fn defense_bonus(&self) -> u32 {
        self.armor.defense + self.shield.defense
    }

    /// Writes equipment modifiers into the wearer's ledgers.
    ///
    /// Entries for elements a ledger does not track are skipped.
    pub fn apply(&self, damage: &mut ModifierLedger, defense: &mut ModifierLedger) {
        for (element, delta) in &self.weapon.modifiers {
            if damage.add(*element, *delta).is_err() {
                tracing::warn!(weapon = %self.weapon.name, %element, "untracked damage modifier ignored");
            }
        }

        let resistances = self.armor.resistances.iter().chain(&self.shield.resistances);
        for (element, reduction) in resistances {
            if defense.subtract(*element, *reduction).is_err() {
                tracing::warn!(%element, "untracked resistance ignored");
            }
        }
    }
}

impl Default for Loadout {
    fn default() -> Self {
        Self::starter()
    }
}

#[cfg(test)]
mod tests {
    use combat_core::ElementSet;

    use super::*;

    #[test]
    fn resistances_lower_incoming_modifiers() {
        let mut loadout = Loadout::starter();
        loadout.armor.resistances.push((Element::Fire, 20));
        loadout.shield.resistances.push((Element::Fire, 5));
        loadout.weapon.modifiers.push((Element::Physical, 15));
        loadout.weapon.modifiers.push((Element::Holy, 15));

        let mut damage = ModifierLedger::restricted(ElementSet::PHYSICAL);
        let mut defense = ModifierLedger::neutral();
        loadout.apply(&mut damage, &mut defense);

        assert_eq!(damage.get(Element::Physical), Some(115));
        assert_eq!(damage.get(Element::Holy), None);
        assert_eq!(defense.get(Element::Fire), Some(75));
        assert_eq!(loadout.defense_bonus(), 3);
    }
}
