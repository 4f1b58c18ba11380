//! Damage elements and element sets.

use strum::IntoEnumIterator;

/// Element carried by every effect and keyed by every modifier ledger.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Element {
    Physical,
    Poison,
    Lightning,
    Ice,
    Fire,
    Holy,
}

impl Element {
    /// Dense index used for array-backed storage.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-element set for this element.
    pub const fn set(self) -> ElementSet {
        match self {
            Self::Physical => ElementSet::PHYSICAL,
            Self::Poison => ElementSet::POISON,
            Self::Lightning => ElementSet::LIGHTNING,
            Self::Ice => ElementSet::ICE,
            Self::Fire => ElementSet::FIRE,
            Self::Holy => ElementSet::HOLY,
        }
    }
}

bitflags::bitflags! {
    /// Set of elements, used for ledger key restrictions and immunities.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ElementSet: u8 {
        const PHYSICAL = 1 << 0;
        const POISON = 1 << 1;
        const LIGHTNING = 1 << 2;
        const ICE = 1 << 3;
        const FIRE = 1 << 4;
        const HOLY = 1 << 5;
    }
}

impl ElementSet {
    /// Returns true when `element` is a member of this set.
    pub fn has(&self, element: Element) -> bool {
        self.contains(element.set())
    }

    /// Iterates the member elements in declaration order.
    pub fn elements(self) -> impl Iterator<Item = Element> {
        Element::iter().filter(move |element| self.has(*element))
    }
}

impl From<Element> for ElementSet {
    fn from(element: Element) -> Self {
        element.set()
    }
}

impl FromIterator<Element> for ElementSet {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ElementSet::empty(), |set, element| set | element.set())
    }
}
