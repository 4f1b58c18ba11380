//! Effects and action bundles - the unit of exchange between combatants and
//! the encounter engine.
//!
//! A combatant action produces exactly one [`ActionBundle`]. The bundle is an
//! ordered, immutable list of [`Effect`]s that the engine consumes in order.
//!
//! # Permissive input
//!
//! Producers may emit effect kinds the engine does not know (experimental or
//! stale skills in content files). [`ActionBundle::from_specs`] drops those
//! silently so one bad entry never breaks a fight.

use std::str::FromStr;

use crate::element::Element;

/// Placeholder substituted with the resolved amount when narrating an effect.
pub const VALUE_PLACEHOLDER: &str = "<value>";

// ============================================================================
// Effect Kind
// ============================================================================

/// Supported effect kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum EffectKind {
    /// Damage routed through the modifier pipeline into the target.
    Attack,
    /// Healing already applied by the acting combatant; informational only.
    Heal,
    /// Adjusts the caster's defensive ledger.
    Aura,
    /// Adjusts the caster's offensive ledger.
    #[strum(to_string = "Battle Cry", serialize = "BattleCry")]
    BattleCry,
    /// Lowers the opponent's defensive ledger.
    Hex,
    /// Ends the encounter immediately.
    Escape,
    /// Reveals the opponent's stats.
    Identify,
}

impl EffectKind {
    /// Returns true for kinds that write to a modifier ledger.
    pub const fn is_ledger_effect(&self) -> bool {
        matches!(self, Self::Aura | Self::BattleCry | Self::Hex)
    }
}

// ============================================================================
// Effect
// ============================================================================

/// One atomic combat occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    pub magnitude: i32,
    pub element: Element,
    /// Narration with an optional `<value>` placeholder.
    pub template: String,
}

impl Effect {
    pub fn new(kind: EffectKind, magnitude: i32, element: Element, template: impl Into<String>) -> Self {
        Self {
            kind,
            magnitude,
            element,
            template: template.into(),
        }
    }

    pub fn attack(magnitude: i32, element: Element, template: impl Into<String>) -> Self {
        Self::new(EffectKind::Attack, magnitude, element, template)
    }

    /// Ledger or flag effect without narration.
    pub fn silent(kind: EffectKind, magnitude: i32, element: Element) -> Self {
        Self::new(kind, magnitude, element, String::new())
    }

    /// Converts an untyped spec, returning `None` when its kind or element is
    /// not supported.
    pub fn from_spec(spec: &EffectSpec) -> Option<Self> {
        let kind = EffectKind::from_str(spec.kind.trim()).ok()?;
        let element = Element::from_str(spec.element.trim()).ok()?;
        Some(Self::new(kind, spec.magnitude, element, spec.template.clone()))
    }

    /// Renders the template with `amount` in place of the placeholder.
    pub fn narrate(&self, amount: impl std::fmt::Display) -> String {
        narrate(&self.template, amount)
    }
}

/// Substitutes every `<value>` placeholder in `template`.
pub fn narrate(template: &str, amount: impl std::fmt::Display) -> String {
    template.replace(VALUE_PLACEHOLDER, &amount.to_string())
}

// ============================================================================
// Effect Spec (untyped producer form)
// ============================================================================

/// Untyped effect description as emitted by producers and content files.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub kind: String,
    pub magnitude: i32,
    pub element: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub template: String,
}

impl EffectSpec {
    pub fn new(
        kind: impl Into<String>,
        magnitude: i32,
        element: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            magnitude,
            element: element.into(),
            template: template.into(),
        }
    }
}

impl From<(&str, i32, &str, &str)> for EffectSpec {
    fn from((kind, magnitude, element, template): (&str, i32, &str, &str)) -> Self {
        Self::new(kind, magnitude, element, template)
    }
}

impl From<&Effect> for EffectSpec {
    fn from(effect: &Effect) -> Self {
        Self::new(
            effect.kind.to_string(),
            effect.magnitude,
            effect.element.to_string(),
            effect.template.clone(),
        )
    }
}

// ============================================================================
// Action Bundle
// ============================================================================

/// Ordered, immutable collection of effects produced by one action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionBundle {
    effects: Vec<Effect>,
    message: String,
    special: Option<String>,
}

impl ActionBundle {
    /// Builds a bundle from typed effects, preserving order.
    pub fn new(effects: impl IntoIterator<Item = Effect>, message: impl Into<String>) -> Self {
        Self {
            effects: effects.into_iter().collect(),
            message: message.into(),
            special: None,
        }
    }

    /// Builds a bundle from untyped specs, dropping unsupported entries.
    pub fn from_specs<I, S>(specs: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EffectSpec>,
    {
        let effects = specs
            .into_iter()
            .map(Into::into)
            .filter_map(|spec: EffectSpec| {
                let effect = Effect::from_spec(&spec);
                if effect.is_none() {
                    tracing::trace!(kind = %spec.kind, element = %spec.element, "dropping unsupported effect");
                }
                effect
            })
            .collect::<Vec<_>>();
        Self::new(effects, message)
    }

    /// Zero-effect bundle, used when an action fails locally.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }

    /// Attaches the optional special tag.
    #[must_use]
    pub fn with_special(mut self, special: impl Into<String>) -> Self {
        self.special = Some(special.into());
        self
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.effects.iter()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn special(&self) -> Option<&str> {
        self.special.as_deref()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Returns true when any effect has the given kind.
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }
}

impl<'b> IntoIterator for &'b ActionBundle {
    type Item = &'b Effect;
    type IntoIter = std::slice::Iter<'b, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.iter()
    }
}
