//! Encounter tuning.
//!
//! Fixed rules are associated constants; everything a data file may change
//! lives in [`EncounterConfig`] fields.

/// Encounter configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterConfig {
    /// Lowest value a ledger entry contributes at read time (10 = x0.1).
    pub modifier_floor: i64,
    /// Highest value a ledger entry contributes at read time (200 = x2.0).
    pub modifier_ceiling: i64,
    /// Number of lines the combat log retains.
    pub log_lines: usize,
    /// Width at which log messages are split into separate lines.
    pub log_width: usize,
    /// When false, the AI side's stats stay hidden until identified.
    pub reveal_foe: bool,
}

impl EncounterConfig {
    // ===== fixed rules =====
    /// Neutral ledger value (x1.0) every element starts at.
    pub const NEUTRAL_MODIFIER: i64 = 100;
    /// Denominator for percentage modifiers.
    pub const PERCENT: i64 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MODIFIER_FLOOR: i64 = 10;
    pub const DEFAULT_MODIFIER_CEILING: i64 = 200;
    pub const DEFAULT_LOG_LINES: usize = 8;
    pub const DEFAULT_LOG_WIDTH: usize = 87;

    pub fn new() -> Self {
        Self {
            modifier_floor: Self::DEFAULT_MODIFIER_FLOOR,
            modifier_ceiling: Self::DEFAULT_MODIFIER_CEILING,
            log_lines: Self::DEFAULT_LOG_LINES,
            log_width: Self::DEFAULT_LOG_WIDTH,
            reveal_foe: false,
        }
    }

    pub fn with_reveal_foe(mut self, reveal_foe: bool) -> Self {
        self.reveal_foe = reveal_foe;
        self
    }

    /// Clamps a raw ledger reading to the configured bounds.
    pub fn clamp_modifier(&self, value: i64) -> i64 {
        value.clamp(self.modifier_floor, self.modifier_ceiling.max(self.modifier_floor))
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_uses_configured_bounds() {
        let config = EncounterConfig::default();
        assert_eq!(config.clamp_modifier(-500), 10);
        assert_eq!(config.clamp_modifier(150), 150);
        assert_eq!(config.clamp_modifier(i64::MAX), 200);
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let config = EncounterConfig {
            modifier_floor: 50,
            modifier_ceiling: 20,
            ..EncounterConfig::default()
        };
        assert_eq!(config.clamp_modifier(0), 50);
        assert_eq!(config.clamp_modifier(500), 50);
    }
}
