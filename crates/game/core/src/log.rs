//! Bounded combat log.
//!
//! The log is injected into the encounter and handed to combatants on every
//! call, so narration never goes through global state. Messages longer than
//! the configured width are split into several lines; only the most recent
//! `limit` lines are kept.

use std::collections::VecDeque;

use crate::config::EncounterConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatLog {
    limit: usize,
    width: usize,
    lines: VecDeque<String>,
}

impl CombatLog {
    pub fn new(limit: usize, width: usize) -> Self {
        Self {
            limit: limit.max(1),
            width: width.max(1),
            lines: VecDeque::with_capacity(limit.max(1)),
        }
    }

    pub fn from_config(config: &EncounterConfig) -> Self {
        Self::new(config.log_lines, config.log_width)
    }

    /// Appends a message, splitting it at the configured width.
    pub fn push(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::debug!(target: "combat", "{message}");

        let chars: Vec<char> = message.chars().collect();
        for chunk in chars.chunks(self.width) {
            if self.lines.len() == self.limit {
                self.lines.pop_front();
            }
            self.lines.push_back(chunk.iter().collect());
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Renders exactly `limit` bracketed lines, padding with blanks.
    pub fn render(&self) -> String {
        let width = self.width;
        self.history()
            .map(|line| format!("| {line:<width$} |"))
            .chain(
                std::iter::repeat_with(|| format!("| {:width$} |", ""))
                    .take(self.limit - self.lines.len()),
            )
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for CombatLog {
    fn default() -> Self {
        Self::from_config(&EncounterConfig::default())
    }
}
