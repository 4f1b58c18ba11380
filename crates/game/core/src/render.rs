//! Text rendering of the combat pane and the player command menu.
//!
//! Every line is 91 columns wide. Values belonging to a side that has not
//! been identified render as `??`.

use std::fmt::Display;

use strum::IntoEnumIterator;

use crate::combatant::{Combatant, Side};
use crate::element::Element;
use crate::engine::Encounter;

pub const PANE_WIDTH: usize = 91;
const INNER_WIDTH: usize = PANE_WIDTH - 3;
const HALF: usize = 43;
const QUARTER: usize = 21;

const HIDDEN: &str = "??";

fn rule() -> String {
    "*".repeat(PANE_WIDTH)
}

fn bracket(line: &str) -> String {
    format!("| {line:<INNER_WIDTH$}|")
}

fn shown(value: impl Display, revealed: bool) -> String {
    if revealed {
        value.to_string()
    } else {
        HIDDEN.to_string()
    }
}

/// Renders both combatants side by side with their modifiers.
pub fn combat_pane(encounter: &Encounter<'_>) -> String {
    let hero = encounter.combatant(Side::Hero);
    let foe = encounter.combatant(Side::Foe);
    let revealed = [
        encounter.is_identified(Side::Hero),
        encounter.is_identified(Side::Foe),
    ];

    let mut lines = vec![rule()];
    lines.push(bracket(&format!("{}| {}", title(hero), title(foe))));
    lines.push(rule());
    lines.push(bracket(&format!(
        "{}| {}",
        vitals(hero, revealed[0]),
        vitals(foe, revealed[1])
    )));
    lines.push(bracket(&format!(
        "{}| {}",
        powers(hero, revealed[0]),
        powers(foe, revealed[1])
    )));

    lines.push(rule());
    lines.push(format!("|{}  Modifiers  {}|", "-".repeat(38), "-".repeat(38)));
    lines.push(rule());
    lines.push(bracket(&header("Offensive", "Defensive")));
    lines.push(rule());
    for element in Element::iter() {
        let cells = [hero, foe].map(|combatant| {
            let offensive = combatant.damage_modifiers().get_or_neutral(element);
            let defensive = 100 - combatant.defense_modifiers().get_or_neutral(element);
            (offensive, defensive)
        });
        lines.push(bracket(&row(element, cells, revealed)));
    }

    let config = encounter.config();
    lines.push(rule());
    lines.push(bracket(&header("Battle Cry", "Aura")));
    lines.push(rule());
    for element in Element::iter() {
        let cells = [Side::Hero, Side::Foe].map(|side| {
            let modifiers = encounter.modifiers(side);
            (
                modifiers.offensive(element, config),
                modifiers.defensive(element, config),
            )
        });
        lines.push(bracket(&row(element, cells, revealed)));
    }
    lines.push(rule());

    lines.join("\n")
}

fn title(combatant: &dyn Combatant) -> String {
    let rank = format!("{}: {} ", combatant.class_name(), combatant.level());
    format!("{:<30}{:>13}", combatant.name(), rank)
}

fn vitals(combatant: &dyn Combatant, revealed: bool) -> String {
    let hp = format!(
        "HP: {}/{}",
        shown(combatant.hit_points(), revealed),
        shown(combatant.max_hit_points(), revealed)
    );
    let special = combatant
        .special()
        .map(|resource| {
            format!(
                "{}: {} ",
                shown(resource.name, revealed),
                shown(resource.amount, revealed)
            )
        })
        .unwrap_or_default();
    format!("{hp:<30}{special:>13}")
}

fn powers(combatant: &dyn Combatant, revealed: bool) -> String {
    let attack = format!("Attack Power: {}", shown(combatant.attack_power(), revealed));
    let defense = format!("Defense Power:{} ", shown(combatant.defense_power(), revealed));
    format!("{attack:<QUARTER$}{defense:>22}")
}

fn header(offensive: &str, defensive: &str) -> String {
    let right_off = format!("| {offensive}");
    let right_def = format!("| {defensive}");
    format!("{offensive:<QUARTER$}{right_def:<22}{right_off:<22}{right_def:<22}")
}

fn row(element: Element, cells: [(i64, i64); 2], revealed: [bool; 2]) -> String {
    let [(hero_off, hero_def), (foe_off, foe_def)] = cells;
    let cell = |value: i64, revealed: bool| shown(format!("{element}: {value}"), revealed);
    format!(
        "{:<QUARTER$}| {:<20}| {:<QUARTER$}| {}",
        cell(hero_off, revealed[0]),
        cell(hero_def, revealed[0]),
        cell(foe_off, revealed[1]),
        cell(foe_def, revealed[1]),
    )
}

/// Player command menu with consumable counts and the current skill list.
pub fn command_menu(hero: &dyn Combatant) -> String {
    let potions = format!(" Healing Potion ({})", hero.healing_potions());
    let scrolls = format!(" Scroll of Escape ({})", hero.escape_scrolls());

    let mut lines = vec![
        bracket(&format!("{:<HALF$}|{potions:<HALF$}", "Attack")),
        bracket(&format!("{:<HALF$}|{scrolls:<HALF$}", "Special")),
    ];
    for (index, skill) in hero.skills().iter().enumerate() {
        lines.push(bracket(&format!("  {}. {skill}", index + 1)));
    }
    lines.push(rule());
    lines.join("\n")
}
