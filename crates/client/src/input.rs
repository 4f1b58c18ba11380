//! Parsing of typed player commands.
use combat_core::Command;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Help,
    Quit,
}

pub const HELP: &str = "Commands: attack (a) | special <n> (s <n>, or just <n>) | potion (p) | scroll (e) | help (?) | quit (q)";

/// Parses one input line. Special actions are numbered from 1 on screen.
pub fn parse(line: &str) -> Option<Input> {
    let mut words = line.split_whitespace();
    let head = words.next()?.to_ascii_lowercase();
    let tail = words.next();

    let input = match head.as_str() {
        "a" | "attack" => Input::Command(Command::Attack),
        "p" | "potion" | "heal" => Input::Command(Command::HealingPotion),
        "e" | "scroll" | "escape" => Input::Command(Command::EscapeScroll),
        "s" | "special" => Input::Command(Command::Special(slot(tail?)?)),
        "?" | "h" | "help" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        number => Input::Command(Command::Special(slot(number)?)),
    };
    Some(input)
}

fn slot(word: &str) -> Option<usize> {
    word.parse::<usize>().ok()?.checked_sub(1)
}
