//! Interactive play: one fighter, a string of battles, stdin commands.
use std::io::{self, BufRead, Write};

use anyhow::Result;
use combat_content::{Fighter, Monster, MonsterCatalog};
use combat_core::{
    CombatLog, Combatant, Dice, Encounter, EncounterConfig, EncounterState, PcgRng,
    PresentationHook, Side, Termination, compute_seed, render,
};

use crate::config::ClientConfig;
use crate::input::{self, HELP, Input};

/// Prints every refreshed pane together with the log beneath it.
struct TerminalHook;

impl PresentationHook for TerminalHook {
    fn refresh(&mut self, pane: &str, log: &CombatLog) {
        println!("{pane}\n{}", log.render());
    }
}

pub struct Session<'c> {
    config: &'c ClientConfig,
    encounter_config: EncounterConfig,
    catalog: MonsterCatalog,
    seed: u64,
    battles: u64,
    rng: PcgRng,
}

impl<'c> Session<'c> {
    pub fn new(
        config: &'c ClientConfig,
        encounter_config: EncounterConfig,
        catalog: MonsterCatalog,
    ) -> Self {
        Self {
            seed: config.seed(),
            config,
            encounter_config,
            catalog,
            battles: 0,
            rng: PcgRng,
        }
    }

    /// Fights until the hero dies, the player quits, or input runs out.
    pub fn run(
        &mut self,
        hero: &mut Fighter,
        lines: &mut impl Iterator<Item = io::Result<String>>,
    ) -> Result<()> {
        tracing::info!(seed = self.seed, hero = hero.name(), "session started");

        loop {
            let Some(mut foe) = self.next_monster(hero.level()) else {
                anyhow::bail!("monster catalog is empty");
            };
            println!("\nA level {} {} appears!", foe.level(), foe.name());

            let outcome = self.battle(hero, &mut foe, lines)?;
            self.battles += 1;
            tracing::info!(battle = self.battles, ?outcome, "battle finished");

            match outcome {
                None => return Ok(()),
                Some(Termination::Defeat) => {
                    println!("Game over after {} battles won.", hero.battles_won());
                    return Ok(());
                }
                Some(_) => {}
            }

            println!(
                "{} | Level {} | HP {}/{} | Gold {} | Exp {}/{}",
                hero.name(),
                hero.level(),
                hero.hit_points(),
                hero.max_hit_points(),
                hero.gold(),
                hero.experience(),
                hero.experience_needed(),
            );
            if !confirm("Seek another battle? (y/n) ", lines)? {
                return Ok(());
            }
        }
    }

    fn next_monster(&self, hero_level: u32) -> Option<Monster> {
        let level = self.config.monster_level.unwrap_or(hero_level);
        let template = match &self.config.monster {
            Some(id) => {
                let found = self.catalog.get(id);
                if found.is_none() {
                    tracing::warn!(monster = %id, "unknown monster id, picking at random");
                }
                found
            }
            None => None,
        };
        let template = match template {
            Some(template) => template,
            None => {
                let seed = compute_seed(self.seed, self.battles, 1);
                self.catalog.choose(&mut Dice::new(&self.rng, seed))?
            }
        };
        Some(Monster::spawn(template, level))
    }

    fn battle(
        &self,
        hero: &mut Fighter,
        foe: &mut Monster,
        lines: &mut impl Iterator<Item = io::Result<String>>,
    ) -> Result<Option<Termination>> {
        let seed = compute_seed(self.seed, self.battles, 0);
        let config = self.encounter_config.clone();
        let mut encounter =
            Encounter::new(hero, foe, &self.rng, seed, config).with_hook(TerminalHook);

        loop {
            match encounter.state() {
                EncounterState::Terminated(termination) => {
                    println!("{encounter}\n{}", encounter.log().render());
                    return Ok(Some(termination));
                }
                EncounterState::Active(Side::Foe) => {
                    encounter.ai_turn()?;
                }
                EncounterState::Active(Side::Hero) => {
                    println!(
                        "{encounter}\n{}\n{}",
                        encounter.log().render(),
                        render::command_menu(encounter.combatant(Side::Hero))
                    );
                    let Some(line) = prompt("> ", lines)? else {
                        return Ok(None);
                    };
                    match input::parse(&line) {
                        Some(Input::Command(command)) => {
                            encounter.player_command(command)?;
                        }
                        Some(Input::Help) => println!("{HELP}"),
                        Some(Input::Quit) => return Ok(None),
                        None => println!("Unrecognized command '{}'. {HELP}", line.trim()),
                    }
                }
            }
        }
    }
}

pub fn prompt(
    text: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    Ok(lines.next().transpose()?)
}

fn confirm(text: &str, lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<bool> {
    loop {
        let Some(answer) = prompt(text, lines)? else {
            return Ok(false);
        };
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}

/// Locked stdin as a line iterator.
pub fn stdin_lines() -> impl Iterator<Item = io::Result<String>> {
    io::stdin().lock().lines()
}
