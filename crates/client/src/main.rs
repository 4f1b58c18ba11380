//! Dungeon Dudes terminal client.
//!
//! Loads content, creates a fighter, and runs battles against monsters from
//! the catalog until the fighter falls or the player quits.
//!
//! ```bash
//! DUDES_SEED=42 DUDES_MONSTER=vampire cargo run -p dudes-client
//! ```

mod config;
mod input;
mod logging;
mod session;

use anyhow::Result;
use combat_content::{ContentFactory, Fighter};
use combat_core::CharacterRegistry;

use crate::config::ClientConfig;
use crate::session::Session;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let log_file = logging::setup_logging(&config.session_id())?;

    let factory = match &config.content_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    tracing::info!(data_dir = %factory.data_dir().display(), "loading content");

    let mut encounter_config = factory.load_config()?;
    if let Some(reveal) = config.reveal_foe {
        encounter_config.reveal_foe = reveal;
    }
    let template = factory.load_fighter()?;
    let catalog = factory.load_monsters()?;

    let mut lines = session::stdin_lines();
    let mut registry = CharacterRegistry::new();
    let mut hero = loop {
        let name = match &config.hero_name {
            Some(name) => name.clone(),
            None => match session::prompt("Name your fighter: ", &mut lines)? {
                Some(name) => name,
                None => return Ok(()),
            },
        };
        match Fighter::new(&name, &template, &mut registry) {
            Ok(hero) => break hero,
            Err(err) if config.hero_name.is_none() => println!("{err}"),
            Err(err) => return Err(err.into()),
        }
    };

    Session::new(&config, encounter_config, catalog).run(&mut hero, &mut lines)?;

    hero.retire(&mut registry);
    println!("Session log: {}", log_file.display());
    Ok(())
}
