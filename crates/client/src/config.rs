//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Settings for one play session.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub session_id: Option<String>,
    pub seed: Option<u64>,
    pub content_dir: Option<PathBuf>,
    pub hero_name: Option<String>,
    pub monster: Option<String>,
    pub monster_level: Option<u32>,
    pub reveal_foe: Option<bool>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUDES_SESSION_ID` - Session identifier for log files (default: timestamp)
    /// - `DUDES_SEED` - Game seed (default: current time)
    /// - `DUDES_CONTENT_DIR` - Data directory (default: bundled content)
    /// - `DUDES_HERO_NAME` - Skip the name prompt
    /// - `DUDES_MONSTER` - Always fight this monster id
    /// - `DUDES_MONSTER_LEVEL` - Monster level (default: the hero's level)
    /// - `DUDES_REVEAL_FOE` - Overrides `reveal_foe` from encounter.toml
    pub fn from_env() -> Self {
        Self {
            session_id: env::var("DUDES_SESSION_ID").ok(),
            seed: read_env("DUDES_SEED"),
            content_dir: env::var("DUDES_CONTENT_DIR").ok().map(PathBuf::from),
            hero_name: env::var("DUDES_HERO_NAME").ok().filter(|name| !name.trim().is_empty()),
            monster: env::var("DUDES_MONSTER").ok(),
            monster_level: read_env::<u32>("DUDES_MONSTER_LEVEL").map(|level| level.max(1)),
            reveal_foe: read_env("DUDES_REVEAL_FOE"),
        }
    }

    pub fn session_id(&self) -> String {
        self.session_id
            .clone()
            .unwrap_or_else(|| format!("session_{}", unix_time()))
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(unix_time)
    }
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
