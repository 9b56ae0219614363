//! Arena settings loaded from a TOML file and overridden by flags.

use std::{fs, path::Path};

use anyhow::{ensure, Context, Result as AnyResult};
use blast_arena_core::{Player, PlayerId, Roster, MAX_PLAYERS};
use blast_arena_world::ArenaConfig;
use serde::Deserialize;

/// Knobs shared by the configuration file and the command line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) players: u32,
    pub(crate) power: u32,
    pub(crate) bombs: u32,
    pub(crate) box_density: f64,
    pub(crate) seed: u64,
    pub(crate) randomize_spawns: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let config = ArenaConfig::default();
        Self {
            width: config.width(),
            height: config.height(),
            players: 4,
            power: 2,
            bombs: 1,
            box_density: config.box_density(),
            seed: config.seed(),
            randomize_spawns: config.randomize_spawns(),
        }
    }
}

/// Values supplied on the command line. `None` keeps the file value.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) players: Option<u32>,
    pub(crate) power: Option<u32>,
    pub(crate) bombs: Option<u32>,
    pub(crate) box_density: Option<f64>,
    pub(crate) seed: Option<u64>,
    pub(crate) randomize_spawns: bool,
}

impl Settings {
    pub(crate) fn from_toml(contents: &str) -> AnyResult<Self> {
        toml::from_str(contents).context("failed to parse arena settings toml contents")
    }

    pub(crate) fn load(path: &Path) -> AnyResult<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub(crate) fn apply(mut self, overrides: &Overrides) -> Self {
        self.width = overrides.width.unwrap_or(self.width);
        self.height = overrides.height.unwrap_or(self.height);
        self.players = overrides.players.unwrap_or(self.players);
        self.power = overrides.power.unwrap_or(self.power);
        self.bombs = overrides.bombs.unwrap_or(self.bombs);
        self.box_density = overrides.box_density.unwrap_or(self.box_density);
        self.seed = overrides.seed.unwrap_or(self.seed);
        self.randomize_spawns |= overrides.randomize_spawns;
        self
    }

    pub(crate) fn arena_config(&self) -> ArenaConfig {
        ArenaConfig::new(self.width, self.height)
            .with_box_density(self.box_density)
            .with_seed(self.seed)
            .with_randomized_spawns(self.randomize_spawns)
    }

    /// Players numbered from zero, all sharing the configured power and budget.
    pub(crate) fn roster(&self) -> AnyResult<Roster> {
        ensure!(
            self.players as usize <= MAX_PLAYERS,
            "at most {MAX_PLAYERS} players are supported, got {}",
            self.players
        );
        let players = (0..self.players)
            .map(|id| Player::new(PlayerId::new(id), self.power, self.bombs))
            .collect();
        Roster::new(players).context("failed to build roster")
    }
}
