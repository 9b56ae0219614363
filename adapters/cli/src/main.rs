#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a Blast Arena match and replays a command script.

mod script;
mod settings;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result as AnyResult};
use blast_arena_rendering::{ArenaSnapshot, TextGrid};
use clap::{Parser, ValueEnum};

use crate::{
    script::Session,
    settings::{Overrides, Settings},
};

/// Generates an arena, plays an optional command script and prints the final state.
#[derive(Debug, Parser)]
#[command(name = "blast-arena", version, about)]
struct Cli {
    /// TOML file with arena settings. Flags take precedence over its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of columns.
    #[arg(long)]
    width: Option<u32>,
    /// Number of rows.
    #[arg(long)]
    height: Option<u32>,
    /// Number of players to seat, at most four.
    #[arg(long)]
    players: Option<u32>,
    /// Blast power given to every player.
    #[arg(long)]
    power: Option<u32>,
    /// Bomb budget given to every player.
    #[arg(long)]
    bombs: Option<u32>,
    /// Fraction of eligible tiles that receive a box.
    #[arg(long)]
    density: Option<f64>,
    /// Seed for spawn shuffling and box placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Shuffle the corner spawns before seating players.
    #[arg(long)]
    randomize_spawns: bool,
    /// JSON array of commands to apply after generation.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// What to print once the script has run.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Both,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            players: self.players,
            power: self.power,
            bombs: self.bombs,
            box_density: self.density,
            seed: self.seed,
            randomize_spawns: self.randomize_spawns,
        }
    }

    fn settings(&self) -> AnyResult<Settings> {
        let base = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Ok(base.apply(&self.overrides()))
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Entry point for the Blast Arena command-line interface.
fn main() -> AnyResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let settings = cli.settings()?;
    let mut session = Session::new(&settings)?;

    if let Some(path) = &cli.script {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read script from {}", path.display()))?;
        let commands = script::parse(&contents)
            .with_context(|| format!("invalid script in {}", path.display()))?;
        session.play(&commands);
    }

    if matches!(cli.format, OutputFormat::Text | OutputFormat::Both) {
        println!("{}", TextGrid::capture(&session.world, &session.roster));
    }
    if matches!(cli.format, OutputFormat::Json | OutputFormat::Both) {
        println!(
            "{}",
            ArenaSnapshot::capture(&session.world, &session.roster).to_json()?
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "blast-arena",
            "--width",
            "7",
            "--players",
            "2",
            "--randomize-spawns",
            "--format",
            "both",
        ]);
        let settings = cli.settings().expect("defaults need no file");

        assert_eq!(settings.width, 7);
        assert_eq!(settings.height, Settings::default().height);
        assert_eq!(settings.players, 2);
        assert!(settings.randomize_spawns);
        assert_eq!(cli.format, OutputFormat::Both);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["blast-arena", "--config", "does/not/exist.toml"]);
        assert!(cli.settings().is_err());
    }
}
