//! Scripted command playback with blast resolution.

use anyhow::{Context, Result as AnyResult};
use blast_arena_core::{Command, Event, Roster};
use blast_arena_system_blast::Blast;
use blast_arena_world::{self as world, query, World};
use tracing::{debug, info};

use crate::settings::Settings;

/// Arena plus the roster lent to it and the systems that react to its events.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) world: World,
    pub(crate) roster: Roster,
    blast: Blast,
    log: Vec<Event>,
}

impl Session {
    pub(crate) fn new(settings: &Settings) -> AnyResult<Self> {
        let mut roster = settings.roster()?;
        let world = World::generate(&settings.arena_config(), &mut roster)
            .context("failed to generate arena")?;
        Ok(Self {
            world,
            roster,
            blast: Blast::new(),
            log: Vec::new(),
        })
    }

    /// Applies `command` and resolves every chained destruction before returning.
    pub(crate) fn submit(&mut self, command: Command) {
        let mut pending = vec![command];
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, &mut self.roster, command, &mut events);
            }
            for event in &events {
                debug!(?event, "event");
            }

            let world = &self.world;
            self.blast.handle(
                &events,
                &self.roster,
                |cell| query::bomb_at(world, cell),
                &mut pending,
            );
            self.log.extend(events);
        }
    }

    pub(crate) fn play(&mut self, script: &[Command]) {
        for command in script {
            self.submit(*command);
        }
        let rejected = self
            .log
            .iter()
            .filter(|event| matches!(event, Event::CommandRejected { .. }))
            .count();
        info!(
            commands = script.len(),
            events = self.log.len(),
            rejected,
            "script finished"
        );
    }
}

/// Parses a JSON array of commands.
pub(crate) fn parse(contents: &str) -> AnyResult<Vec<Command>> {
    serde_json::from_str(contents).context("failed to parse command script")
}
