use blast_arena_core::{
    BombId, Command, Coord, Direction, Event, FireId, Player, PlayerId, Roster,
};
use blast_arena_system_blast::Blast;
use blast_arena_world::{self as world, query, ArenaConfig, World};

fn corridor_arena(power: u32, bombs: u32) -> (World, Roster) {
    let mut roster = Roster::new(vec![
        Player::new(PlayerId::new(0), power, bombs),
        Player::new(PlayerId::new(1), power, bombs),
    ])
    .expect("distinct ids");
    let config = ArenaConfig::new(7, 1).with_box_density(0.0);
    let world = World::generate(&config, &mut roster).expect("valid arena");
    (world, roster)
}

/// Applies `command` and feeds resulting events through the blast system until it settles.
fn run(world: &mut World, roster: &mut Roster, command: Command, log: &mut Vec<Event>) {
    let blast = Blast::new();
    let mut pending = vec![command];

    while !pending.is_empty() {
        let mut events = Vec::new();
        for command in pending.drain(..) {
            world::apply(world, roster, command, &mut events);
        }
        log.extend(events.iter().cloned());

        let snapshot: &World = world;
        blast.handle(
            &events,
            roster,
            |cell| query::bomb_at(snapshot, cell),
            &mut pending,
        );
    }
}

#[test]
fn covered_bombs_detonate_in_a_chain() {
    let (mut world, mut roster) = corridor_arena(4, 2);
    let attacker = PlayerId::new(0);
    let mut log = Vec::new();

    let script = [
        Command::PlaceBomb { player: attacker },
        Command::MovePlayer {
            player: attacker,
            direction: Direction::East,
        },
        Command::MovePlayer {
            player: attacker,
            direction: Direction::East,
        },
        Command::PlaceBomb { player: attacker },
        Command::MovePlayer {
            player: attacker,
            direction: Direction::East,
        },
    ];
    for command in script {
        run(&mut world, &mut roster, command, &mut log);
    }
    assert_eq!(query::bombs(&world).len(), 2);

    log.clear();
    run(
        &mut world,
        &mut roster,
        Command::ExplodeBomb {
            bomb: BombId::new(0),
        },
        &mut log,
    );

    let exploded: Vec<BombId> = log
        .iter()
        .filter_map(|event| match event {
            Event::BombExploded { bomb, .. } => Some(*bomb),
            _ => None,
        })
        .collect();
    assert_eq!(exploded, vec![BombId::new(0), BombId::new(1)]);
    assert!(log.contains(&Event::PlayerEliminated { player: attacker }));
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::CommandRejected { .. })));

    let defender = roster.require(PlayerId::new(1)).expect("seated");
    assert!(defender.alive(), "defender stands four tiles away");
    assert!(query::bombs(&world).is_empty());
    assert_eq!(query::fires(&world).len(), 2);
}

#[test]
fn clearing_every_fire_restores_the_full_budget() {
    let (mut world, mut roster) = corridor_arena(3, 2);
    let player = PlayerId::new(1);
    let mut log = Vec::new();

    run(&mut world, &mut roster, Command::PlaceBomb { player }, &mut log);
    run(
        &mut world,
        &mut roster,
        Command::MovePlayer {
            player,
            direction: Direction::West,
        },
        &mut log,
    );
    run(&mut world, &mut roster, Command::PlaceBomb { player }, &mut log);
    assert_eq!(roster.require(player).map(Player::bombs_remaining), Ok(0));

    run(
        &mut world,
        &mut roster,
        Command::ExplodeBomb {
            bomb: BombId::new(1),
        },
        &mut log,
    );
    assert!(query::bombs(&world).is_empty(), "the corner bomb chained");
    assert_eq!(query::fires(&world).len(), 2);
    assert_eq!(roster.require(player).map(Player::bombs_remaining), Ok(0));

    for fire in query::fires(&world) {
        run(&mut world, &mut roster, Command::ClearFire { fire: fire.id }, &mut log);
    }
    assert_eq!(roster.require(player).map(Player::bombs_remaining), Ok(2));
    assert!(query::fires(&world).is_empty());
}

#[test]
fn blocking_boxes_are_destroyed() {
    let mut roster = Roster::new(vec![Player::new(PlayerId::new(0), 6, 1)]).expect("one player");
    let config = ArenaConfig::new(9, 9).with_box_density(1.0);
    let mut world = World::generate(&config, &mut roster).expect("valid arena");
    let mut log = Vec::new();

    run(
        &mut world,
        &mut roster,
        Command::SpawnFire {
            player: PlayerId::new(0),
            cell: Coord::new(2, 0),
        },
        &mut log,
    );

    assert!(log.contains(&Event::BoxDestroyed {
        cell: Coord::new(3, 0)
    }));
    assert!(!query::boxes(&world).contains(&Coord::new(3, 0)));
    assert!(
        log.contains(&Event::PlayerEliminated {
            player: PlayerId::new(0)
        }),
        "the spawn tile lies inside the blast"
    );
    assert_eq!(query::fires(&world)[0].id, FireId::new(0));
}

#[test]
fn deterministic_replay_produces_identical_logs() {
    let first = replay();
    let second = replay();
    assert_eq!(first, second, "replay diverged between runs");
    assert!(!first.is_empty());
}

fn replay() -> Vec<Event> {
    let mut roster = Roster::new(
        (0..4)
            .map(|id| Player::new(PlayerId::new(id), 3, 1))
            .collect(),
    )
    .expect("distinct ids");
    let config = ArenaConfig::new(13, 11)
        .with_seed(0x2f95_32c8)
        .with_randomized_spawns(true);
    let mut world = World::generate(&config, &mut roster).expect("valid arena");
    let mut log = Vec::new();

    for round in 0..6 {
        for id in 0..4 {
            let player = PlayerId::new(id);
            let direction = Direction::ALL[(round + id as usize) % Direction::ALL.len()];
            run(
                &mut world,
                &mut roster,
                Command::PlaceBomb { player },
                &mut log,
            );
            run(
                &mut world,
                &mut roster,
                Command::MovePlayer { player, direction },
                &mut log,
            );
        }

        for bomb in query::bombs(&world) {
            run(&mut world, &mut roster, Command::ExplodeBomb { bomb: bomb.id }, &mut log);
        }
        for fire in query::fires(&world) {
            run(&mut world, &mut roster, Command::ClearFire { fire: fire.id }, &mut log);
        }
    }

    log
}
