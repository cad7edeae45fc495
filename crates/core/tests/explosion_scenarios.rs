//! Blast propagation scenarios driven through the public tick API
use approx::assert_relative_eq;
use blast_arena_core::simulation::ScheduledEffect;
use blast_arena_core::{
    ArenaConfig, ArenaEvent, ArenaGrid, ArenaSimulation, Cell, Companion, Coord, Direction,
    Loadout, Millis, PlayerId, PowerupKind, RoundOutcome, SpawnSource,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn quiet_config() -> ArenaConfig {
    ArenaConfig {
        ambient_powerup_chance: 0.0,
        ..ArenaConfig::default().with_seed(2024)
    }
}

fn open_arena(config: ArenaConfig) -> ArenaSimulation {
    let grid = ArenaGrid::open(config.grid_size);
    ArenaSimulation::with_grid(config, grid).unwrap()
}

fn assert_wall_lattice(sim: &ArenaSimulation) {
    for (coord, cell) in sim.grid().iter() {
        let lattice = coord.x % 2 == 0 && coord.y % 2 == 0;
        assert_eq!(cell == Cell::Wall, lattice, "wall lattice broken at {coord}");
    }
}

#[test]
fn test_range_one_bomb_from_spawn() {
    let mut sim = open_arena(quiet_config());

    sim.submit_bomb(PlayerId::P1);
    sim.update(Millis::new(10));
    assert_eq!(sim.player(PlayerId::P1).live_bombs().len(), 1);

    sim.submit_move(PlayerId::P1, Direction::Down);
    sim.update(Millis::new(10));
    sim.update(Millis::new(190));
    sim.submit_move(PlayerId::P1, Direction::Down);
    sim.update(Millis::new(10));
    assert_eq!(sim.player(PlayerId::P1).position(), Coord::new(1, 3));

    // fuse expires at 10 + 2000
    sim.update(Millis::new(1789));
    assert_eq!(sim.cell(Coord::new(1, 1)), Some(Cell::Bomb));
    let report = sim.update(Millis::new(1));
    assert_eq!(report.now, Millis::new(2010));

    for coord in [
        Coord::new(1, 1),
        Coord::new(0, 1),
        Coord::new(2, 1),
        Coord::new(1, 0),
        Coord::new(1, 2),
    ] {
        assert_eq!(sim.cell(coord), Some(Cell::Explosion), "{coord}");
    }
    assert_eq!(sim.cell(Coord::new(3, 1)), Some(Cell::Empty));
    assert!(sim.player(PlayerId::P1).live_bombs().is_empty());
    assert!(sim.player(PlayerId::P1).is_alive());
    assert_wall_lattice(&sim);

    // footprint clears after the display duration
    sim.update(Millis::new(500));
    assert_eq!(sim.cell(Coord::new(1, 2)), Some(Cell::Empty));
    assert_eq!(sim.live_explosion_count(), 0);
}

#[test]
fn test_chain_waits_for_delay() {
    let config = quiet_config().with_loadout(
        PlayerId::P1,
        Loadout {
            speed: 1.0,
            bomb_range: 1,
            max_bombs: 2,
            companion: None,
        },
    );
    let mut sim = open_arena(config);

    sim.submit_bomb(PlayerId::P1);
    sim.update(Millis::new(10));
    sim.submit_move(PlayerId::P1, Direction::Right);
    sim.update(Millis::new(10));
    sim.submit_bomb(PlayerId::P1);
    sim.update(Millis::new(280));
    let second = sim.bombs().at(Coord::new(2, 1)).unwrap().id();

    sim.submit_move(PlayerId::P1, Direction::Right);
    sim.update(Millis::new(10));
    sim.update(Millis::new(200));
    sim.submit_move(PlayerId::P1, Direction::Down);
    sim.update(Millis::new(10));
    assert_eq!(sim.player(PlayerId::P1).position(), Coord::new(3, 2));

    // first bomb: 10 + 2000
    sim.update(Millis::new(1490));
    assert_eq!(sim.now(), Millis::new(2010));
    assert!(sim.bombs().get(second).unwrap().is_chain_pending());
    let chain = sim
        .pending_effects()
        .into_iter()
        .find(|e| e.effect == ScheduledEffect::ChainDetonation(second))
        .unwrap();
    assert_eq!(chain.due, Millis::new(2110));

    sim.update(Millis::new(90));
    assert!(sim.bombs().contains(second));

    let report = sim.update(Millis::new(10));
    assert!(!sim.bombs().contains(second));
    assert!(report.events.iter().any(|e| matches!(
        e,
        ArenaEvent::BombDetonated { bomb, chained: true, .. } if *bomb == second
    )));
    assert_eq!(sim.cell(Coord::new(3, 1)), Some(Cell::Explosion));
    assert_eq!(sim.cell(Coord::new(3, 2)), Some(Cell::Empty));
    assert!(sim.player(PlayerId::P1).is_alive());
    assert!(sim.player(PlayerId::P1).live_bombs().is_empty());

    // its own fuse later finds nothing to do
    let report = sim.update(Millis::new(300));
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, ArenaEvent::BombDetonated { .. })));
}

#[test]
fn test_companion_loss_restores_boosted_speed() {
    let config = quiet_config();
    let mut grid = ArenaGrid::open(config.grid_size);
    grid.set(Coord::new(1, 2), Cell::Powerup(PowerupKind::SpeedBoost));
    grid.set(Coord::new(1, 3), Cell::Powerup(PowerupKind::PetOwl));
    let mut sim = ArenaSimulation::with_grid(config, grid).unwrap();

    sim.submit_move(PlayerId::P1, Direction::Down);
    sim.update(Millis::new(10));
    assert_relative_eq!(sim.player(PlayerId::P1).speed(), 1.5);
    assert_relative_eq!(sim.player(PlayerId::P1).base_speed(), 1.5);

    // cooldown at speed 1.5 is 134ms
    sim.submit_move(PlayerId::P1, Direction::Down);
    sim.update(Millis::new(140));
    let p1 = sim.player(PlayerId::P1);
    assert_eq!(p1.position(), Coord::new(1, 3));
    assert_relative_eq!(p1.speed(), 2.0);
    assert!(p1.companion().is_some());

    sim.submit_bomb(PlayerId::P1);
    sim.update(Millis::new(10));
    let report = sim.update(Millis::new(2000));

    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, ArenaEvent::CompanionLost { player: PlayerId::P1, .. })));
    let p1 = sim.player(PlayerId::P1);
    assert!(p1.is_alive());
    assert!(p1.companion().is_none());
    assert_relative_eq!(p1.speed(), 1.5);
    assert!(p1.is_invulnerable(sim.now()));
    assert_eq!(p1.invulnerable_until(), Millis::new(2160 + 1500));
    assert!(sim.status().is_active());

    // standing in the live blast does nothing while invulnerable
    sim.update(Millis::new(100));
    assert!(sim.player(PlayerId::P1).is_alive());
}

#[test]
fn test_simultaneous_deaths_draw() {
    let config = quiet_config().with_grid_size(5).with_loadout(
        PlayerId::P1,
        Loadout {
            speed: 1.0,
            bomb_range: 2,
            max_bombs: 1,
            companion: None,
        },
    );
    let mut sim = open_arena(config);

    sim.submit_bomb(PlayerId::P1);
    sim.submit_move(PlayerId::P2, Direction::Up);
    sim.update(Millis::new(10));
    sim.submit_move(PlayerId::P2, Direction::Up);
    sim.update(Millis::new(200));
    assert_eq!(sim.player(PlayerId::P2).position(), Coord::new(3, 1));

    let report = sim.update(Millis::new(1800));
    assert_eq!(
        report.game_over(),
        Some((RoundOutcome::Draw, Millis::new(1000)))
    );
    assert!(!sim.player(PlayerId::P1).is_alive());
    assert!(!sim.player(PlayerId::P2).is_alive());
    assert_eq!(sim.player(PlayerId::P1).kills(), 1);
    assert_eq!(sim.player(PlayerId::P2).kills(), 0);

    let kills: Vec<_> = report
        .events
        .iter()
        .filter(|e| matches!(e, ArenaEvent::PlayerKilled { .. }))
        .collect();
    assert_eq!(kills.len(), 2);
}

#[test]
fn test_companion_absorbs_overlapping_blasts_once() {
    let config = quiet_config()
        .with_grid_size(7)
        .with_loadout(
            PlayerId::P1,
            Loadout {
                speed: 1.0,
                bomb_range: 1,
                max_bombs: 1,
                companion: Some(Companion::Owl),
            },
        )
        .with_loadout(
            PlayerId::P2,
            Loadout {
                speed: 1.0,
                bomb_range: 2,
                max_bombs: 1,
                companion: None,
            },
        );
    let mut sim = open_arena(config);

    // P2 walks from (5, 5) to (1, 3), two cells below P1
    sim.submit_move(PlayerId::P2, Direction::Up);
    sim.update(Millis::new(10));
    for direction in [
        Direction::Up,
        Direction::Left,
        Direction::Left,
        Direction::Left,
        Direction::Left,
    ] {
        sim.submit_move(PlayerId::P2, direction);
        sim.update(Millis::new(200));
    }
    assert_eq!(sim.now(), Millis::new(1010));
    assert_eq!(sim.player(PlayerId::P2).position(), Coord::new(1, 3));

    // both fuses expire at 3020 and both blasts cover (1, 1)
    sim.submit_bomb(PlayerId::P1);
    sim.submit_bomb(PlayerId::P2);
    sim.update(Millis::new(10));
    let due: Vec<Millis> = sim.bombs().sorted().iter().map(|b| b.detonates_at()).collect();
    assert_eq!(due, vec![Millis::new(3020), Millis::new(3020)]);

    sim.submit_move(PlayerId::P2, Direction::Down);
    sim.update(Millis::new(190));
    sim.submit_move(PlayerId::P2, Direction::Down);
    sim.update(Millis::new(200));
    sim.submit_move(PlayerId::P2, Direction::Right);
    sim.update(Millis::new(200));
    assert_eq!(sim.player(PlayerId::P2).position(), Coord::new(2, 5));

    let mut events = sim.update(Millis::new(1410)).events;
    assert_eq!(sim.now(), Millis::new(3020));
    events.extend(sim.update(Millis::new(200)).events);

    let detonations = events
        .iter()
        .filter(|e| matches!(e, ArenaEvent::BombDetonated { .. }))
        .count();
    assert_eq!(detonations, 2);
    let losses: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, ArenaEvent::CompanionLost { .. }))
        .collect();
    assert_eq!(
        losses,
        vec![&ArenaEvent::CompanionLost {
            player: PlayerId::P1,
            companion: Companion::Owl,
            invulnerable_until: Millis::new(4520),
        }]
    );
    assert!(!events
        .iter()
        .any(|e| matches!(e, ArenaEvent::PlayerKilled { .. })));

    let p1 = sim.player(PlayerId::P1);
    assert!(p1.is_alive());
    assert!(p1.companion().is_none());
    assert!(sim.player(PlayerId::P2).is_alive());
    assert!(sim.status().is_active());
}

#[test]
fn test_grass_drop_appears_when_blast_clears() {
    let config = ArenaConfig {
        grass_powerup_chance: 1.0,
        ..quiet_config()
    };
    let mut grid = ArenaGrid::open(config.grid_size);
    grid.set(Coord::new(3, 1), Cell::Grass);
    grid.set(Coord::new(4, 1), Cell::Grass);
    let mut sim = ArenaSimulation::with_grid(config, grid).unwrap();

    sim.submit_move(PlayerId::P1, Direction::Right);
    sim.update(Millis::new(10));
    sim.submit_bomb(PlayerId::P1);
    sim.update(Millis::new(10));
    sim.submit_move(PlayerId::P1, Direction::Left);
    sim.update(Millis::new(200));
    sim.submit_move(PlayerId::P1, Direction::Down);
    sim.update(Millis::new(200));
    assert_eq!(sim.player(PlayerId::P1).position(), Coord::new(1, 2));

    // bomb at (2, 1) planted at 20
    sim.update(Millis::new(1600));
    assert_eq!(sim.now(), Millis::new(2020));
    assert_eq!(sim.cell(Coord::new(3, 1)), Some(Cell::GrassBreaking));
    assert_eq!(sim.cell(Coord::new(4, 1)), Some(Cell::Grass));

    sim.update(Millis::new(200));
    assert_eq!(sim.cell(Coord::new(3, 1)), Some(Cell::Empty));

    let report = sim.update(Millis::new(300));
    assert!(matches!(sim.cell(Coord::new(3, 1)), Some(Cell::Powerup(_))));
    assert!(report.events.iter().any(|e| matches!(
        e,
        ArenaEvent::PowerupSpawned { position, .. } if *position == Coord::new(3, 1)
    )));
    assert_eq!(sim.cell(Coord::new(4, 1)), Some(Cell::Grass));
}

#[test]
fn test_bomb_at_capacity_is_noop() {
    let mut sim = open_arena(quiet_config());
    sim.submit_bomb(PlayerId::P1);
    sim.update(Millis::new(10));
    sim.submit_move(PlayerId::P1, Direction::Right);
    sim.update(Millis::new(10));

    let grid = sim.grid().clone();
    let bombs = sim.live_bomb_count();
    let pending = sim.pending_effects().len();

    sim.submit_bomb(PlayerId::P1);
    let report = sim.update(Millis::new(10));

    assert_eq!(sim.grid(), &grid);
    assert_eq!(sim.live_bomb_count(), bombs);
    assert_eq!(sim.pending_effects().len(), pending);
    assert!(report.events.is_empty());
    assert!(sim.executed_intents().is_empty());
}

#[test]
fn test_ambient_spawn_on_wall_discarded() {
    let mut sim = open_arena(quiet_config());
    let before = sim.grid().clone();

    assert_eq!(
        sim.try_spawn_powerup(Coord::new(4, 4), SpawnSource::Ambient),
        None
    );
    assert_eq!(sim.grid(), &before);
}
