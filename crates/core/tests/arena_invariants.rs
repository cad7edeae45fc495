//! Randomized bot matches checked against the arena invariants every tick
use blast_arena_core::{
    ArenaConfig, ArenaEvent, ArenaSimulation, Cell, Direction, Millis, PlayerId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn drive_bots(sim: &mut ArenaSimulation, rng: &mut StdRng) {
    for id in PlayerId::ALL {
        if rng.random_bool(0.05) {
            sim.submit_bomb(id);
        }
        let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        sim.submit_move(id, direction);
    }
}

fn check_invariants(sim: &ArenaSimulation) {
    let snapshot = sim.snapshot();

    for (coord, cell) in snapshot.grid.iter() {
        let lattice = coord.x % 2 == 0 && coord.y % 2 == 0;
        assert_eq!(cell == Cell::Wall, lattice, "wall lattice broken at {coord}");
        if cell == Cell::Bomb {
            assert!(sim.bombs().at(coord).is_some(), "bomb cell without bomb at {coord}");
        }
    }

    for bomb in sim.bombs().sorted() {
        assert!(matches!(
            sim.cell(bomb.position()),
            Some(Cell::Bomb | Cell::Explosion)
        ));
    }

    for id in PlayerId::ALL {
        let player = sim.player(id);
        assert!(player.live_bombs().len() <= player.max_bombs() as usize);
        assert!(!sim
            .cell(player.position())
            .is_some_and(|c| matches!(c, Cell::Wall | Cell::Grass | Cell::GrassBreaking)));
    }
    assert_ne!(
        sim.player(PlayerId::P1).position(),
        sim.player(PlayerId::P2).position()
    );
}

#[test]
fn test_random_matches_hold_invariants() {
    for seed in [1_u64, 7, 42, 1234] {
        let config = ArenaConfig::default().with_seed(seed).with_grid_size(9);
        let mut sim = ArenaSimulation::new(config).unwrap();
        let mut bots = StdRng::seed_from_u64(seed ^ 0xB0B);
        let mut rounds_finished = 0;

        for _ in 0..20_000 {
            drive_bots(&mut sim, &mut bots);
            let report = sim.update(Millis::new(16));
            check_invariants(&sim);

            let game_overs = report
                .events
                .iter()
                .filter(|e| matches!(e, ArenaEvent::GameOver { .. }))
                .count();
            assert!(game_overs <= 1);

            if !sim.status().is_active() {
                rounds_finished += 1;
                // nothing changes after the round ends
                let report = sim.update(Millis::new(16));
                assert!(report.events.is_empty());
                sim.reset();
            }
        }

        assert_eq!(sim.round(), rounds_finished + 1, "seed {seed}");
    }
}

#[test]
fn test_same_seed_same_match() {
    let run = || {
        let config = ArenaConfig::default().with_seed(77).with_grid_size(9);
        let mut sim = ArenaSimulation::new(config).unwrap();
        let mut bots = StdRng::seed_from_u64(77);
        let mut log = Vec::new();
        for _ in 0..3_000 {
            drive_bots(&mut sim, &mut bots);
            log.extend(sim.update(Millis::new(16)).events);
        }
        (log, sim.snapshot())
    };

    let (events_a, snapshot_a) = run();
    let (events_b, snapshot_b) = run();
    assert_eq!(events_a, events_b);
    assert_eq!(snapshot_a, snapshot_b);
}
