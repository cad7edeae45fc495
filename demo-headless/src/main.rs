use anyhow::{anyhow, Context, Result};
use blast_arena_core::{
    ArenaConfig, ArenaEvent, ArenaSimulation, Direction, Millis, PlayerId, RoundOutcome,
};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Headless bomb arena runner: plays random-bot matches and reports results
#[derive(Parser, Debug)]
#[command(name = "blast-arena-headless")]
#[command(about = "Run bot matches in the bomb arena without a renderer", long_about = None)]
struct Args {
    /// Number of matches to play
    #[arg(short, long, default_value_t = 8)]
    matches: u64,

    /// Seed of the first match; match `i` uses `seed + i`
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Give up on a match after this many ticks
    #[arg(short = 't', long, default_value_t = 20_000)]
    max_ticks: u64,

    /// Worker threads (defaults to all cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// JSON config file; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the grid size (odd, at least 5)
    #[arg(short, long)]
    grid_size: Option<usize>,

    /// Start both players with the debug loadouts
    #[arg(short, long)]
    debug_loadouts: bool,

    /// Chance per tick that a bot tries to plant a bomb
    #[arg(long, default_value_t = 0.04)]
    bomb_chance: f64,

    /// Print the final board of every match
    #[arg(short, long)]
    boards: bool,
}

#[derive(Debug, Default)]
struct MatchRecord {
    seed: u64,
    outcome: Option<RoundOutcome>,
    ticks: u64,
    sim_time: Millis,
    bombs: u32,
    chains: u32,
    grass: u32,
    pickups: u32,
    companions_lost: u32,
    board: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.bomb_chance) {
        return Err(anyhow!("--bomb-chance must be in [0, 1]"));
    }

    let mut base = match &args.config {
        Some(path) => ArenaConfig::load(path)
            .with_context(|| format!("failed loading {}", path.display()))?,
        None => ArenaConfig::default(),
    };
    if let Some(size) = args.grid_size {
        base = base.with_grid_size(size);
    }
    if args.debug_loadouts {
        base = base.with_debug_loadouts();
    }
    base.validate().context("invalid arena config")?;

    println!("=== Blast Arena Headless ===\n");
    println!(
        "{} matches on a {}x{} grid, seeds {}..{}, tick {}",
        args.matches,
        base.grid_size,
        base.grid_size,
        args.seed,
        args.seed + args.matches,
        base.tick_interval
    );
    println!(
        "Fuse {}, blast {}, chain delay {}, max ticks {}\n",
        base.fuse_duration, base.explosion_duration, base.chain_delay, args.max_ticks
    );

    let seeds: Vec<u64> = (args.seed..args.seed + args.matches).collect();
    let run_one = |seed: &u64| play_match(&base, *seed, &args);

    let results: Vec<Result<MatchRecord>> = if let Some(jobs) = args.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| seeds.par_iter().map(run_one).collect())
    } else {
        seeds.par_iter().map(run_one).collect()
    };

    let mut records = Vec::with_capacity(results.len());
    for result in results {
        records.push(result?);
    }

    println!("Seed     | Outcome    | Ticks  | Time(s) | Bombs | Chains | Grass | Pickups | Pets lost");
    println!("---------|------------|--------|---------|-------|--------|-------|---------|----------");
    for r in &records {
        let outcome = r
            .outcome
            .map_or_else(|| "timeout".to_string(), |o| o.to_string());
        println!(
            "{:8} | {:10} | {:6} | {:7.1} | {:5} | {:6} | {:5} | {:7} | {:9}",
            r.seed,
            outcome,
            r.ticks,
            r.sim_time.as_secs_f32(),
            r.bombs,
            r.chains,
            r.grass,
            r.pickups,
            r.companions_lost
        );
        if args.boards {
            println!("{}", r.board);
        }
    }

    print_summary(&records);
    Ok(())
}

fn play_match(base: &ArenaConfig, seed: u64, args: &Args) -> Result<MatchRecord> {
    let config = base.clone().with_seed(seed);
    let tick = config.tick_interval;
    let mut sim = ArenaSimulation::new(config)
        .with_context(|| format!("failed creating arena for seed={seed}"))?;
    let mut bots = StdRng::seed_from_u64(seed.rotate_left(17));

    let mut record = MatchRecord {
        seed,
        ..MatchRecord::default()
    };

    for _ in 0..args.max_ticks {
        for id in PlayerId::ALL {
            if bots.random_bool(args.bomb_chance) {
                sim.submit_bomb(id);
            }
            let direction = Direction::ALL[bots.random_range(0..Direction::ALL.len())];
            sim.submit_move(id, direction);
        }

        let report = sim.update(tick);
        record.ticks = report.frame;
        record.sim_time = report.now;
        for event in &report.events {
            match event {
                ArenaEvent::BombPlaced { .. } => record.bombs += 1,
                ArenaEvent::BombDetonated { chained: true, .. } => record.chains += 1,
                ArenaEvent::GrassDestroyed { .. } => record.grass += 1,
                ArenaEvent::PowerupCollected { .. } => record.pickups += 1,
                ArenaEvent::CompanionLost { .. } => record.companions_lost += 1,
                _ => {}
            }
        }

        if let Some((outcome, _)) = report.game_over() {
            record.outcome = Some(outcome);
            record.board = report.snapshot.render_text();
            info!(seed, %outcome, ticks = record.ticks, "match finished");
            return Ok(record);
        }
    }

    debug!(seed, ticks = record.ticks, "match timed out");
    record.board = sim.snapshot().render_text();
    Ok(record)
}

fn print_summary(records: &[MatchRecord]) {
    let total = records.len();
    let count = |outcome: RoundOutcome| {
        records
            .iter()
            .filter(|r| r.outcome == Some(outcome))
            .count()
    };
    let p1 = count(RoundOutcome::Winner(PlayerId::P1));
    let p2 = count(RoundOutcome::Winner(PlayerId::P2));
    let draws = count(RoundOutcome::Draw);
    let timeouts = records.iter().filter(|r| r.outcome.is_none()).count();
    let finished: Vec<&MatchRecord> = records.iter().filter(|r| r.outcome.is_some()).collect();
    let avg_ticks = if finished.is_empty() {
        0.0
    } else {
        finished.iter().map(|r| r.ticks as f64).sum::<f64>() / finished.len() as f64
    };

    println!("\n=== Summary ===");
    println!("Matches:  {total}");
    println!("P1 wins:  {p1}");
    println!("P2 wins:  {p2}");
    println!("Draws:    {draws}");
    println!("Timeouts: {timeouts}");
    println!("Average ticks to finish: {avg_ticks:.1}");
}
