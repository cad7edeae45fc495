//! Interactive Blast Arena Demo
//!
//! A terminal-based debugger for the bomb arena. Drive both players by hand,
//! step the clock, and inspect bombs, pending effects and the board.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! cargo run --package demo-interactive -- --config arena.json --seed 7
//! ```
//!
//! Without `--config` the debugger prompts for grid size, seed and loadouts.
//!
//! # Commands
//!
//! - `move <p1|p2> <up|down|left|right>` - Queue a move for the next tick
//! - `bomb <p1|p2>` - Queue a bomb placement for the next tick
//! - `step [n]` - Advance n ticks of the configured interval (default 1)
//! - `wait <ms>` - Advance the clock in ticks until `ms` have passed
//! - `show` - Print the board
//! - `status` - Show round, clock and player state
//! - `bombs` - List live bombs
//! - `blasts` - List live explosions and the bombs that made them
//! - `pending` - List scheduled effects in firing order
//! - `history [n]` - Show the last n applied intents (default 10)
//! - `spawn <x> <y>` - Try to drop a random powerup on an empty cell
//! - `reset` - Start a new round on fresh terrain
//! - `help` - Show available commands
//! - `quit` - Exit

use blast_arena_core::{
    ArenaConfig, ArenaEvent, ArenaSimulation, ConfigError, Coord, Direction, IntentKind, Millis,
    PlayerId, SpawnSource, TickReport,
};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default arena side length
const DEFAULT_GRID_SIZE: usize = 15;

/// Interactive bomb arena debugger
#[derive(Parser, Debug)]
#[command(name = "blast-arena-debugger")]
#[command(about = "Step the bomb arena by hand and inspect its state", long_about = None)]
struct Args {
    /// JSON config file; skips the startup prompts
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed, overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║          Blast Arena - Interactive Debugger               ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let config = match &args.config {
        Some(path) => match load_config(path, args.seed) {
            Ok(config) => {
                println!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                eprintln!("Failed to load {}: {e}", path.display());
                return;
            }
        },
        None => prompt_arena_config(args.seed),
    };
    let mut sim = match ArenaSimulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Failed to create arena: {e}");
            return;
        }
    };

    println!(
        "Created a {}x{} arena (seed {})",
        sim.grid().size(),
        sim.grid().size(),
        sim.config()
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string())
    );
    print_board(&sim);

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {}", e);
            return;
        }
    };

    println!("\nType 'help' for available commands.\n");

    loop {
        let readline = rl.readline("arena> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                if parts.is_empty() {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "move" | "m" => {
                        let player = parts.get(1).and_then(|s| PlayerId::from_name(s));
                        let direction = parts.get(2).and_then(|s| Direction::from_name(s));
                        if let (Some(player), Some(direction)) = (player, direction) {
                            sim.submit_move(player, direction);
                            println!("Queued {player} {direction:?}");
                        } else {
                            println!("Usage: move <p1|p2> <up|down|left|right>");
                        }
                    }
                    "bomb" | "b" => {
                        if let Some(player) = parts.get(1).and_then(|s| PlayerId::from_name(s)) {
                            sim.submit_bomb(player);
                            println!("Queued bomb for {player}");
                        } else {
                            println!("Usage: bomb <p1|p2>");
                        }
                    }
                    "step" | "s" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                        step_simulation(&mut sim, count);
                    }
                    "wait" | "w" => {
                        if let Some(ms) = parts.get(1).and_then(|s| s.parse::<u64>().ok()) {
                            wait_simulation(&mut sim, Millis::new(ms));
                        } else {
                            println!("Usage: wait <ms>");
                        }
                    }
                    "show" | "g" => print_board(&sim),
                    "status" | "st" => show_status(&sim),
                    "bombs" => show_bombs(&sim),
                    "blasts" | "bl" => show_explosions(&sim),
                    "pending" | "pe" => show_pending(&sim),
                    "history" | "hi" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
                        show_history(&sim, count);
                    }
                    "spawn" => {
                        let x = parts.get(1).and_then(|s| s.parse::<usize>().ok());
                        let y = parts.get(2).and_then(|s| s.parse::<usize>().ok());
                        if let (Some(x), Some(y)) = (x, y) {
                            let coord = Coord::new(x, y);
                            match sim.try_spawn_powerup(coord, SpawnSource::Ambient) {
                                Some(kind) => println!("Spawned {kind:?} at {coord}"),
                                None => println!("Cell {coord} is not empty, nothing spawned"),
                            }
                        } else {
                            println!("Usage: spawn <x> <y>");
                        }
                    }
                    "reset" | "r" => {
                        sim.reset();
                        println!("Round {} started", sim.round());
                        print_board(&sim);
                    }
                    "help" | "?" => show_help(),
                    "quit" | "q" | "exit" => {
                        println!("Exiting...");
                        break;
                    }
                    _ => println!(
                        "Unknown command: {}. Type 'help' for available commands.",
                        parts[0]
                    ),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
}

/// Read one line from stdin; empty on any I/O failure
fn prompt_line(label: &str) -> String {
    print!("{label}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

/// Config file plus an optional seed override
fn load_config(path: &Path, seed: Option<u64>) -> Result<ArenaConfig, ConfigError> {
    let mut config = ArenaConfig::load(path)?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Prompt user for arena parameters at startup; a given seed skips that prompt
fn prompt_arena_config(seed: Option<u64>) -> ArenaConfig {
    println!("Enter arena parameters (or press Enter for defaults):");

    let size = prompt_line(&format!("  Grid size (odd, >= 5) [{DEFAULT_GRID_SIZE}]: "))
        .parse()
        .unwrap_or(DEFAULT_GRID_SIZE);
    let size = if size >= 5 && size % 2 == 1 {
        size
    } else {
        println!("  {size} is not a valid size, using {DEFAULT_GRID_SIZE}");
        DEFAULT_GRID_SIZE
    };

    let mut config = ArenaConfig::default().with_grid_size(size);
    if let Some(seed) = seed.or_else(|| prompt_line("  Seed [random]: ").parse().ok()) {
        config = config.with_seed(seed);
    }
    if prompt_line("  Debug loadouts? [y/N]: ").eq_ignore_ascii_case("y") {
        config = config.with_debug_loadouts();
    }

    println!();
    config
}

fn step_simulation(sim: &mut ArenaSimulation, count: u32) {
    let dt = sim.config().tick_interval;
    println!("Stepping {} tick(s) of {}...", count, dt);

    for _ in 0..count {
        let report = sim.update(dt);
        print_events(&report);
        if report.game_over().is_some() {
            print_board(sim);
            break;
        }
    }
    println!("Done. Clock at {}", sim.now());
}

fn wait_simulation(sim: &mut ArenaSimulation, duration: Millis) {
    let dt = sim.config().tick_interval;
    let target = sim.now() + duration;
    while sim.now() < target {
        let remaining = target - sim.now();
        let report = sim.update(remaining.min(dt));
        print_events(&report);
    }
    println!("Done. Clock at {}", sim.now());
}

fn print_events(report: &TickReport) {
    for event in &report.events {
        let line = match event {
            ArenaEvent::RoundReset { round } => format!("round {round} started"),
            ArenaEvent::BombPlaced {
                player, position, ..
            } => format!("{player} planted a bomb at {position}"),
            ArenaEvent::BombDetonated {
                owner,
                position,
                chained,
                cells,
                ..
            } => format!(
                "{owner}'s bomb at {position} exploded{} covering {} cells",
                if *chained { " (chain)" } else { "" },
                cells.len()
            ),
            ArenaEvent::GrassDestroyed {
                position,
                drops_powerup,
            } => format!(
                "grass at {position} destroyed{}",
                if *drops_powerup { ", drops a powerup" } else { "" }
            ),
            ArenaEvent::PowerupCollected {
                player,
                kind,
                position,
            } => format!("{player} collected {kind:?} at {position}"),
            ArenaEvent::PowerupSpawned {
                position,
                kind,
                source,
            } => format!("{kind:?} appeared at {position} ({source:?})"),
            ArenaEvent::CompanionLost {
                player,
                companion,
                invulnerable_until,
            } => format!("{player} lost the {companion:?}, safe until {invulnerable_until}"),
            ArenaEvent::InvulnerabilityEnded { player } => {
                format!("{player} is vulnerable again")
            }
            ArenaEvent::PlayerKilled { victim, killer } => match killer {
                Some(killer) => format!("{victim} was blown up by {killer}"),
                None => format!("{victim} blew themselves up"),
            },
            ArenaEvent::GameOver {
                outcome,
                prompt_delay,
            } => format!("GAME OVER: {outcome} (restart prompt after {prompt_delay})"),
        };
        println!("  [{:>7}] {}", report.now, line);
    }
}

fn print_board(sim: &ArenaSimulation) {
    println!();
    for line in sim.snapshot().render_text().lines() {
        println!("  {line}");
    }
    println!();
}

fn show_status(sim: &ArenaSimulation) {
    let snapshot = sim.snapshot();
    println!("\n═══════════════ ARENA STATUS ═══════════════");
    println!("Round:             {}", snapshot.round);
    println!("Status:            {:?}", snapshot.status);
    println!("Clock:             {} (frame {})", snapshot.now, snapshot.frame);
    println!("Live bombs:        {}", sim.live_bomb_count());
    println!("Live explosions:   {}", sim.live_explosion_count());
    println!("Queued intents:    {}", sim.pending_intent_count());

    for p in &snapshot.players {
        println!("\n{}:", p.id);
        println!("  Position:        {}", p.position);
        println!("  Alive:           {}", p.alive);
        println!("  Facing:          {:?}", p.orientation);
        println!("  Speed:           {:.2} (base {:.2})", p.speed, p.base_speed);
        println!("  Bomb range:      {}", p.bomb_range);
        println!("  Bombs:           {}/{}", p.live_bombs, p.max_bombs);
        println!("  Companion:       {:?}", p.companion);
        println!("  Invulnerable:    {}", p.invulnerable_for);
        println!("  Kills:           {}", p.kills);
    }
    println!("════════════════════════════════════════════\n");
}

fn show_bombs(sim: &ArenaSimulation) {
    let bombs = sim.bombs().sorted();
    if bombs.is_empty() {
        println!("No live bombs.");
        return;
    }

    println!("\n═══════════════ LIVE BOMBS ═══════════════");
    println!("  ID  | Owner | Pos      | Range | Planted  | Fuse at  | Chain");
    println!("  ----|-------|----------|-------|----------|----------|------");
    for bomb in bombs {
        println!(
            "  {:3} | {:5} | {:8} | {:5} | {:8} | {:8} | {}",
            bomb.id().raw(),
            bomb.owner().to_string(),
            bomb.position().to_string(),
            bomb.range(),
            bomb.planted_at().to_string(),
            bomb.detonates_at().to_string(),
            if bomb.is_chain_pending() { "yes" } else { "" }
        );
    }
    println!("══════════════════════════════════════════\n");
}

fn show_explosions(sim: &ArenaSimulation) {
    if sim.explosions().is_empty() {
        println!("No live explosions.");
        return;
    }

    println!("\n═══════════════ LIVE EXPLOSIONS ═══════════════");
    for explosion in sim.explosions().iter() {
        println!(
            "  {} from {} covers {} cells, clears at {}",
            explosion.owner(),
            explosion.source(),
            explosion.coords().len(),
            explosion.clear_at()
        );
    }
    println!("═══════════════════════════════════════════════\n");
}

fn show_history(sim: &ArenaSimulation, count: usize) {
    let history: Vec<_> = sim.intent_history().collect();
    if history.is_empty() {
        println!("No intents applied yet.");
        return;
    }

    println!("\n═══════════════ INTENT HISTORY ═══════════════");
    for executed in &history[history.len().saturating_sub(count)..] {
        let action = match executed.intent.kind {
            IntentKind::Move(direction) => format!("move {direction:?}"),
            IntentKind::PlaceBomb => "bomb".to_string(),
        };
        println!(
            "  frame {:>6} [{:>8}] {} {}",
            executed.frame,
            executed.at.to_string(),
            executed.intent.player,
            action
        );
    }
    println!("══════════════════════════════════════════════\n");
}

fn show_pending(sim: &ArenaSimulation) {
    let pending = sim.pending_effects();
    if pending.is_empty() {
        println!("Nothing scheduled.");
        return;
    }

    println!("\n═══════════════ SCHEDULED EFFECTS ═══════════════");
    for event in pending {
        let eta = event.due - sim.now();
        println!(
            "  #{:<5} due {:>8} (in {:>6})  {:?}",
            event.seq, event.due, eta, event.effect
        );
    }
    println!("═════════════════════════════════════════════════\n");
}

fn show_help() {
    println!("\n═══════════════ AVAILABLE COMMANDS ═══════════════");
    println!("  move <p> <dir>, m    - Queue a move (p1/p2, up/down/left/right)");
    println!("  bomb <p>, b          - Queue a bomb placement");
    println!("  step [n], s [n]      - Advance n ticks (default 1)");
    println!("  wait <ms>, w         - Advance the clock by ms");
    println!("  show, g              - Print the board");
    println!("  status, st           - Show round and player state");
    println!("  bombs                - List live bombs");
    println!("  blasts, bl           - List live explosions");
    println!("  pending, pe          - List scheduled effects");
    println!("  history [n], hi      - Show the last n applied intents");
    println!("  spawn <x> <y>        - Drop a random powerup on an empty cell");
    println!("  reset, r             - Start a new round on fresh terrain");
    println!("  help, ?              - Show this help");
    println!("  quit, q              - Exit");
    println!();
    println!("  Board: # wall  % grass  , breaking  o bomb  * blast");
    println!("         s speed  r range  b bomb  w owl  t turtle");
    println!("         1/2 players  x dead player");
    println!("══════════════════════════════════════════════════\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["demo-interactive", "--config", "arena.json", "-s", "7"])
            .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("arena.json")));
        assert_eq!(args.seed, Some(7));

        let args = Args::try_parse_from(["demo-interactive"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_load_config_applies_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.json");
        ArenaConfig::default()
            .with_grid_size(9)
            .with_seed(1)
            .save(&path)
            .unwrap();

        let config = load_config(&path, None).unwrap();
        assert_eq!(config.grid_size, 9);
        assert_eq!(config.seed, Some(1));

        let config = load_config(&path, Some(42)).unwrap();
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("missing.json"), Some(3));
        assert!(matches!(result, Err(ConfigError::LoadFailed(_))));
    }
}
