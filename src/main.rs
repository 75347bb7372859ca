//! Headless simulator (default binary).
//!
//! Plays a seeded session with the greedy bot and prints a summary. Useful for
//! tuning: point `--config` at a JSON file to try different heat or queue
//! settings against the same seed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use gravity_match::engine::{bot, GameEngine, LogObserver};
use gravity_match::{logging, settings};

/// Simulation clock advanced between turns
const TURN_INTERVAL_MS: u64 = 250;

/// Run a bot-played session of the gravity-match engine
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session seed (overrides GRAVITY_MATCH_SEED and the config file)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Number of turns to play
    #[arg(short, long, default_value_t = 100)]
    turns: u32,

    /// JSON engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u32,
    turns: u32,
    score: u64,
    best_turn: u64,
    matched_turns: u32,
    deepest_cascade: u32,
    power_orbs: u32,
    guaranteed_moves: usize,
    final_heat: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = settings::resolve(args.config.as_deref(), args.seed)?;
    let seed = config.seed;
    let mut engine = GameEngine::new(config).context("starting engine")?;
    if args.verbose {
        engine.add_observer(Box::new(LogObserver));
    }
    info!("playing {} turns with seed {}", args.turns, seed);

    let mut summary = Summary {
        seed,
        turns: args.turns,
        ..Summary::default()
    };
    for n in 0..args.turns {
        let mut swap = bot::pick_swap(engine.grid());
        // Alternate swipe direction so gravity does not always pull one way.
        if n % 2 == 1 {
            swap = swap.reversed();
        }
        engine.tick(TURN_INTERVAL_MS);
        let outcome = engine
            .submit_swap(swap.a, swap.b)
            .with_context(|| format!("turn {}", n + 1))?;

        summary.best_turn = summary.best_turn.max(outcome.score.final_score);
        if !outcome.chain.is_empty() {
            summary.matched_turns += 1;
            summary.deepest_cascade = summary.deepest_cascade.max(outcome.chain.depth());
        }
        if outcome.result.power_orb_collected {
            summary.power_orbs += 1;
        }
        summary.guaranteed_moves += outcome.injected.len();
    }
    summary.score = engine.score();
    summary.final_heat = engine.heat();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("seed            {}", summary.seed);
        println!("turns           {}", summary.turns);
        println!("score           {}", summary.score);
        println!("best turn       {}", summary.best_turn);
        println!("matched turns   {}", summary.matched_turns);
        println!("deepest cascade {}", summary.deepest_cascade);
        println!("power orbs      {}", summary.power_orbs);
        println!("guaranteed      {}", summary.guaranteed_moves);
        println!("final heat      {:.1}", summary.final_heat);
        for row in engine.grid().to_ascii() {
            println!("  {}", row);
        }
    }
    Ok(())
}
