//! Suika Drop headless runner
//!
//! Plays a scripted, seeded session without a window: the cursor sweeps
//! across the container and drops a ball whenever the cooldown allows.
//!
//! Usage: `suika-drop [config.json]`, seed from `SUIKA_SEED` (default 1).

use std::process::ExitCode;

use suika_drop::GameConfig;
use suika_drop::sim::{GameEvent, GameState, TickInput, tick};

/// Ten minutes at the default tick rate
const MAX_TICKS: u64 = 60 * 60 * 10;
/// Ticks the cursor travels in one direction before turning around
const SWEEP_TICKS: u64 = 70;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Suika Drop (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let seed = match std::env::var("SUIKA_SEED") {
        Ok(s) => match s.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                log::warn!("Invalid SUIKA_SEED '{}', using 1", s);
                1
            }
        },
        Err(_) => 1,
    };

    let mut state = match GameState::with_config(config, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut merges = 0u32;
    let mut drops = 0u32;
    let mut snapshot = state.snapshot();

    for t in 0..MAX_TICKS {
        let direction = if (t / SWEEP_TICKS) % 2 == 0 { 1 } else { -1 };
        let input = TickInput {
            move_delta: direction,
            spawn: true,
        };
        snapshot = tick(&mut state, &input);

        for event in &state.events {
            match event {
                GameEvent::Spawned { .. } => drops += 1,
                GameEvent::Merged(m) => {
                    merges += 1;
                    log::debug!("tick {}: merged into {:?} (+{})", t, m.tier, m.points);
                }
                GameEvent::GameOver { .. } => {}
            }
        }

        if snapshot.is_game_over {
            break;
        }
    }

    let largest = snapshot.balls.iter().map(|b| b.tier).max();
    println!("Seed:       {}", seed);
    println!("Ticks:      {}", snapshot.tick);
    println!("Drops:      {}", drops);
    println!("Merges:     {}", merges);
    println!("Balls left: {}", snapshot.balls.len());
    println!("Largest:    {:?}", largest);
    println!("Score:      {}", snapshot.score);
    println!("Game over:  {}", snapshot.is_game_over);

    ExitCode::SUCCESS
}
