//! Poke Arena entry point
//!
//! Headless match runner: loads settings (first argument, optional), draws a
//! roster, plays the configured rounds and prints the final frame as JSON.

use std::process::ExitCode;

use poke_arena::Settings;
use poke_arena::sim::{MoveRegistry, RoundOutcome, World, run_round};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Poke Arena starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };

    let moves = MoveRegistry::builtin();
    settings.validate(&moves)?;

    let mut world = World::new(&settings);
    world.spawn_roster(&settings)?;

    for round in 1..=settings.rounds {
        log::info!("Round {round} begins");
        match run_round(&mut world, &moves, settings.max_ticks_per_round)? {
            RoundOutcome::Winner { id, name } => {
                log::info!("Round {round}: {name} {id} wins at tick {}", world.time_ticks)
            }
            RoundOutcome::Draw => log::info!("Round {round}: draw"),
            RoundOutcome::Timeout { alive } => {
                log::info!("Round {round}: time out with {alive} still standing")
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
    Ok(())
}
