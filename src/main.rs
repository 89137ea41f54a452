//! Eightball entry point
//!
//! Runs a headless match between two autoplayers on a simulated display
//! clock and prints a JSON summary when the eight ball drops.
//!
//! Usage: `eightball [settings.json|-] [seed] [table.json]`

use std::process::ExitCode;

use eightball::Settings;
use eightball::audio::{AudioManager, LogBackend};
use eightball::autoplay::AutoPlayer;
use eightball::consts::SIM_DT;
use eightball::renderer::FrameData;
use eightball::sim::{
    FixedTimestep, GameEvent, GamePhase, GameState, InputQueue, PredictedPath, Table, tick,
    update_prediction,
};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 144.0;
/// Give up after this many frames (20 minutes of display time)
const MAX_FRAMES: u64 = 144 * 60 * 20;
const DEFAULT_SEED: u64 = 8;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) if path != "-" => Settings::load(path),
        _ => Settings::default(),
    };
    let seed = match args.next() {
        Some(arg) => match arg.parse() {
            Ok(seed) => seed,
            Err(e) => {
                log::warn!("Bad seed {:?}: {} - using {}", arg, e, DEFAULT_SEED);
                DEFAULT_SEED
            }
        },
        None => DEFAULT_SEED,
    };
    let table = args.next().map_or_else(Table::standard, |path| load_table(&path));
    log::info!("Eightball (native) starting, seed {}", seed);

    let mut state = GameState::with_table(seed, settings.clone(), table);
    let mut audio = AudioManager::new(LogBackend, &settings);
    let mut player = AutoPlayer::new(seed.wrapping_add(1));
    let mut queue = InputQueue::new();
    let mut clock = FixedTimestep::new(SIM_DT);
    let mut path = PredictedPath::default();
    let mut frame = FrameData::default();

    'frames: for _ in 0..MAX_FRAMES {
        if !clock.advance(FRAME_DT) {
            continue;
        }

        player.drive(&state, &mut queue);
        let inputs = queue.drain();
        tick(&mut state, &inputs, clock.step());

        if state.phase == GamePhase::Aiming {
            update_prediction(&state, &mut path);
        }
        frame = FrameData::build(&state, &path);

        for event in state.drain_events() {
            audio.handle(&event);
            match event {
                GameEvent::Sound(_) => {}
                GameEvent::GameOver(outcome) => {
                    log::info!(
                        "Game over after {} shots: {} beats {}",
                        state.shots,
                        outcome.winner,
                        outcome.loser()
                    );
                    break 'frames;
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    if state.outcome.is_none() {
        log::warn!("No winner after {} ticks", state.time_ticks);
    }
    log::debug!(
        "Last frame: {} balls, {} bytes of instance data",
        frame.globals.ball_count,
        frame.ball_bytes().len()
    );

    match serde_json::to_string_pretty(&state.summary()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize summary: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Table geometry from a JSON file, or the standard table if it cannot be used
fn load_table(path: &str) -> Table {
    let table = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| Table::from_json(&json).map_err(|e| e.to_string()));
    match table {
        Ok(table) if !table.is_empty() => table,
        Ok(_) => {
            log::warn!("{} has no rails or pockets - using the standard table", path);
            Table::standard()
        }
        Err(e) => {
            log::warn!("Could not load table from {}: {} - using the standard table", path, e);
            Table::standard()
        }
    }
}
