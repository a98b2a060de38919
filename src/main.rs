//! Headless runner
//!
//! Plays one session with the autopilot at a fixed frame step and prints the
//! final board. Usage: `bomber-quest [seed] [max_frames] [settings.json]`

use bomber_quest::Settings;
use bomber_quest::consts::FRAME_DT_MS;
use bomber_quest::sim::{GameEvent, GameState, Snapshot, TickInput, tick};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bomber Quest (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(clock_seed);
    let max_frames = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60 * 60 * 5);
    let settings_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read settings from {}: {}", path, e);
            None
        }
    });
    let settings = Settings::load_or_default(settings_json.as_deref());

    let mut state = GameState::with_settings(seed, settings);
    log::info!("Game initialized with seed: {}", seed);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut frames = 0;
    while !state.phase.is_over() && frames < max_frames {
        tick(&mut state, &input, FRAME_DT_MS);
        frames += 1;
        for event in state.drain_events() {
            match event {
                GameEvent::WallDestroyed { .. } | GameEvent::BombPlaced { .. } => {}
                other => log::info!("[{:>7.0} ms] {:?}", state.time_ms, other),
            }
        }
    }

    println!("{}", Snapshot::capture(&state));
    println!(
        "seed {} - {:?} after {} frames ({:.1} s)",
        seed,
        state.phase,
        frames,
        state.time_ms / 1000.0
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on the web; the host page drives `tick`
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
