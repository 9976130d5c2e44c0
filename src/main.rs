//! Mini Arcade headless driver
//!
//! Plays every tab with random input over virtual time and logs snapshots.
//! `MINI_ARCADE_TUNING` points at a tuning JSON file, `MINI_ARCADE_SEED` fixes
//! the RNG seed, and `RUST_LOG` controls verbosity.

use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};

use mini_arcade::{Arcade, GameTab, SimRng, Tuning};

/// Virtual time per driver step
const STEP: Duration = Duration::from_millis(100);
/// Longest run per tab, in driver steps
const MAX_STEPS: u32 = 600;

const ARROWS: [&str; 4] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];
const LATERAL: [&str; 2] = ["ArrowLeft", "ArrowRight"];

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Mini Arcade (headless) starting...");

    let tuning = match std::env::var("MINI_ARCADE_TUNING") {
        Ok(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => Tuning::default(),
    };

    let seed = seed_from_env();
    log::info!("Seed: {seed}");

    let mut arcade = match Arcade::new(tuning.clone(), seed) {
        Ok(arcade) => arcade,
        Err(e) => {
            log::error!("Unusable tuning: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut input_rng = SimRng::seed_from_u64(seed ^ 0x5eed);

    println!("\n{:<14} {:>8} {:>10} {:>6}", "game", "score", "game over", "best");
    for tab in GameTab::ALL {
        if let Err(e) = arcade.select(tab) {
            log::error!("Failed to mount {tab}: {e}");
            return ExitCode::FAILURE;
        }
        play(&mut arcade, &mut input_rng, tuning.mole.cell_count());

        match arcade.snapshot_json() {
            Ok(json) => log::info!("{tab} final snapshot: {json}"),
            Err(e) => log::warn!("{tab} snapshot failed to serialize: {e}"),
        }
        for (from, event) in arcade.drain_events() {
            log::debug!("{from}: {event:?}");
        }

        let best = arcade.highscores(tab).top_score().unwrap_or(0);
        println!(
            "{:<14} {:>8} {:>10} {:>6}",
            tab.label(),
            arcade.score(),
            arcade.is_game_over(),
            best
        );
    }

    ExitCode::SUCCESS
}

fn seed_from_env() -> u64 {
    if let Ok(raw) = std::env::var("MINI_ARCADE_SEED") {
        match raw.parse() {
            Ok(seed) => return seed,
            Err(_) => log::warn!("Ignoring non-numeric MINI_ARCADE_SEED={raw:?}"),
        }
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Feed random input into the mounted game until it ends or time runs out
fn play(arcade: &mut Arcade, rng: &mut SimRng, mole_cells: usize) {
    for _ in 0..MAX_STEPS {
        if arcade.is_game_over() {
            break;
        }
        match arcade.tab() {
            GameTab::Snake | GameTab::Merge => {
                arcade.key_down(ARROWS[rng.random_range(0..ARROWS.len())]);
            }
            GameTab::Cars | GameTab::PingPong => {
                if rng.random_bool(0.5) {
                    arcade.key_down(LATERAL[rng.random_range(0..LATERAL.len())]);
                }
            }
            GameTab::FlappyBird => {
                if rng.random_bool(0.25) {
                    arcade.click();
                }
            }
            GameTab::WhackAMole => {
                arcade.click_cell(rng.random_range(0..mole_cells));
            }
        }
        arcade.advance(STEP);
    }
}
