//! Gravity Well headless driver
//!
//! Runs a session without a renderer: a simple autopilot steers toward the
//! nearest asteroid and holds fire. Prints a JSON summary when the run ends,
//! optionally preceded by one snapshot per frame (JSON lines).

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use gravity_well::Tuning;
use gravity_well::highscores::{JsonFileStore, Method, ScoreService};
use gravity_well::sim::{FrameClock, FrameSnapshot, GameState, SessionStats, TickInput};

#[derive(Parser, Debug)]
#[command(name = "gravity-well", about = "Run a headless Gravity Well session")]
struct Args {
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Display frames to run
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// Display refresh rate the frame clock is fed with
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Tuning file (JSON); defaults are used when absent
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Print a snapshot per frame before the summary
    #[arg(long)]
    snapshots: bool,

    /// Leaderboard file to submit the final score to
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Initials used for the submission
    #[arg(long, default_value = "CPU")]
    initials: String,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    frames: u32,
    ticks: u64,
    score: u64,
    wave: u32,
    health: u8,
    game_over: bool,
    stats: SessionStats,
}

/// Steer toward the nearest asteroid and keep firing
fn autopilot(state: &GameState) -> TickInput {
    let ship = state.player.body.pos;
    let target = state
        .registry
        .asteroids()
        .map(|a| a.body.pos)
        .min_by(|a, b| a.distance_squared(ship).total_cmp(&b.distance_squared(ship)));

    match target {
        Some(pos) => TickInput {
            direction: (pos - ship).normalize_or_zero() * 0.6,
            fire: true,
        },
        None => TickInput {
            direction: Vec2::ZERO,
            fire: false,
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut clock = FrameClock::new(tuning.sim_dt);
    let mut state = GameState::with_tuning(args.seed, tuning);
    log::info!("Gravity Well starting with seed {}", args.seed);

    let frame_time = 1.0 / args.fps.max(1.0);
    let mut frames = 0;
    while frames < args.frames && !state.is_game_over() {
        let input = autopilot(&state);
        clock.advance(&mut state, &input, frame_time);
        frames += 1;

        if args.snapshots {
            println!("{}", serde_json::to_string(&FrameSnapshot::capture(&mut state))?);
        } else {
            state.events.clear();
        }
    }

    let summary = Summary {
        seed: args.seed,
        frames,
        ticks: state.time_ticks,
        score: state.score,
        wave: state.wave(),
        health: state.health,
        game_over: state.is_game_over(),
        stats: state.stats.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = args.scores {
        let mut service = ScoreService::new(JsonFileStore::open(path)?);
        let body = serde_json::json!({
            "initials": args.initials,
            "score": state.score,
            "wave": state.wave(),
            "deviceId": "headless",
        });
        let response = service.handle(Method::Post, Some("save"), &body.to_string(), Utc::now());
        if response.status == 200 {
            log::info!("Leaderboard: {}", response.body);
        } else {
            log::warn!("Score not submitted ({}): {}", response.status, response.body);
        }
    }

    Ok(())
}
