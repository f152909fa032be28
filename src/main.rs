//! Startup Scramble headless runner
//!
//! Drives a full match at a nominal 60 Hz with a simple autopilot in each
//! player slot and prints the end-of-match report as JSON.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use startup_scramble::consts::*;
use startup_scramble::platform::{Control, Controls};
use startup_scramble::sim::{FallingItem, ItemKind, Match, Player, PlayerSlot};
use startup_scramble::{
    Background, FileStore, HighScore, MatchConfig, MatchReport, RecordResult, TickInput,
};

/// Startup Scramble - arcade money-grab simulation
#[derive(Parser, Debug)]
#[command(name = "startup-scramble")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Match config JSON (defaults are used when absent or unreadable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Match length in seconds (overrides the config file)
    #[arg(short, long)]
    duration: Option<u32>,

    /// Single-player mode
    #[arg(long)]
    single: bool,

    /// Background name (hackathon, city, office, stage)
    #[arg(short, long)]
    background: Option<String>,

    /// High-score file, consulted in single-player mode
    #[arg(long, default_value = "startup-scramble-highscore.json")]
    high_score_file: PathBuf,
}

#[derive(Serialize)]
struct Output {
    report: MatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<RecordResult>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path),
        None => MatchConfig::default(),
    };
    if let Some(duration) = args.duration {
        config.duration_seconds = duration;
    }
    if args.single {
        config.mode = startup_scramble::GameMode::Single;
    }
    if let Some(name) = args.background {
        config.background = Background::from(name);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut game = startup_scramble::start(config);
    let report = run(&mut game);

    let record = HighScore::submit(&mut FileStore::new(&args.high_score_file), &report);
    match serde_json::to_string_pretty(&Output { report, record }) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize report: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Fixed-step loop: each host frame advances by whole milliseconds so the
/// 60 Hz cadence averages out exactly.
fn run(game: &mut Match) -> MatchReport {
    let mut frame: u64 = 0;
    let mut sent_ms: u64 = 0;

    while !game.is_over() {
        frame += 1;
        let target_ms = (frame as f64 * TICK_MS) as u64;
        let elapsed = (target_ms - sent_ms) as u32;
        sent_ms = target_ms;

        let pilot = Autopilot::observe(game);
        game.tick(&TickInput::poll(&pilot), elapsed);

        for event in game.drain_events() {
            log::trace!("{event:?}");
        }
    }
    game.on_match_end()
}

#[derive(Debug, Default, Clone, Copy)]
struct Intent {
    left: bool,
    right: bool,
    jump: bool,
}

/// Chases the nearest green bill or pickup and sidesteps hazards overhead
#[derive(Debug, Default)]
struct Autopilot {
    intents: [Intent; 2],
}

impl Autopilot {
    fn observe(game: &Match) -> Self {
        let mut pilot = Self::default();
        for player in game.players() {
            pilot.intents[player.slot.index()] = Self::decide(player, game.items());
        }
        pilot
    }

    fn decide(player: &Player, items: &[FallingItem]) -> Intent {
        let wanted = |item: &&FallingItem| match item.kind {
            ItemKind::Bill => item.base_value > 0,
            ItemKind::Obstacle | ItemKind::Freeze => false,
            _ => true,
        };
        let hazard = items.iter().any(|item| {
            (item.base_value < 0 || item.kind == ItemKind::Freeze)
                && (item.pos.x - player.pos.x).abs() < 30.0
                && item.pos.y < player.pos.y
                && player.pos.y - item.pos.y < 120.0
        });

        let target = items
            .iter()
            .filter(wanted)
            .filter(|item| item.pos.y < player.pos.y + PLAYER_HEIGHT)
            .min_by(|a, b| {
                let da = a.pos.distance_squared(player.pos);
                let db = b.pos.distance_squared(player.pos);
                da.total_cmp(&db)
            });

        let Some(target) = target else {
            return Intent::default();
        };
        let dx = target.pos.x - player.pos.x;
        let (mut left, mut right) = (dx < -4.0, dx > 4.0);
        if hazard {
            // Step away from whatever is about to land on us
            let away_left = player.pos.x > WORLD_WIDTH / 2.0;
            left = away_left;
            right = !away_left;
        }
        let jump = player.on_ground
            && dx.abs() < 40.0
            && target.pos.y < player.pos.y - 60.0
            && player.pos.y - target.pos.y < 160.0;
        Intent { left, right, jump }
    }
}

impl Controls for Autopilot {
    fn is_pressed(&self, slot: PlayerSlot, control: Control) -> bool {
        let intent = self.intents[slot.index()];
        match control {
            Control::Left => intent.left,
            Control::Right => intent.right,
            _ => false,
        }
    }

    fn just_pressed(&self, slot: PlayerSlot, control: Control) -> bool {
        control == Control::Jump && self.intents[slot.index()].jump
    }
}
