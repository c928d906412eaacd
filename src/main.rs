//! Headless autoplay runner (default binary).
//!
//! Loads a level, lets the autoplayer make swaps until the move budget is spent
//! (or `MATCH3_AUTOPLAY_MOVES` is reached) and prints the board after each settled
//! cascade.
//!
//! Environment:
//! - `MATCH3_LEVEL`: level JSON path (the first CLI argument takes precedence)
//! - `MATCH3_AUTOPLAY_MOVES`: maximum number of swaps (default 20)
//! - `MATCH3_LOG_PATH`: append one JSON snapshot per line to this file
//! - `RUST_LOG`: tracing filter (default `warn`)
//! - `MATCH3_SEED` and friends: see `BoardConfig::from_env`

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use match3_board::core::{Board, BoardConfig, BoardSnapshot, LevelConfig};
use match3_board::engine::{Autoplayer, MoveError};

const DEFAULT_LEVEL: &str = include_str!("../levels/default.json");
const DEFAULT_AUTOPLAY_MOVES: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunConfig {
    level_path: Option<String>,
    max_moves: u32,
    log_path: Option<String>,
}

impl RunConfig {
    fn from_env(args: &[String]) -> Self {
        let level_path = args
            .first()
            .cloned()
            .or_else(|| env::var("MATCH3_LEVEL").ok())
            .filter(|s| !s.trim().is_empty());
        let max_moves = env::var("MATCH3_AUTOPLAY_MOVES")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_AUTOPLAY_MOVES);
        let log_path = env::var("MATCH3_LOG_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty());
        Self {
            level_path,
            max_moves,
            log_path,
        }
    }
}

/// JSONL snapshot log
struct SnapshotLog {
    out: BufWriter<File>,
}

impl SnapshotLog {
    fn open(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening snapshot log {}", path))?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    fn record(&mut self, snap: &BoardSnapshot) -> Result<()> {
        serde_json::to_writer(&mut self.out, snap).context("encoding snapshot")?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

fn load_level(path: Option<&str>) -> Result<LevelConfig> {
    let json = match path {
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading level {}", p))?,
        None => DEFAULT_LEVEL.to_string(),
    };
    LevelConfig::from_json(&json).context("loading level")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let run = RunConfig::from_env(&args);
    let config = BoardConfig::from_env();
    let level = load_level(run.level_path.as_deref())?;

    let mut board = Board::new(&level, config.clone()).context("building board")?;
    board.start();
    let mut player = Autoplayer::new(config.seed);
    let mut log = run.log_path.as_deref().map(SnapshotLog::open).transpose()?;

    let snap = board.snapshot();
    println!("{}", snap.render_text());
    if let Some(log) = log.as_mut() {
        log.record(&snap)?;
    }

    for turn in 1..=run.max_moves {
        let summary = match player.play_turn(&mut board) {
            Ok(summary) => summary,
            Err(MoveError::NotPlayable) => break,
            Err(err) => {
                warn!(code = err.code(), "autoplay stopped: {}", err);
                break;
            }
        };
        info!(
            turn,
            waves = summary.waves,
            destroyed = summary.tiles_destroyed,
            points = summary.points,
            "turn settled"
        );

        let snap = board.snapshot();
        println!(
            "turn {:>2}  +{:<5} score {:<6} moves left {}",
            turn,
            summary.points,
            board.score(),
            board
                .moves_remaining()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        println!("{}", snap.render_text());
        if let Some(log) = log.as_mut() {
            log.record(&snap)?;
        }

        if !level.score_goals.is_empty() && board.goals_reached() == level.score_goals.len() {
            board.declare_win();
            break;
        }
    }
    println!(
        "final score {} ({} of {} goals), mode {}",
        board.score(),
        board.goals_reached(),
        level.score_goals.len(),
        board.mode().as_str()
    );
    if let Some(log) = log.as_mut() {
        log.out.flush().context("flushing snapshot log")?;
    }
    Ok(())
}
