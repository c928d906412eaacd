//! Level configuration - the minimal level data consumed at board setup
//!
//! Levels are plain JSON documents:
//!
//! ```json
//! {
//!   "width": 6,
//!   "height": 6,
//!   "palette": ["A", "B", "C", "D"],
//!   "layout": [
//!     { "x": 0, "y": 0, "kind": "blank" },
//!     { "x": 2, "y": 3, "kind": "ice", "hit_points": 2 }
//!   ],
//!   "score_goals": [500, 1000, 1500],
//!   "move_limit": 20
//! }
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{
    LayoutKind, TileColor, DEFAULT_OBSTACLE_HIT_POINTS, MAX_BOARD_DIM, RUN_LENGTH,
};

/// One entry of a level layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub x: i32,
    pub y: i32,
    pub kind: LayoutKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_points: Option<i32>,
}

impl LayoutEntry {
    pub fn new(x: i32, y: i32, kind: LayoutKind) -> Self {
        Self {
            x,
            y,
            kind,
            hit_points: None,
        }
    }

    pub fn with_hit_points(mut self, hit_points: i32) -> Self {
        self.hit_points = Some(hit_points);
        self
    }

    /// Hit points for the obstacle this entry creates
    pub fn obstacle_hit_points(&self) -> i32 {
        self.hit_points.unwrap_or(DEFAULT_OBSTACLE_HIT_POINTS)
    }
}

/// Level data read once at setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub width: u8,
    pub height: u8,
    pub palette: Vec<TileColor>,
    #[serde(default)]
    pub layout: Vec<LayoutEntry>,
    #[serde(default)]
    pub score_goals: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    Parse(String),
    BadDimensions { width: u8, height: u8 },
    /// Neither side reaches a run length, so no swap can ever match
    NoRoomForRuns { width: u8, height: u8 },
    PaletteTooSmall,
    BadHitPoints { x: i32, y: i32, hit_points: i32 },
    RaggedRows,
    UnknownCell(char),
}

impl LevelError {
    pub fn code(&self) -> &'static str {
        match self {
            LevelError::Parse(_) => "parse_error",
            LevelError::BadDimensions { .. }
            | LevelError::NoRoomForRuns { .. }
            | LevelError::PaletteTooSmall
            | LevelError::BadHitPoints { .. } => "invalid_level",
            LevelError::RaggedRows | LevelError::UnknownCell(_) => "invalid_fixture",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LevelError::Parse(_) => "level document could not be parsed",
            LevelError::BadDimensions { .. } => "board dimensions out of range",
            LevelError::NoRoomForRuns { .. } => "board is too small to hold a run",
            LevelError::PaletteTooSmall => "palette must contain at least two distinct colors",
            LevelError::BadHitPoints { .. } => "obstacle hit points must be at least 1",
            LevelError::RaggedRows => "fixture rows have different lengths",
            LevelError::UnknownCell(_) => "fixture contains an unknown cell character",
        }
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Parse(detail) => write!(f, "{}: {}", self.message(), detail),
            LevelError::BadDimensions { width, height }
            | LevelError::NoRoomForRuns { width, height } => {
                write!(f, "{}: {}x{}", self.message(), width, height)
            }
            LevelError::BadHitPoints { x, y, hit_points } => {
                write!(f, "{}: {} at ({}, {})", self.message(), hit_points, x, y)
            }
            LevelError::UnknownCell(c) => write!(f, "{}: {:?}", self.message(), c),
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for LevelError {}

impl LevelConfig {
    /// Parse and validate a level document
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelConfig =
            serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_BOARD_DIM
            || self.height > MAX_BOARD_DIM
        {
            return Err(LevelError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let run = RUN_LENGTH as u8;
        if self.width < run && self.height < run {
            return Err(LevelError::NoRoomForRuns {
                width: self.width,
                height: self.height,
            });
        }
        let distinct: BTreeSet<TileColor> = self.palette.iter().copied().collect();
        if distinct.len() < 2 {
            return Err(LevelError::PaletteTooSmall);
        }
        if let Some(bad) = self
            .entries_in_bounds()
            .find(|e| e.kind.obstacle().is_some() && e.obstacle_hit_points() < 1)
        {
            return Err(LevelError::BadHitPoints {
                x: bad.x,
                y: bad.y,
                hit_points: bad.obstacle_hit_points(),
            });
        }
        Ok(())
    }

    /// Layout entries that land inside the board
    pub fn entries_in_bounds(&self) -> impl Iterator<Item = &LayoutEntry> + '_ {
        let (w, h) = (self.width as i32, self.height as i32);
        self.layout
            .iter()
            .filter(move |e| e.x >= 0 && e.y >= 0 && e.x < w && e.y < h)
    }
}
