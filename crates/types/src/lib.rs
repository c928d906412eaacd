//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the board engine.
//! All types are plain data with no behaviour beyond small conversions, which makes
//! them usable in any context (board logic, move search, snapshots, level files).
//!
//! # Coordinates
//!
//! Cells are addressed as `(col, row)`, 0-indexed:
//!
//! - **col**: `0..width`, left to right
//! - **row**: `0..height`, bottom to top (gravity pulls toward row 0)
//!
//! # Timing and Tuning Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_SETTLE_DELAY_MS` | 500 | Pause between cascade phases |
//! | `BASE_PIECE_VALUE` | 20 | Points per destroyed tile (times the streak) |
//! | `MAX_FILL_ATTEMPTS` | 100 | Constrained-random samples before giving up |
//! | `MAX_BOARD_DIM` | 64 | Largest accepted width/height |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Coord, Direction, TileColor};
//!
//! let at = Coord::new(2, 3);
//! assert_eq!(at.step(Direction::Up), Coord::new(2, 4));
//!
//! let red = TileColor::from_char('R').unwrap();
//! assert_eq!(red.as_char(), 'R');
//! ```

use serde::{Deserialize, Serialize};

/// Pause between cascade phases
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 500;

/// Points awarded per destroyed tile before the streak multiplier
pub const BASE_PIECE_VALUE: u32 = 20;

/// Maximum number of samples when looking for a color that does not complete a run
pub const MAX_FILL_ATTEMPTS: u32 = 100;

/// Minimum run length that counts as a match
pub const RUN_LENGTH: usize = 3;

/// Largest accepted board width or height
pub const MAX_BOARD_DIM: u8 = 64;

/// Default obstacle hit points when a layout entry does not specify any
pub const DEFAULT_OBSTACLE_HIT_POINTS: i32 = 1;

/// A tile color tag.
///
/// Colors are identified by an upper-case ASCII letter (`'A'..='Z'`), which keeps
/// level files and test fixtures readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct TileColor(u8);

impl TileColor {
    /// Build a color from its letter (case-insensitive)
    ///
    /// ```
    /// use match3_types::TileColor;
    ///
    /// assert!(TileColor::from_char('a').is_some());
    /// assert!(TileColor::from_char('#').is_none());
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(Self(upper as u8 - b'A'))
        } else {
            None
        }
    }

    /// Build a color from its palette index (0 = 'A')
    pub fn from_index(index: u8) -> Option<Self> {
        if index < 26 {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        (b'A' + self.0) as char
    }
}

impl TryFrom<char> for TileColor {
    type Error = String;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::from_char(value).ok_or_else(|| format!("invalid tile color: {:?}", value))
    }
}

impl From<TileColor> for char {
    fn from(value: TileColor) -> Self {
        value.as_char()
    }
}

/// Cell coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub col: i8,
    pub row: i8,
}

impl Coord {
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    /// Neighbouring coordinate in the given direction (may be out of bounds)
    ///
    /// Wraps at the `i8` edges; boards never exceed `MAX_BOARD_DIM`, so a wrapped
    /// coordinate is always out of bounds.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.col.wrapping_add(dx), self.row.wrapping_add(dy))
    }

    /// The four orthogonal neighbours, in Left, Right, Down, Up order
    pub fn orthogonal(self) -> [Coord; 4] {
        [
            self.step(Direction::Left),
            self.step(Direction::Right),
            self.step(Direction::Down),
            self.step(Direction::Up),
        ]
    }
}

/// Swap directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// All four directions
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// `(dx, dy)` offset, with `+dy` pointing up
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Axis the swap moves along
    pub fn axis(self) -> Axis {
        match self {
            Direction::Right | Direction::Left => Axis::Row,
            Direction::Up | Direction::Down => Axis::Column,
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// ```
    /// use match3_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("R"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "right" | "r" => Some(Direction::Right),
            "left" | "l" => Some(Direction::Left),
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// A board line orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

/// Obstacle overlays layered on a cell
///
/// - **Breakable**: sits under a tile, damaged when that tile is destroyed
/// - **Lock**: sits under a tile and pins it in place until broken
/// - **Ice**: occupies the cell itself; no tile can live there until it is cleared
///   by destruction in an orthogonally adjacent cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Breakable,
    Lock,
    Ice,
}

/// Layout entry kinds in a level file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Blank,
    Breakable,
    Lock,
    Ice,
    Normal,
}

impl LayoutKind {
    /// Obstacle this layout kind creates, if any
    pub fn obstacle(self) -> Option<ObstacleKind> {
        match self {
            LayoutKind::Breakable => Some(ObstacleKind::Breakable),
            LayoutKind::Lock => Some(ObstacleKind::Lock),
            LayoutKind::Ice => Some(ObstacleKind::Ice),
            LayoutKind::Blank | LayoutKind::Normal => None,
        }
    }
}

/// Top-level board mode gating player input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardMode {
    /// A swap/cascade sequence is in flight
    Wait,
    /// Waiting for the player's next swap
    Move,
    Win,
    Lose,
    Pause,
}

impl BoardMode {
    /// Whether a player swap may be accepted in this mode
    pub fn accepts_input(self) -> bool {
        self == BoardMode::Move
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardMode::Wait => "wait",
            BoardMode::Move => "move",
            BoardMode::Win => "win",
            BoardMode::Lose => "lose",
            BoardMode::Pause => "pause",
        }
    }
}

/// Cascade resolver phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadePhase {
    Idle,
    Resolving,
    Compacting,
    Refilling,
    Settling,
}

/// Special pieces a tile can be upgraded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    /// Clears its whole row or column when destroyed
    LineClear(Axis),
    /// Clears the 3x3 area around it when destroyed
    Wrapped,
    /// Clears every tile of its color when destroyed
    ColorBomb,
}

/// Effect derived from classifying a match group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEffect {
    None,
    /// Five in a line along the given axis
    LineClear(Axis),
    /// Two runs of three crossing in a T or L
    Wrapped,
    /// Four in a line; resolved by the bomb-combination check
    ColorBomb,
}
