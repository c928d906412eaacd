//! Core board logic - deterministic and testable
//!
//! This crate owns the grid and everything that mutates it. It has no
//! dependencies on rendering, input or I/O; collaborators (score, goals, sound,
//! effects) are injected as trait objects.
//!
//! # Module Structure
//!
//! - [`grid`]: cell store with blank mask, obstacle overlays and a tile arena
//! - [`fill`]: constrained random fill that avoids placing runs
//! - [`swap`]: swap-test-revert primitive
//! - [`matching`]: run detection, match scanning, detonations and shape classification
//! - [`cascade`]: destruction and gravity compaction steps
//! - [`deadlock`]: deadlock detection and reshuffling
//! - [`board`]: mode gating and the cascade phase machine
//! - [`collab`]: collaborator traits and no-op defaults
//! - [`level`] / [`config`]: level documents and tuning
//! - [`snapshot`]: serializable board views
//! - [`rng`]: deterministic LCG
//!
//! # Rules
//!
//! - A run is three or more same-colored tiles in a row or column
//! - A swap is kept only if it creates a run; otherwise it is reverted
//! - Groups of four or more may upgrade one of the swapped tiles into a special piece
//! - Each destroy wave scores `base_piece_value * streak` per tile
//! - After every cascade the board is reshuffled if no legal swap remains
//!
//! # Example
//!
//! ```
//! use match3_core::{Board, BoardConfig, Grid};
//! use match3_core::types::{BoardMode, Direction, TileColor};
//!
//! let grid = Grid::from_rows(&["AABA", "BCCB", "CDDC"]).unwrap();
//! let palette = "ABCD".chars().filter_map(TileColor::from_char).collect();
//! let mut board = Board::from_grid(grid, palette, BoardConfig::default());
//! board.start();
//!
//! assert!(board.try_swap(2, 0, Direction::Right));
//! board.settle();
//! assert_eq!(board.mode(), BoardMode::Move);
//! assert!(!board.has_any_match());
//! ```
//!
//! # Timing
//!
//! Phases are separated by `settle_delay_ms` (500ms by default). Call
//! [`Board::tick`](board::Board::tick) every frame with the elapsed time.

pub mod board;
pub mod cascade;
pub mod collab;
pub mod config;
pub mod deadlock;
pub mod fill;
pub mod grid;
pub mod level;
pub mod matching;
pub mod rng;
pub mod snapshot;
pub mod swap;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, CascadeSummary};
pub use collab::{
    Collaborators, EffectSpawner, GoalTag, GoalTracker, NoopCollaborator, ScoreTracker, SoundCue,
};
pub use config::BoardConfig;
pub use deadlock::ReshuffleError;
pub use grid::{Grid, Obstacle, Tile, TileId};
pub use level::{LayoutEntry, LevelConfig, LevelError};
pub use matching::{MatchDescriptor, MatchFinder};
pub use rng::SimpleRng;
pub use snapshot::BoardSnapshot;
pub use swap::SwapRecord;
