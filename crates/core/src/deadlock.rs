//! Deadlock detection and reshuffling
//!
//! A board is deadlocked when no single adjacent swap produces a run. The search
//! only tries rightward and upward swaps: the leftward/downward swap of a cell is
//! the rightward/upward swap of its neighbour.

use std::collections::BTreeSet;

use tracing::{debug, instrument, warn};

use crate::fill::matches_at;
use crate::grid::{Grid, TileId};
use crate::matching::has_any_match;
use crate::rng::SimpleRng;
use crate::types::{Coord, Direction};

/// Reshuffle attempts between progress warnings when running unbounded
const RESHUFFLE_WARN_INTERVAL: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReshuffleError {
    /// Fewer than two distinct colors on the board; no arrangement can be playable
    Degenerate,
    /// The configured reshuffle bound ran out
    Exhausted { attempts: u32 },
}

impl ReshuffleError {
    pub fn code(self) -> &'static str {
        match self {
            ReshuffleError::Degenerate => "degenerate_board",
            ReshuffleError::Exhausted { .. } => "reshuffle_exhausted",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ReshuffleError::Degenerate => "board has fewer than two distinct colors",
            ReshuffleError::Exhausted { .. } => "no playable arrangement within reshuffle limit",
        }
    }
}

impl std::fmt::Display for ReshuffleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReshuffleError::Exhausted { attempts } => {
                write!(f, "{} ({} attempts)", self.message(), attempts)
            }
            ReshuffleError::Degenerate => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for ReshuffleError {}

/// True when no adjacent swap on the board creates a run
///
/// Locks are not consulted.
pub fn is_deadlocked(grid: &mut Grid) -> bool {
    let (w, h) = (grid.width() as i8, grid.height() as i8);
    let starts: Vec<Coord> = grid.resident_tiles().map(|t| t.pos()).collect();
    for at in starts {
        if at.col < w - 1 && grid.swap_creates_match(at, Direction::Right) {
            return false;
        }
        if at.row < h - 1 && grid.swap_creates_match(at, Direction::Up) {
            return false;
        }
    }
    true
}

/// Does the board hold at least two distinct tile colors?
pub fn has_color_variety(grid: &Grid) -> bool {
    let colors: BTreeSet<_> = grid.resident_tiles().map(|t| t.color()).collect();
    colors.len() >= 2
}

/// Redistribute every resident tile once, avoiding runs where the draws allow
pub fn reshuffle_once(grid: &mut Grid, rng: &mut SimpleRng, max_attempts: u32) {
    let cells: Vec<Coord> = grid.coords().filter(|&at| grid.is_fillable(at)).collect();
    let mut pool: Vec<TileId> = cells.iter().filter_map(|&at| grid.detach(at)).collect();

    for at in cells {
        if pool.is_empty() {
            break;
        }
        let mut pick = rng.index(pool.len());
        let mut attempts = 0;
        while attempts < max_attempts && pool_color_matches(grid, &pool, pick, at) {
            pick = rng.index(pool.len());
            attempts += 1;
        }
        let id = pool.swap_remove(pick);
        grid.place(id, at);
    }
}

fn pool_color_matches(grid: &Grid, pool: &[TileId], pick: usize, at: Coord) -> bool {
    pool.get(pick)
        .and_then(|&id| grid.tile(id))
        .map(|t| matches_at(grid, at, t.color()))
        .unwrap_or(false)
}

/// Reshuffle until the board has no run and at least one legal swap
///
/// Returns the number of reshuffles performed (0 when the board was already
/// playable). `limit` bounds the retries; `None` retries until playable.
#[instrument(level = "debug", skip_all, fields(limit = ?limit))]
pub fn reshuffle_until_playable(
    grid: &mut Grid,
    rng: &mut SimpleRng,
    max_attempts: u32,
    limit: Option<u32>,
) -> Result<u32, ReshuffleError> {
    if !has_any_match(grid) && !is_deadlocked(grid) {
        return Ok(0);
    }
    if !has_color_variety(grid) {
        warn!("reshuffle refused: fewer than two colors on the board");
        return Err(ReshuffleError::Degenerate);
    }

    let mut attempts = 0u32;
    loop {
        if let Some(limit) = limit {
            if attempts >= limit {
                warn!(attempts, "reshuffle limit reached");
                return Err(ReshuffleError::Exhausted { attempts });
            }
        }
        reshuffle_once(grid, rng, max_attempts);
        attempts += 1;

        if !has_any_match(grid) && !is_deadlocked(grid) {
            debug!(attempts, "board reshuffled");
            return Ok(attempts);
        }
        if attempts % RESHUFFLE_WARN_INTERVAL == 0 {
            warn!(attempts, "still reshuffling");
        }
    }
}
