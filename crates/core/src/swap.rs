//! Swap module - exchange two adjacent tiles and keep the exchange only on a match

use crate::grid::{Grid, TileId};
use crate::matching::has_any_match;
use crate::types::{Coord, Direction};

/// The tiles involved in an accepted swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRecord {
    /// Tile the player dragged
    pub moved: TileId,
    /// Tile it traded places with (`other_dot`)
    pub partner: TileId,
    pub direction: Direction,
}

impl Grid {
    /// Swap `at` with its neighbour in `direction`, test for a match, and always revert
    pub fn swap_creates_match(&mut self, at: Coord, direction: Direction) -> bool {
        let target = at.step(direction);
        if !self.swap(at, target) {
            return false;
        }
        let matched = has_any_match(self);
        self.swap(at, target);
        matched
    }
}

/// Apply a swap if it produces a match, otherwise leave the grid untouched
///
/// Returns the swap record when the exchange was kept. Both cells must hold tiles;
/// an out-of-bounds, blank or empty target is rejected without touching the grid.
pub fn try_swap(grid: &mut Grid, at: Coord, direction: Direction) -> Option<SwapRecord> {
    let target = at.step(direction);
    let (Some(moved), Some(partner)) = (grid.tile_id_at(at), grid.tile_id_at(target)) else {
        return None;
    };
    if !grid.swap(at, target) {
        return None;
    }
    if has_any_match(grid) {
        Some(SwapRecord {
            moved,
            partner,
            direction,
        })
    } else {
        grid.swap(at, target);
        None
    }
}
