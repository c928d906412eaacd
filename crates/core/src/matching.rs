//! Matching module - run detection, match scanning and shape classification
//!
//! - [`has_any_match`]: cheap full-board test for any run of three
//! - [`MatchFinder`]: flags every tile in a run (plus special-piece detonations)
//!   and keeps the current match group in discovery order
//! - [`classify`]: turns a match group into a [`MatchDescriptor`]

use crate::grid::{Grid, TileId};
use crate::swap::SwapRecord;
use crate::types::{Axis, Coord, Direction, MatchEffect, Special, TileColor, RUN_LENGTH};

/// Smallest match group that is considered for special-piece creation
pub const SPECIAL_GROUP_MIN: usize = 4;

/// Does any cell start a horizontal or vertical run of three identical colors?
pub fn has_any_match(grid: &Grid) -> bool {
    grid.coords().any(|at| {
        let Some(color) = grid.color_at(at) else {
            return false;
        };
        let run_from = |dir: Direction| {
            let mut next = at;
            (1..RUN_LENGTH).all(|_| {
                next = next.step(dir);
                grid.color_at(next) == Some(color)
            })
        };
        run_from(Direction::Right) || run_from(Direction::Up)
    })
}

/// Length of the same-color run starting at `at` and extending in `dir`
fn run_length(grid: &Grid, at: Coord, color: TileColor, dir: Direction) -> usize {
    let mut len = 1;
    let mut next = at.step(dir);
    while grid.color_at(next) == Some(color) {
        len += 1;
        next = next.step(dir);
    }
    len
}

/// Result of classifying a match group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchDescriptor {
    pub effect: MatchEffect,
    pub color: Option<TileColor>,
}

impl MatchDescriptor {
    pub fn none() -> Self {
        Self {
            effect: MatchEffect::None,
            color: None,
        }
    }
}

/// Classify a match group's shape
///
/// Tiles are examined in group order and the first tile satisfying a rule decides
/// the result. Counts are taken over same-color group members sharing the tile's
/// column (`column_match`) or row (`row_match`), excluding the tile itself:
///
/// | Rule | Effect |
/// |------|--------|
/// | `column_match == 4 \|\| row_match == 4` | `LineClear` along the run |
/// | `column_match == 2 && row_match == 2` | `Wrapped` |
/// | `column_match == 3 \|\| row_match == 3` | `ColorBomb` (bomb-combination check) |
pub fn classify(grid: &Grid, group: &[TileId]) -> MatchDescriptor {
    for &id in group {
        let Some(tile) = grid.tile(id) else {
            continue;
        };
        let (color, pos) = (tile.color(), tile.pos());

        let mut column_match = 0;
        let mut row_match = 0;
        for &other_id in group {
            if other_id == id {
                continue;
            }
            let Some(other) = grid.tile(other_id) else {
                continue;
            };
            if other.color() != color {
                continue;
            }
            if other.column() == pos.col {
                column_match += 1;
            }
            if other.row() == pos.row {
                row_match += 1;
            }
        }

        let effect = if column_match == 4 || row_match == 4 {
            let axis = if row_match == 4 { Axis::Row } else { Axis::Column };
            MatchEffect::LineClear(axis)
        } else if column_match == 2 && row_match == 2 {
            MatchEffect::Wrapped
        } else if column_match == 3 || row_match == 3 {
            MatchEffect::ColorBomb
        } else {
            continue;
        };

        return MatchDescriptor {
            effect,
            color: Some(color),
        };
    }
    MatchDescriptor::none()
}

/// Upgrade whichever swapped tile is matched, plain, and has `color`; moved tile first
fn upgrade_swapped_tile(
    grid: &mut Grid,
    color: TileColor,
    swap: &SwapRecord,
    special: Special,
) -> Option<TileId> {
    for candidate in [swap.moved, swap.partner] {
        let qualifies = grid
            .tile(candidate)
            .map(|t| t.is_matched() && t.color() == color && t.special().is_none())
            .unwrap_or(false);
        if qualifies {
            grid.upgrade(candidate, special);
            return Some(candidate);
        }
    }
    None
}

/// Scans the board for runs and keeps the current match group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFinder {
    current: Vec<TileId>,
}

impl MatchFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag every tile in a run of three or more, then apply detonations of any
    /// matched special pieces. Returns the size of the match group.
    ///
    /// Discovery order: column-major cells; at each cell a horizontal run starting
    /// there is added before a vertical run starting there.
    pub fn scan_board(&mut self, grid: &mut Grid) -> usize {
        self.current.clear();
        grid.clear_matched();

        let starts: Vec<Coord> = grid.coords().collect();
        for at in starts {
            let Some(color) = grid.color_at(at) else {
                continue;
            };
            for (back, forward) in [
                (Direction::Left, Direction::Right),
                (Direction::Down, Direction::Up),
            ] {
                if grid.color_at(at.step(back)) == Some(color) {
                    continue;
                }
                let len = run_length(grid, at, color, forward);
                if len < RUN_LENGTH {
                    continue;
                }
                let mut cell = at;
                for _ in 0..len {
                    self.mark(grid, cell);
                    cell = cell.step(forward);
                }
            }
        }

        // Detonations may pull in more specials; the group grows while we walk it.
        let mut i = 0;
        while i < self.current.len() {
            let id = self.current[i];
            i += 1;
            let Some(tile) = grid.tile(id) else {
                continue;
            };
            let Some(special) = tile.special() else {
                continue;
            };
            for target in blast_area(grid, tile.pos(), tile.color(), special) {
                self.mark(grid, target);
            }
        }

        self.current.len()
    }

    fn mark(&mut self, grid: &mut Grid, at: Coord) {
        let Some(tile) = grid.tile_at(at) else {
            return;
        };
        if tile.is_matched() {
            return;
        }
        let id = tile.id();
        grid.set_matched(id, true);
        self.current.push(id);
    }

    pub fn current_matches(&self) -> &[TileId] {
        &self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn clear(&mut self) {
        self.current.clear();
    }

    /// Resolve a four-in-a-line group: the swapped tile becomes a color bomb
    pub fn check_bomb_combinations(
        &self,
        grid: &mut Grid,
        descriptor: &MatchDescriptor,
        swap: &SwapRecord,
    ) -> Option<TileId> {
        match (descriptor.effect, descriptor.color) {
            (MatchEffect::ColorBomb, Some(color)) => {
                upgrade_swapped_tile(grid, color, swap, Special::ColorBomb)
            }
            _ => None,
        }
    }

    /// Classify the current group and upgrade one of the swapped tiles if the
    /// shape earns a special piece
    pub fn create_special(&self, grid: &mut Grid, swap: &SwapRecord) -> Option<TileId> {
        if self.current.len() < SPECIAL_GROUP_MIN {
            return None;
        }
        let descriptor = classify(grid, &self.current);
        let color = descriptor.color?;
        match descriptor.effect {
            MatchEffect::None => None,
            MatchEffect::LineClear(axis) => {
                upgrade_swapped_tile(grid, color, swap, Special::LineClear(axis))
            }
            MatchEffect::Wrapped => upgrade_swapped_tile(grid, color, swap, Special::Wrapped),
            MatchEffect::ColorBomb => self.check_bomb_combinations(grid, &descriptor, swap),
        }
    }
}

/// Cells cleared by a special piece at `at`
pub fn blast_area(grid: &Grid, at: Coord, color: TileColor, special: Special) -> Vec<Coord> {
    let (w, h) = (grid.width() as i8, grid.height() as i8);
    match special {
        Special::LineClear(Axis::Row) => (0..w).map(|col| Coord::new(col, at.row)).collect(),
        Special::LineClear(Axis::Column) => (0..h).map(|row| Coord::new(at.col, row)).collect(),
        Special::Wrapped => (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| Coord::new(at.col + dx, at.row + dy)))
            .filter(|&c| grid.in_bounds(c))
            .collect(),
        Special::ColorBomb => grid
            .resident_tiles()
            .filter(|t| t.color() == color)
            .map(|t| t.pos())
            .collect(),
    }
}
