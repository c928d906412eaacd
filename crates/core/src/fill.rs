//! Fill module - constrained random placement
//!
//! Cells are filled in column-major order, so when a cell is filled only its left
//! and lower neighbours can already hold tiles. [`matches_at`] therefore checks just
//! the two cells to the left and the two cells below.

use tracing::trace;

use crate::grid::Grid;
use crate::level::LevelConfig;
use crate::rng::SimpleRng;
use crate::types::{Coord, TileColor};

/// Would placing `color` at `at` complete a run with the already-placed cells
/// to its left or below?
pub fn matches_at(grid: &Grid, at: Coord, color: TileColor) -> bool {
    let same = |col: i8, row: i8| grid.color_at(Coord::new(col, row)) == Some(color);

    let left = at.col > 1 && same(at.col - 1, at.row) && same(at.col - 2, at.row);
    let below = at.row > 1 && same(at.col, at.row - 1) && same(at.col, at.row - 2);
    left || below
}

/// Sample a palette color that does not complete a run at `at`
///
/// After `max_attempts` rejected samples the last sample is returned anyway.
pub fn sample_color(
    grid: &Grid,
    rng: &mut SimpleRng,
    palette: &[TileColor],
    at: Coord,
    max_attempts: u32,
) -> Option<TileColor> {
    let mut color = rng.pick(palette)?;
    let mut attempts = 0;
    while matches_at(grid, at, color) && attempts < max_attempts {
        color = rng.pick(palette)?;
        attempts += 1;
    }
    if attempts >= max_attempts {
        trace!(col = at.col, row = at.row, "fill attempts exhausted; placing last sample");
    }
    Some(color)
}

/// Fill every empty, fillable cell; returns the number of tiles created
pub fn fill_empty(
    grid: &mut Grid,
    rng: &mut SimpleRng,
    palette: &[TileColor],
    max_attempts: u32,
) -> usize {
    let targets: Vec<Coord> = grid
        .coords()
        .filter(|&at| grid.is_fillable(at) && !grid.is_occupied(at))
        .collect();

    let mut created = 0;
    for at in targets {
        let Some(color) = sample_color(grid, rng, palette, at, max_attempts) else {
            break;
        };
        if grid.spawn(at, color).is_some() {
            created += 1;
        }
    }
    created
}

/// Build a level's grid: masks and overlays from the layout, then a constrained fill
pub fn build_grid(level: &LevelConfig, rng: &mut SimpleRng, max_attempts: u32) -> Grid {
    let mut grid = Grid::from_layout(level.width, level.height, level.entries_in_bounds());
    fill_empty(&mut grid, rng, &level.palette, max_attempts);
    grid
}
