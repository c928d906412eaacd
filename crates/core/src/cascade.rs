//! Cascade steps - destruction of matched tiles and gravity compaction
//!
//! The phase machine that sequences these lives in [`crate::board`].

use arrayvec::ArrayVec;
use tracing::trace;

use crate::collab::{Collaborators, GoalTag};
use crate::grid::Grid;
use crate::types::{Axis, Coord, ObstacleKind, Special};

/// What one destruction pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestroyReport {
    pub tiles_destroyed: u32,
    pub obstacles_cleared: u32,
    pub points: u32,
}

/// In-bounds orthogonal neighbours of a cell
pub fn neighbours(grid: &Grid, at: Coord) -> ArrayVec<Coord, 4> {
    at.orthogonal()
        .into_iter()
        .filter(|&c| grid.in_bounds(c))
        .collect()
}

fn damage(
    grid: &mut Grid,
    at: Coord,
    kind: ObstacleKind,
    collab: &mut Collaborators,
    report: &mut DestroyReport,
) {
    if grid.damage_overlay(at, kind, 1) {
        trace!(col = at.col, row = at.row, ?kind, "obstacle cleared");
        collab.goals.notify_destroyed(GoalTag::Obstacle(kind));
        report.obstacles_cleared += 1;
    }
}

/// Destroy every matched tile in cell order
///
/// Each destroyed tile damages a Breakable or Lock in its own cell and Ice in its
/// orthogonal neighbours; a line-clear tile also damages Ice along its line.
/// Every tile is worth `points_per_tile`.
pub fn destroy_matched(
    grid: &mut Grid,
    points_per_tile: u32,
    collab: &mut Collaborators,
) -> DestroyReport {
    let mut report = DestroyReport::default();
    let targets: Vec<(Coord, _, _)> = grid
        .resident_tiles()
        .filter(|t| t.is_matched())
        .map(|t| (t.pos(), t.color(), t.special()))
        .collect();

    for (at, color, special) in targets {
        damage(grid, at, ObstacleKind::Breakable, collab, &mut report);
        damage(grid, at, ObstacleKind::Lock, collab, &mut report);
        for n in neighbours(grid, at) {
            damage(grid, n, ObstacleKind::Ice, collab, &mut report);
        }
        if let Some(Special::LineClear(axis)) = special {
            let line: Vec<Coord> = match axis {
                Axis::Row => (0..grid.width() as i8)
                    .map(|col| Coord::new(col, at.row))
                    .collect(),
                Axis::Column => (0..grid.height() as i8)
                    .map(|row| Coord::new(at.col, row))
                    .collect(),
            };
            for cell in line {
                damage(grid, cell, ObstacleKind::Ice, collab, &mut report);
            }
        }

        collab.goals.notify_destroyed(GoalTag::Color(color));
        collab.goals.refresh_goals();
        collab.sound.play_destroy();
        collab.effects.spawn_destroy_effect(at);
        collab.score.increase_score(points_per_tile);

        grid.remove(at);
        report.tiles_destroyed += 1;
        report.points += points_per_tile;
    }
    report
}

/// Pull tiles down into empty fillable cells until nothing moves
///
/// Returns the number of single-tile moves made.
pub fn compact(grid: &mut Grid) -> usize {
    let mut moves = 0;
    loop {
        let mut moved = false;
        let cells: Vec<Coord> = grid.coords().collect();
        for at in cells {
            if !grid.is_fillable(at) || grid.is_occupied(at) {
                continue;
            }
            let above = (at.row + 1..grid.height() as i8)
                .map(|row| Coord::new(at.col, row))
                .find(|&c| grid.is_occupied(c));
            if let Some(from) = above {
                if grid.relocate(from, at) {
                    moved = true;
                    moves += 1;
                }
            }
        }
        if !moved {
            return moves;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Obstacle;

    fn c(col: i8, row: i8) -> Coord {
        Coord::new(col, row)
    }

    fn mark_all(grid: &mut Grid, cells: &[Coord]) {
        for &at in cells {
            let id = grid.tile_id_at(at).unwrap();
            grid.set_matched(id, true);
        }
    }

    #[test]
    fn test_destroy_removes_and_scores() {
        let mut grid = Grid::from_rows(&["AAAB", "BCBC"]).unwrap();
        mark_all(&mut grid, &[c(0, 0), c(1, 0), c(2, 0)]);
        let mut collab = Collaborators::default();
        let report = destroy_matched(&mut grid, 40, &mut collab);
        assert_eq!(report.tiles_destroyed, 3);
        assert_eq!(report.points, 120);
        assert_eq!(grid.resident_count(), 5);
        assert!(grid.tile_at(c(3, 0)).is_some());
    }

    #[test]
    fn test_destroy_damages_colocated_and_adjacent_overlays() {
        let mut grid = Grid::from_rows(&["AAAB", "~CBC"]).unwrap();
        grid.set_overlay(c(1, 0), Some(Obstacle::new(ObstacleKind::Breakable, 2)));
        mark_all(&mut grid, &[c(0, 0), c(1, 0), c(2, 0)]);
        let mut collab = Collaborators::default();
        let report = destroy_matched(&mut grid, 20, &mut collab);

        assert_eq!(report.obstacles_cleared, 1);
        assert!(!grid.has_ice(c(0, 1)));
        assert_eq!(grid.overlay(c(1, 0)).unwrap().hit_points(), 1);
    }

    #[test]
    fn test_line_clear_damages_ice_along_line() {
        let mut grid = Grid::from_rows(&["AAAB.~"]).unwrap();
        let id = grid.tile_id_at(c(0, 0)).unwrap();
        grid.become_line_clear(id, Axis::Row);
        mark_all(&mut grid, &[c(0, 0)]);
        let mut collab = Collaborators::default();
        destroy_matched(&mut grid, 20, &mut collab);
        assert!(!grid.has_ice(c(5, 0)));
    }

    #[test]
    fn test_compact_pulls_down_over_gaps() {
        // Column 0 bottom-up: empty, blank, A ; column 1: empty, empty, B
        let mut grid = Grid::from_rows(&["..", "#.", "AB"]).unwrap();
        let moves = compact(&mut grid);
        assert_eq!(moves, 2);
        assert_eq!(grid.color_at(c(0, 0)).map(|k| k.as_char()), Some('A'));
        assert!(grid.tile_at(c(0, 2)).is_none());
        assert!(grid.tile_at(c(1, 0)).is_some());
        assert!(grid.tile_at(c(1, 2)).is_none());
        assert!(grid.positions_consistent());
    }

    #[test]
    fn test_compact_falls_past_ice() {
        // Ice at (0,1) is skipped; the tile above it falls through to (0,0).
        let mut grid = Grid::from_rows(&[".", "~", "A"]).unwrap();
        compact(&mut grid);
        assert!(grid.tile_at(c(0, 0)).is_some());
        assert!(grid.has_ice(c(0, 1)));
    }
}
