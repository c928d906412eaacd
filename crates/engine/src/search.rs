//! Legal swap enumeration and hints

use match3_core::grid::Grid;
use match3_core::matching::MatchFinder;
use match3_core::swap::try_swap;
use match3_core::Board;
use match3_types::{Coord, Direction};

/// A player swap: the tile at `at` trades places with its neighbour in `direction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swap {
    pub at: Coord,
    pub direction: Direction,
}

impl Swap {
    pub fn new(col: i8, row: i8, direction: Direction) -> Self {
        Self {
            at: Coord::new(col, row),
            direction,
        }
    }

    pub fn target(&self) -> Coord {
        self.at.step(self.direction)
    }
}

/// Every swap the player may make that creates a run
///
/// Only rightward and upward swaps are listed; each covers its mirror. Swaps
/// touching a locked tile are skipped.
pub fn legal_swaps(board: &Board) -> Vec<Swap> {
    let mut grid = board.grid().clone();
    legal_swaps_in(&mut grid)
}

/// [`legal_swaps`] over a bare grid; the grid is left as it was
pub fn legal_swaps_in(grid: &mut Grid) -> Vec<Swap> {
    let starts: Vec<Coord> = grid.resident_tiles().map(|t| t.pos()).collect();
    let mut out = Vec::new();
    for at in starts {
        for direction in [Direction::Right, Direction::Up] {
            let swap = Swap { at, direction };
            if grid.is_locked(at) || grid.is_locked(swap.target()) {
                continue;
            }
            if grid.swap_creates_match(at, direction) {
                out.push(swap);
            }
        }
    }
    out
}

/// Number of tiles the swap's first wave would destroy (0 when the swap is rejected)
pub fn swap_yield(grid: &Grid, swap: Swap) -> usize {
    let mut trial = grid.clone();
    if try_swap(&mut trial, swap.at, swap.direction).is_none() {
        return 0;
    }
    MatchFinder::new().scan_board(&mut trial)
}

/// The legal swap with the largest first wave; earliest in scan order on ties
pub fn find_hint(board: &Board) -> Option<Swap> {
    let mut best: Option<(usize, Swap)> = None;
    for swap in legal_swaps(board) {
        let size = swap_yield(board.grid(), swap);
        if best.map(|(b, _)| size > b).unwrap_or(true) {
            best = Some((size, swap));
        }
    }
    best.map(|(_, swap)| swap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::grid::Obstacle;
    use match3_core::BoardConfig;
    use match3_types::{ObstacleKind, TileColor};

    fn board(rows: &[&str]) -> Board {
        let palette = "ABCD".chars().filter_map(TileColor::from_char).collect();
        Board::from_grid(
            Grid::from_rows(rows).unwrap(),
            palette,
            BoardConfig::default(),
        )
    }

    #[test]
    fn test_legal_swaps_in_scan_order() {
        let b = board(&["AABA", "BCCB", "CDDC"]);
        assert_eq!(
            legal_swaps(&b),
            vec![
                Swap::new(0, 1, Direction::Up),
                Swap::new(2, 0, Direction::Right),
                Swap::new(3, 1, Direction::Up),
            ]
        );
    }

    #[test]
    fn test_no_legal_swaps_on_deadlocked_board() {
        let b = board(&["ABCD", "CDAB", "ABCD", "CDAB"]);
        assert!(legal_swaps(&b).is_empty());
        assert_eq!(find_hint(&b), None);
    }

    #[test]
    fn test_locked_tiles_are_skipped() {
        let mut grid = Grid::from_rows(&["AABA", "BCCB", "CDDC"]).unwrap();
        grid.set_overlay(
            Coord::new(0, 2),
            Some(Obstacle::new(ObstacleKind::Lock, 1)),
        );
        let palette = "ABCD".chars().filter_map(TileColor::from_char).collect();
        let b = Board::from_grid(grid, palette, BoardConfig::default());
        assert_eq!(
            legal_swaps(&b),
            vec![
                Swap::new(2, 0, Direction::Right),
                Swap::new(3, 1, Direction::Up),
            ]
        );
    }

    #[test]
    fn test_hint_prefers_larger_match() {
        // (2,0) Up makes A A A A along row 0; (2,0) Right only makes three.
        let b = board(&["AABAC", "BCACB", "CBDBD"]);
        assert_eq!(find_hint(&b), Some(Swap::new(2, 0, Direction::Up)));
        assert_eq!(swap_yield(b.grid(), Swap::new(2, 0, Direction::Up)), 4);
        assert_eq!(swap_yield(b.grid(), Swap::new(2, 0, Direction::Right)), 3);
    }

    #[test]
    fn test_hint_ties_keep_scan_order() {
        let b = board(&["AABA", "BCCB", "CDDC"]);
        assert_eq!(find_hint(&b), Some(Swap::new(0, 1, Direction::Up)));
    }
}
