//! Classifier tests - shape classification and special-piece creation

use match3_board::core::matching::{classify, MatchFinder};
use match3_board::core::{Board, BoardConfig, Grid, SwapRecord};
use match3_board::types::{Axis, Coord, Direction, MatchEffect, Special, TileColor};

fn c(col: i8, row: i8) -> Coord {
    Coord::new(col, row)
}

fn classify_rows(rows: &[&str]) -> MatchEffect {
    let mut grid = Grid::from_rows(rows).unwrap();
    let mut finder = MatchFinder::new();
    finder.scan_board(&mut grid);
    classify(&grid, finder.current_matches()).effect
}

fn board(rows: &[&str]) -> Board {
    let palette = "ABCD".chars().filter_map(TileColor::from_char).collect();
    let mut board = Board::from_grid(Grid::from_rows(rows).unwrap(), palette, BoardConfig::default());
    board.start();
    board
}

#[test]
fn test_straight_five_is_line_clear() {
    assert_eq!(
        classify_rows(&["AAAAA", "BCDBC", "CDBCD"]),
        MatchEffect::LineClear(Axis::Row)
    );
    assert_eq!(
        classify_rows(&["AB", "AC", "AB", "AC", "AB"]),
        MatchEffect::LineClear(Axis::Column)
    );
}

#[test]
fn test_straight_four_is_not_line_clear() {
    let effect = classify_rows(&["AAAAB", "BCDBC", "CDBCD"]);
    assert_ne!(effect, MatchEffect::LineClear(Axis::Row));
    assert_ne!(effect, MatchEffect::LineClear(Axis::Column));
    assert_eq!(effect, MatchEffect::ColorBomb);
}

#[test]
fn test_l_shape_is_wrapped() {
    assert_eq!(classify_rows(&["AAAB", "ACDC", "ADBD"]), MatchEffect::Wrapped);
}

#[test]
fn test_t_shape_is_wrapped() {
    assert_eq!(classify_rows(&["AAAB", "CADC", "DABD"]), MatchEffect::Wrapped);
}

#[test]
fn test_plain_runs_classify_as_none() {
    assert_eq!(classify_rows(&["AAAB", "BCDC", "CDBD"]), MatchEffect::None);
    // Two separate runs of different colors: counts never mix colors.
    assert_eq!(classify_rows(&["AAAC", "BBBD", "CDCA"]), MatchEffect::None);
}

#[test]
fn test_swap_into_five_upgrades_moved_tile() {
    let mut b = board(&["AABAA", "CDADC", "DBCBD"]);
    let moved = b.grid().tile_id_at(c(2, 1)).unwrap();
    assert!(b.try_swap(2, 1, Direction::Down));
    assert!(b.advance());

    let tile = b.grid().tile(moved).unwrap();
    assert_eq!(tile.special(), Some(Special::LineClear(Axis::Row)));
    assert!(!tile.is_matched());
    assert_eq!(tile.pos(), c(2, 0));
    assert_eq!(b.grid().resident_count(), 11);
}

#[test]
fn test_swap_into_four_makes_color_bomb() {
    let mut b = board(&["AABAC", "CDADB", "DBCBD"]);
    let moved = b.grid().tile_id_at(c(2, 1)).unwrap();
    assert!(b.try_swap(2, 1, Direction::Down));
    assert!(b.advance());

    let tile = b.grid().tile(moved).unwrap();
    assert_eq!(tile.special(), Some(Special::ColorBomb));
    assert_eq!(b.grid().resident_count(), 12);
    assert_eq!(b.take_last_cascade(), None);
}

#[test]
fn test_swap_into_corner_makes_wrapped() {
    let mut b = board(&["BCDB", "ABAA", "CADC", "DACD"]);
    let moved = b.grid().tile_id_at(c(0, 1)).unwrap();
    assert!(b.try_swap(0, 1, Direction::Right));
    assert!(b.advance());

    let tile = b.grid().tile(moved).unwrap();
    assert_eq!(tile.special(), Some(Special::Wrapped));
    assert_eq!(tile.pos(), c(1, 1));
}

#[test]
fn test_partner_upgraded_when_moved_tile_is_unmatched() {
    // Moving the B up pulls the A down; only the partner is part of the run.
    let mut b = board(&["AABAA", "CDADC", "DBCBD"]);
    let partner = b.grid().tile_id_at(c(2, 1)).unwrap();
    assert!(b.try_swap(2, 0, Direction::Up));
    assert!(b.advance());

    let tile = b.grid().tile(partner).unwrap();
    assert_eq!(tile.special(), Some(Special::LineClear(Axis::Row)));
    assert_eq!(tile.pos(), c(2, 0));
}

#[test]
fn test_cascade_with_special_settles_full_board() {
    let mut b = board(&["AABAA", "CDADC", "DBCBD"]);
    assert!(b.try_swap(2, 1, Direction::Down));
    b.settle();

    // Every cell is refilled and the board is settled whatever the refill produced.
    assert_eq!(b.grid().resident_count(), 15);
    assert!(!b.has_any_match());
    let summary = b.take_last_cascade().unwrap();
    assert!(summary.specials_created >= 1);
}

#[test]
fn test_first_qualifying_tile_decides_shape() {
    // An L in the bottom-left and a straight five of the same color up top.
    // The L corner is discovered first, so the group is Wrapped.
    let mut grid = Grid::from_rows(&[
        "AAA.....",
        "A.......",
        "A.......",
        "........",
        "...AAAAA",
    ])
    .unwrap();
    let mut finder = MatchFinder::new();
    assert_eq!(finder.scan_board(&mut grid), 10);
    assert_eq!(grid.tile_id_at(c(0, 0)), Some(finder.current_matches()[0]));
    assert_eq!(classify(&grid, finder.current_matches()).effect, MatchEffect::Wrapped);

    // Walking the same group backwards reaches the line first.
    let reversed: Vec<_> = finder.current_matches().iter().rev().copied().collect();
    assert_eq!(
        classify(&grid, &reversed).effect,
        MatchEffect::LineClear(Axis::Row)
    );
}

#[test]
fn test_no_special_when_swapped_tiles_are_outside_the_run() {
    let mut grid = Grid::from_rows(&["AAAAA", "BCDBC", "CDBCD"]).unwrap();
    let mut finder = MatchFinder::new();
    finder.scan_board(&mut grid);
    let swap = SwapRecord {
        moved: grid.tile_id_at(c(0, 2)).unwrap(),
        partner: grid.tile_id_at(c(1, 2)).unwrap(),
        direction: Direction::Right,
    };
    assert_eq!(finder.create_special(&mut grid, &swap), None);
    assert!(grid.resident_tiles().all(|t| t.special().is_none()));
}

#[test]
fn test_cascade_creates_no_special_away_from_swap() {
    // Row 0 already holds a five; the accepted swap on row 2 takes no part in it.
    let mut b = board(&["AAAAA", "BCDBC", "CDBCD"]);
    assert!(b.try_swap(0, 2, Direction::Right));
    assert!(b.advance());
    assert!(b.grid().resident_tiles().all(|t| t.special().is_none()));
    assert_eq!(b.grid().resident_count(), 10);

    b.settle();
    let summary = b.take_last_cascade().unwrap();
    assert_eq!(summary.specials_created, 0);
    assert_eq!(summary.tiles_destroyed, 5);
}
