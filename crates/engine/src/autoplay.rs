//! Autoplayer - picks and applies swaps, then runs the cascade to completion

use tracing::debug;

use match3_core::rng::SimpleRng;
use match3_core::{Board, CascadeSummary};
use match3_types::BoardMode;

use crate::search::{legal_swaps, swap_yield, Swap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    NotPlayable,
    NoLegalMove,
    Rejected,
}

impl MoveError {
    pub fn code(self) -> &'static str {
        match self {
            MoveError::NotPlayable => "not_playable",
            MoveError::NoLegalMove | MoveError::Rejected => "invalid_move",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MoveError::NotPlayable => "board is not accepting swaps",
            MoveError::NoLegalMove => "no swap on the board creates a match",
            MoveError::Rejected => "board rejected the chosen swap",
        }
    }
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for MoveError {}

/// Greedy player: largest immediate match, ties broken by a seeded RNG
#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: SimpleRng,
}

impl Autoplayer {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Pick the next swap without applying it
    pub fn choose(&mut self, board: &Board) -> Option<Swap> {
        let scored: Vec<(usize, Swap)> = legal_swaps(board)
            .into_iter()
            .map(|s| (swap_yield(board.grid(), s), s))
            .collect();
        let best = scored.iter().map(|(size, _)| *size).max()?;
        let mut top: Vec<Swap> = scored
            .into_iter()
            .filter(|(size, _)| *size == best)
            .map(|(_, s)| s)
            .collect();
        self.rng.shuffle(&mut top);
        top.first().copied()
    }

    /// Apply one swap; the board is left mid-cascade
    pub fn play_move(&mut self, board: &mut Board) -> Result<Swap, MoveError> {
        if board.mode() != BoardMode::Move || !board.is_idle() {
            return Err(MoveError::NotPlayable);
        }
        let swap = self.choose(board).ok_or(MoveError::NoLegalMove)?;
        if !board.try_swap(swap.at.col, swap.at.row, swap.direction) {
            return Err(MoveError::Rejected);
        }
        debug!(
            col = swap.at.col,
            row = swap.at.row,
            direction = swap.direction.as_str(),
            "autoplay swap"
        );
        Ok(swap)
    }

    /// Apply one swap and settle the resulting cascade
    pub fn play_turn(&mut self, board: &mut Board) -> Result<CascadeSummary, MoveError> {
        self.play_move(board)?;
        board.settle();
        Ok(board.take_last_cascade().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::{BoardConfig, Grid, LevelConfig};
    use match3_types::TileColor;

    fn palette(s: &str) -> Vec<TileColor> {
        s.chars().filter_map(TileColor::from_char).collect()
    }

    #[test]
    fn test_paused_board_is_not_playable() {
        let grid = Grid::from_rows(&["AABA", "BCCB", "CDDC"]).unwrap();
        let mut board = Board::from_grid(grid, palette("ABCD"), BoardConfig::default());
        let mut player = Autoplayer::new(1);
        assert_eq!(player.play_move(&mut board), Err(MoveError::NotPlayable));
    }

    #[test]
    fn test_deadlocked_board_has_no_move() {
        let grid = Grid::from_rows(&["ABCD", "CDAB", "ABCD", "CDAB"]).unwrap();
        let mut board = Board::from_grid(grid, palette("ABCD"), BoardConfig::default());
        board.start();
        let mut player = Autoplayer::new(1);
        let err = player.play_move(&mut board).unwrap_err();
        assert_eq!(err, MoveError::NoLegalMove);
        assert_eq!(err.code(), "invalid_move");
    }

    #[test]
    fn test_play_turns_until_budget_spent() {
        let level = LevelConfig {
            width: 7,
            height: 7,
            palette: palette("ABCDE"),
            layout: vec![],
            score_goals: vec![],
            move_limit: Some(3),
        };
        let mut board = Board::new(&level, BoardConfig::default().with_seed(5)).unwrap();
        board.start();
        let mut player = Autoplayer::new(9);

        for _ in 0..3 {
            let summary = player.play_turn(&mut board).unwrap();
            assert!(summary.tiles_destroyed >= 3);
        }
        assert_eq!(board.moves_remaining(), Some(0));
        assert_eq!(board.mode(), BoardMode::Lose);
        assert_eq!(player.play_move(&mut board), Err(MoveError::NotPlayable));
        assert_eq!(board.grid().resident_count(), 49);
    }
}
