//! Board - mode gating, swap intake and the cascade phase machine
//!
//! A board cycles through
//!
//! ```text
//! Idle -> Resolving -> Compacting -> Refilling -> Settling -> (Resolving | Idle)
//! ```
//!
//! with `settle_delay_ms` between phases. Drive it with [`Board::tick`] every frame,
//! or use [`Board::advance`] / [`Board::settle`] to run phases immediately.

use tracing::{debug, trace, warn};

use crate::cascade::{compact, destroy_matched};
use crate::collab::Collaborators;
use crate::config::BoardConfig;
use crate::deadlock::{self, ReshuffleError};
use crate::fill::{build_grid, fill_empty};
use crate::grid::Grid;
use crate::level::{LevelConfig, LevelError};
use crate::matching::{has_any_match, MatchFinder};
use crate::rng::SimpleRng;
use crate::snapshot::BoardSnapshot;
use crate::swap::{self, SwapRecord};
use crate::types::{BoardMode, CascadePhase, Coord, Direction, TileColor};

/// Totals for one complete cascade (swap to settled board)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    /// Number of destroy waves; 1 when the swap's own match produced no chain
    pub waves: u32,
    pub tiles_destroyed: u32,
    pub obstacles_cleared: u32,
    pub points: u32,
    pub specials_created: u32,
    pub reshuffles: u32,
}

#[derive(Debug)]
pub struct Board {
    grid: Grid,
    palette: Vec<TileColor>,
    config: BoardConfig,
    rng: SimpleRng,
    finder: MatchFinder,
    collab: Collaborators,

    mode: BoardMode,
    phase: CascadePhase,
    phase_timer_ms: u32,
    streak: u32,
    current_swap: Option<SwapRecord>,

    moves_remaining: Option<u32>,
    score_goals: Vec<u32>,
    score: u32,

    cascade: CascadeSummary,
    last_cascade: Option<CascadeSummary>,
}

impl Board {
    /// Build a board for a level: layout masks, constrained fill, then a
    /// playability check. The board starts paused; call [`Board::start`].
    pub fn new(level: &LevelConfig, config: BoardConfig) -> Result<Self, LevelError> {
        level.validate()?;
        let mut rng = SimpleRng::new(config.seed);
        let grid = build_grid(level, &mut rng, config.max_fill_attempts);

        let mut board = Self::with_rng(grid, level.palette.clone(), config, rng);
        board.moves_remaining = level.move_limit;
        board.score_goals = level.score_goals.clone();

        if let Err(err) = board.reshuffle_until_playable() {
            warn!(error = %err, "new board is not playable");
        }
        debug!(
            width = level.width,
            height = level.height,
            colors = level.palette.len(),
            "board created"
        );
        Ok(board)
    }

    /// Wrap an existing grid as-is (no fill, no reshuffle)
    pub fn from_grid(grid: Grid, palette: Vec<TileColor>, config: BoardConfig) -> Self {
        let rng = SimpleRng::new(config.seed);
        Self::with_rng(grid, palette, config, rng)
    }

    fn with_rng(grid: Grid, palette: Vec<TileColor>, config: BoardConfig, rng: SimpleRng) -> Self {
        Self {
            grid,
            palette,
            config,
            rng,
            finder: MatchFinder::new(),
            collab: Collaborators::default(),
            mode: BoardMode::Pause,
            phase: CascadePhase::Idle,
            phase_timer_ms: 0,
            streak: 1,
            current_swap: None,
            moves_remaining: None,
            score_goals: Vec::new(),
            score: 0,
            cascade: CascadeSummary::default(),
            last_cascade: None,
        }
    }

    pub fn with_collaborators(mut self, collab: Collaborators) -> Self {
        self.collab = collab;
        self
    }

    pub fn with_move_limit(mut self, move_limit: Option<u32>) -> Self {
        self.moves_remaining = move_limit;
        self
    }

    pub fn with_score_goals(mut self, score_goals: Vec<u32>) -> Self {
        self.score_goals = score_goals;
        self
    }

    // ---- mode control ----

    /// Leave the initial pause and accept swaps
    pub fn start(&mut self) {
        self.resume();
    }

    /// Stop accepting swaps; an in-flight cascade still runs to completion
    pub fn pause(&mut self) {
        if matches!(self.mode, BoardMode::Move | BoardMode::Wait) {
            self.mode = BoardMode::Pause;
        }
    }

    pub fn resume(&mut self) {
        if self.mode != BoardMode::Pause {
            return;
        }
        self.mode = if self.phase != CascadePhase::Idle {
            BoardMode::Wait
        } else if self.moves_remaining == Some(0) {
            BoardMode::Lose
        } else {
            BoardMode::Move
        };
    }

    /// End the level as won (called by the goal layer)
    pub fn declare_win(&mut self) {
        self.mode = BoardMode::Win;
    }

    pub fn declare_loss(&mut self) {
        self.mode = BoardMode::Lose;
    }

    // ---- swaps ----

    /// Attempt a player swap of the tile at (`col`, `row`) with its neighbour
    ///
    /// Returns true when the swap produced a match and was kept; the cascade then
    /// starts. Rejected swaps leave the board untouched.
    pub fn try_swap(&mut self, col: i8, row: i8, direction: Direction) -> bool {
        if !self.mode.accepts_input() || self.phase != CascadePhase::Idle {
            return false;
        }
        let at = Coord::new(col, row);
        let target = at.step(direction);
        if self.grid.is_locked(at) || self.grid.is_locked(target) {
            return false;
        }

        let Some(record) = swap::try_swap(&mut self.grid, at, direction) else {
            return false;
        };
        self.grid.set_other_dot(record.moved, Some(record.partner));
        self.grid.set_other_dot(record.partner, Some(record.moved));
        if let Some(moves) = self.moves_remaining.as_mut() {
            *moves = moves.saturating_sub(1);
        }

        self.mode = BoardMode::Wait;
        self.current_swap = Some(record);
        self.streak = 1;
        self.finder.scan_board(&mut self.grid);
        self.cascade = CascadeSummary {
            waves: 1,
            ..CascadeSummary::default()
        };
        self.enter(CascadePhase::Resolving);
        debug!(col, row, direction = direction.as_str(), "swap accepted");
        true
    }

    // ---- phase machine ----

    /// Advance timers; runs the pending phase once `settle_delay_ms` has elapsed
    ///
    /// Returns true if a phase ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.phase == CascadePhase::Idle {
            return false;
        }
        self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
        if self.phase_timer_ms < self.config.settle_delay_ms {
            return false;
        }
        self.run_phase();
        true
    }

    /// Run the pending phase now; false when the board is idle
    pub fn advance(&mut self) -> bool {
        if self.phase == CascadePhase::Idle {
            return false;
        }
        self.run_phase();
        true
    }

    /// Run phases until the board is idle; returns the number of phases run
    pub fn settle(&mut self) -> u32 {
        let mut phases = 0;
        while self.advance() {
            phases += 1;
        }
        phases
    }

    fn enter(&mut self, phase: CascadePhase) {
        trace!(from = ?self.phase, to = ?phase, streak = self.streak, "phase");
        self.phase = phase;
        self.phase_timer_ms = 0;
    }

    fn run_phase(&mut self) {
        match self.phase {
            CascadePhase::Idle => {}
            CascadePhase::Resolving => {
                if let Some(record) = self.current_swap {
                    if self.finder.create_special(&mut self.grid, &record).is_some() {
                        self.cascade.specials_created += 1;
                    }
                }
                let points = self.config.base_piece_value.saturating_mul(self.streak);
                let report = destroy_matched(&mut self.grid, points, &mut self.collab);
                self.finder.clear();

                self.cascade.tiles_destroyed += report.tiles_destroyed;
                self.cascade.obstacles_cleared += report.obstacles_cleared;
                self.cascade.points += report.points;
                self.score = self.score.saturating_add(report.points);
                self.enter(CascadePhase::Compacting);
            }
            CascadePhase::Compacting => {
                compact(&mut self.grid);
                self.enter(CascadePhase::Refilling);
            }
            CascadePhase::Refilling => {
                fill_empty(
                    &mut self.grid,
                    &mut self.rng,
                    &self.palette,
                    self.config.max_fill_attempts,
                );
                self.enter(CascadePhase::Settling);
            }
            CascadePhase::Settling => {
                if self.finder.scan_board(&mut self.grid) > 0 {
                    self.streak += 1;
                    self.cascade.waves += 1;
                    self.enter(CascadePhase::Resolving);
                } else {
                    self.finish_cascade();
                }
            }
        }
    }

    fn finish_cascade(&mut self) {
        self.streak = 1;
        match self.reshuffle_until_playable() {
            Ok(count) => self.cascade.reshuffles = count,
            Err(err) => warn!(error = %err, code = err.code(), "board left unplayable"),
        }
        self.current_swap = None;
        self.enter(CascadePhase::Idle);

        if self.mode == BoardMode::Wait {
            self.mode = if self.moves_remaining == Some(0) {
                BoardMode::Lose
            } else {
                BoardMode::Move
            };
        }
        debug!(
            waves = self.cascade.waves,
            destroyed = self.cascade.tiles_destroyed,
            points = self.cascade.points,
            mode = self.mode.as_str(),
            "cascade settled"
        );
        self.last_cascade = Some(std::mem::take(&mut self.cascade));
    }

    // ---- board checks ----

    pub fn has_any_match(&self) -> bool {
        has_any_match(&self.grid)
    }

    /// Test every adjacent swap; the grid is restored afterwards
    pub fn is_deadlocked(&mut self) -> bool {
        deadlock::is_deadlocked(&mut self.grid)
    }

    /// Reshuffle until the board has no run and a legal swap exists
    pub fn reshuffle_until_playable(&mut self) -> Result<u32, ReshuffleError> {
        deadlock::reshuffle_until_playable(
            &mut self.grid,
            &mut self.rng,
            self.config.max_fill_attempts,
            self.config.max_reshuffles,
        )
    }

    // ---- accessors ----

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette(&self) -> &[TileColor] {
        &self.palette
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn mode(&self) -> BoardMode {
        self.mode
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == CascadePhase::Idle
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_remaining(&self) -> Option<u32> {
        self.moves_remaining
    }

    pub fn current_swap(&self) -> Option<SwapRecord> {
        self.current_swap
    }

    pub fn finder(&self) -> &MatchFinder {
        &self.finder
    }

    pub fn score_goals(&self) -> &[u32] {
        &self.score_goals
    }

    /// Number of score goals reached so far
    pub fn goals_reached(&self) -> usize {
        self.score_goals.iter().filter(|&&g| self.score >= g).count()
    }

    /// Take and clear the summary of the most recently settled cascade
    pub fn take_last_cascade(&mut self) -> Option<CascadeSummary> {
        self.last_cascade.take()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::from_grid(&self.grid);
        snap.mode = self.mode;
        snap.phase = self.phase;
        snap.streak = self.streak;
        snap.score = self.score;
        snap.moves_remaining = self.moves_remaining;
        snap
    }
}
