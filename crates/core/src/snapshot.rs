//! Serializable board snapshots for logs, observers and tests

use serde::Serialize;

use crate::grid::Grid;
use crate::types::{BoardMode, CascadePhase, Coord, ObstacleKind, Special};

/// FNV-1a 64-bit over a byte stream; stable across platforms and Rust versions
pub fn fnv1a64(bytes: impl Iterator<Item = u8>) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut h = OFFSET_BASIS;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(PRIME);
    }
    h
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlaySnapshot {
    pub x: i8,
    pub y: i8,
    pub kind: ObstacleKind,
    pub hit_points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecialSnapshot {
    pub x: i8,
    pub y: i8,
    pub special: Special,
}

/// Point-in-time view of a board
///
/// `rows[0]` is the bottom row. Cell characters: a color letter for a tile,
/// `.` empty, `#` blank, `~` ice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub rows: Vec<String>,
    pub overlays: Vec<OverlaySnapshot>,
    pub specials: Vec<SpecialSnapshot>,
    pub board_hash: u64,
    pub mode: BoardMode,
    pub phase: CascadePhase,
    pub streak: u32,
    pub score: u32,
    pub moves_remaining: Option<u32>,
}

impl BoardSnapshot {
    /// Capture the grid layers; meta fields start at their idle values
    pub fn from_grid(grid: &Grid) -> Self {
        let rows: Vec<String> = (0..grid.height() as i8)
            .map(|row| {
                (0..grid.width() as i8)
                    .map(|col| cell_char(grid, Coord::new(col, row)))
                    .collect()
            })
            .collect();

        let overlays = grid
            .coords()
            .filter_map(|at| {
                grid.overlay(at).map(|o| OverlaySnapshot {
                    x: at.col,
                    y: at.row,
                    kind: o.kind(),
                    hit_points: o.hit_points(),
                })
            })
            .collect();

        let specials = grid
            .resident_tiles()
            .filter_map(|t| {
                t.special().map(|special| SpecialSnapshot {
                    x: t.column(),
                    y: t.row(),
                    special,
                })
            })
            .collect();

        let board_hash = fnv1a64(rows.iter().flat_map(|r| r.bytes()));

        Self {
            width: grid.width(),
            height: grid.height(),
            rows,
            overlays,
            specials,
            board_hash,
            mode: BoardMode::Pause,
            phase: CascadePhase::Idle,
            streak: 1,
            score: 0,
            moves_remaining: None,
        }
    }

    /// ASCII view with the top row first
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in self.rows.iter().rev() {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    pub fn is_settled(&self) -> bool {
        self.phase == CascadePhase::Idle
    }
}

fn cell_char(grid: &Grid, at: Coord) -> char {
    if grid.is_blank(at) {
        '#'
    } else if let Some(color) = grid.color_at(at) {
        color.as_char()
    } else if grid.has_ice(at) {
        '~'
    } else {
        '.'
    }
}
