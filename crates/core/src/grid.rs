//! Grid module - the board's cell store
//!
//! Every cell carries three independent layers:
//!
//! - `active`: the resident tile, if any
//! - `overlay`: an obstacle (breakable / lock / ice) with its own hit points
//! - `blank`: an immutable mask; blank cells never hold tiles
//!
//! Tiles live in a generational arena. A cell stores only a [`TileId`]; the tile's
//! self-reported position is written by the same `Grid` method that moves the id,
//! so the two can never drift apart.
//!
//! Storage is flat and row-major (`row * width + col`), row 0 at the bottom.

use crate::level::{LayoutEntry, LevelError};
use crate::types::{
    Axis, Coord, LayoutKind, ObstacleKind, Special, TileColor, DEFAULT_OBSTACLE_HIT_POINTS,
    MAX_BOARD_DIM,
};

/// Handle to a tile in the grid's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    slot: u32,
    generation: u32,
}

/// A game piece resident on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    color: TileColor,
    pos: Coord,
    matched: bool,
    other_dot: Option<TileId>,
    special: Option<Special>,
}

impl Tile {
    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn color(&self) -> TileColor {
        self.color
    }

    /// Self-reported (column, row); always equals the tile's cell
    pub fn pos(&self) -> Coord {
        self.pos
    }

    pub fn column(&self) -> i8 {
        self.pos.col
    }

    pub fn row(&self) -> i8 {
        self.pos.row
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Most recent swap partner
    pub fn other_dot(&self) -> Option<TileId> {
        self.other_dot
    }

    pub fn special(&self) -> Option<Special> {
        self.special
    }
}

/// Obstacle overlay with a hit-point counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    kind: ObstacleKind,
    hit_points: i32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, hit_points: i32) -> Self {
        Self { kind, hit_points }
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn is_destroyed(&self) -> bool {
        self.hit_points <= 0
    }

    fn take_damage(&mut self, damage: i32) {
        self.hit_points -= damage.max(0);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    generation: u32,
    tile: Option<Tile>,
}

/// The grid store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    cells: Vec<Option<TileId>>,
    overlays: Vec<Option<Obstacle>>,
    blank: Vec<bool>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Grid {
    /// Create an empty grid with no blanks or overlays
    pub fn new(width: u8, height: u8) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![None; size],
            overlays: vec![None; size],
            blank: vec![false; size],
            slots: Vec::with_capacity(size),
            free: Vec::new(),
        }
    }

    /// Build the blank mask and overlays from a layout; no tiles are placed
    ///
    /// Blanks are applied first. Overlays on blank cells or with no hit points left
    /// are dropped, and a later overlay entry for the same cell replaces an earlier one.
    pub fn from_layout<'a>(
        width: u8,
        height: u8,
        layout: impl IntoIterator<Item = &'a LayoutEntry>,
    ) -> Self {
        let mut grid = Self::new(width, height);
        let (w, h) = (width as i32, height as i32);
        let entries: Vec<&LayoutEntry> = layout
            .into_iter()
            .filter(|e| e.x >= 0 && e.y >= 0 && e.x < w && e.y < h)
            .collect();

        for entry in entries.iter().filter(|e| e.kind == LayoutKind::Blank) {
            if let Some(idx) = grid.index(Coord::new(entry.x as i8, entry.y as i8)) {
                grid.blank[idx] = true;
            }
        }

        for entry in &entries {
            let Some(kind) = entry.kind.obstacle() else {
                continue;
            };
            let at = Coord::new(entry.x as i8, entry.y as i8);
            let overlay = Obstacle::new(kind, entry.obstacle_hit_points());
            if !grid.is_blank(at) && !overlay.is_destroyed() {
                grid.set_overlay(at, Some(overlay));
            }
        }

        grid
    }

    /// Build a fixture grid from text rows, row 0 (bottom) first
    ///
    /// - `'A'..='Z'`: a tile of that color
    /// - `'.'`: an empty, fillable cell
    /// - `'#'`: a blank cell
    /// - `'~'`: an ice cell (1 hit point)
    pub fn from_rows(rows: &[&str]) -> Result<Self, LevelError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0
            || height == 0
            || width > MAX_BOARD_DIM as usize
            || height > MAX_BOARD_DIM as usize
        {
            return Err(LevelError::BadDimensions {
                width: width.min(u8::MAX as usize) as u8,
                height: height.min(u8::MAX as usize) as u8,
            });
        }
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(LevelError::RaggedRows);
        }

        let mut grid = Self::new(width as u8, height as u8);
        for (row, text) in rows.iter().enumerate() {
            for (col, c) in text.chars().enumerate() {
                let at = Coord::new(col as i8, row as i8);
                match c {
                    '.' => {}
                    '#' => {
                        if let Some(idx) = grid.index(at) {
                            grid.blank[idx] = true;
                        }
                    }
                    '~' => grid.set_overlay(
                        at,
                        Some(Obstacle::new(ObstacleKind::Ice, DEFAULT_OBSTACLE_HIT_POINTS)),
                    ),
                    c if c.is_ascii_uppercase() => {
                        let color = TileColor::from_char(c).ok_or(LevelError::UnknownCell(c))?;
                        grid.spawn(at, color);
                    }
                    other => return Err(LevelError::UnknownCell(other)),
                }
            }
        }
        Ok(grid)
    }

    /// Calculate flat index from coordinates
    #[inline(always)]
    fn index(&self, at: Coord) -> Option<usize> {
        if !self.in_bounds(at) {
            return None;
        }
        Some(at.row as usize * self.width as usize + at.col as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn in_bounds(&self, at: Coord) -> bool {
        at.col >= 0 && at.row >= 0 && (at.col as u8) < self.width && (at.row as u8) < self.height
    }

    /// All coordinates in column-major order (column 0 bottom to top, then column 1, ...)
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (w, h) = (self.width as i8, self.height as i8);
        (0..w).flat_map(move |col| (0..h).map(move |row| Coord::new(col, row)))
    }

    pub fn is_blank(&self, at: Coord) -> bool {
        self.index(at).map(|i| self.blank[i]).unwrap_or(false)
    }

    pub fn overlay(&self, at: Coord) -> Option<Obstacle> {
        self.index(at).and_then(|i| self.overlays[i])
    }

    pub fn set_overlay(&mut self, at: Coord, overlay: Option<Obstacle>) {
        if let Some(i) = self.index(at) {
            self.overlays[i] = overlay;
        }
    }

    fn overlay_is(&self, at: Coord, kind: ObstacleKind) -> bool {
        self.overlay(at).map(|o| o.kind == kind).unwrap_or(false)
    }

    pub fn has_ice(&self, at: Coord) -> bool {
        self.overlay_is(at, ObstacleKind::Ice)
    }

    pub fn is_locked(&self, at: Coord) -> bool {
        self.overlay_is(at, ObstacleKind::Lock)
    }

    /// Whether a tile may live in this cell (in bounds, not blank, not iced)
    pub fn is_fillable(&self, at: Coord) -> bool {
        self.in_bounds(at) && !self.is_blank(at) && !self.has_ice(at)
    }

    pub fn tile_id_at(&self, at: Coord) -> Option<TileId> {
        self.index(at).and_then(|i| self.cells[i])
    }

    pub fn tile_at(&self, at: Coord) -> Option<&Tile> {
        self.tile_id_at(at).and_then(|id| self.tile(id))
    }

    pub fn color_at(&self, at: Coord) -> Option<TileColor> {
        self.tile_at(at).map(|t| t.color)
    }

    pub fn is_occupied(&self, at: Coord) -> bool {
        self.tile_id_at(at).is_some()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.slots
            .get(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.tile.as_ref())
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.tile.as_mut())
    }

    /// Create a tile in an empty, fillable cell
    pub fn spawn(&mut self, at: Coord, color: TileColor) -> Option<TileId> {
        if !self.is_fillable(at) || self.is_occupied(at) {
            return None;
        }
        let idx = self.index(at)?;

        let id = match self.free.pop() {
            Some(slot) => TileId {
                slot,
                generation: self.slots[slot as usize].generation,
            },
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    tile: None,
                });
                TileId {
                    slot: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };

        self.slots[id.slot as usize].tile = Some(Tile {
            id,
            color,
            pos: at,
            matched: false,
            other_dot: None,
            special: None,
        });
        self.cells[idx] = Some(id);
        Some(id)
    }

    /// Remove the tile in a cell, ending its lifetime
    pub fn remove(&mut self, at: Coord) -> Option<Tile> {
        let idx = self.index(at)?;
        let id = self.cells[idx].take()?;
        let slot = &mut self.slots[id.slot as usize];
        let tile = slot.tile.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);
        tile
    }

    /// Exchange the tiles of two cells; both must be occupied
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        let (Some(id_a), Some(id_b)) = (self.cells[ia], self.cells[ib]) else {
            return false;
        };

        self.cells.swap(ia, ib);
        if let Some(t) = self.tile_mut(id_a) {
            t.pos = b;
        }
        if let Some(t) = self.tile_mut(id_b) {
            t.pos = a;
        }
        true
    }

    /// Move a tile into an empty, fillable cell
    pub fn relocate(&mut self, from: Coord, to: Coord) -> bool {
        if !self.is_fillable(to) || self.is_occupied(to) {
            return false;
        }
        let Some(id) = self.detach(from) else {
            return false;
        };
        self.place(id, to)
    }

    /// Lift a tile out of its cell while keeping it alive (used by reshuffle)
    pub fn detach(&mut self, at: Coord) -> Option<TileId> {
        let idx = self.index(at)?;
        self.cells[idx].take()
    }

    /// Put a detached tile into an empty, fillable cell
    pub fn place(&mut self, id: TileId, at: Coord) -> bool {
        if self.tile(id).is_none() || !self.is_fillable(at) || self.is_occupied(at) {
            return false;
        }
        let Some(idx) = self.index(at) else {
            return false;
        };
        self.cells[idx] = Some(id);
        if let Some(t) = self.tile_mut(id) {
            t.pos = at;
        }
        true
    }

    pub fn set_matched(&mut self, id: TileId, matched: bool) -> bool {
        match self.tile_mut(id) {
            Some(t) => {
                t.matched = matched;
                true
            }
            None => false,
        }
    }

    pub fn clear_matched(&mut self) {
        for slot in &mut self.slots {
            if let Some(t) = slot.tile.as_mut() {
                t.matched = false;
            }
        }
    }

    pub fn set_other_dot(&mut self, id: TileId, other: Option<TileId>) {
        if let Some(t) = self.tile_mut(id) {
            t.other_dot = other;
        }
    }

    /// Upgrade a tile into a special piece; it stops counting as matched
    pub fn upgrade(&mut self, id: TileId, special: Special) -> bool {
        match self.tile_mut(id) {
            Some(t) => {
                t.special = Some(special);
                t.matched = false;
                true
            }
            None => false,
        }
    }

    pub fn become_line_clear(&mut self, id: TileId, axis: Axis) -> bool {
        self.upgrade(id, Special::LineClear(axis))
    }

    pub fn become_wrapped(&mut self, id: TileId) -> bool {
        self.upgrade(id, Special::Wrapped)
    }

    pub fn become_color_bomb(&mut self, id: TileId) -> bool {
        self.upgrade(id, Special::ColorBomb)
    }

    /// Damage an overlay of the given kind; returns true if it was cleared
    ///
    /// Cells without an overlay, or with an overlay of another kind, are untouched.
    pub fn damage_overlay(&mut self, at: Coord, kind: ObstacleKind, damage: i32) -> bool {
        let Some(idx) = self.index(at) else {
            return false;
        };
        let Some(overlay) = self.overlays[idx].as_mut() else {
            return false;
        };
        if overlay.kind != kind {
            return false;
        }
        overlay.take_damage(damage);
        if overlay.is_destroyed() {
            self.overlays[idx] = None;
            return true;
        }
        false
    }

    /// Resident tiles in column-major cell order
    pub fn resident_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.coords().filter_map(move |at| self.tile_at(at))
    }

    pub fn resident_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of cells that can hold a tile right now
    pub fn fillable_count(&self) -> usize {
        self.coords().filter(|&at| self.is_fillable(at)).count()
    }

    /// Every resident tile reports the cell it is stored in
    pub fn positions_consistent(&self) -> bool {
        self.coords().all(|at| match self.tile_at(at) {
            Some(t) => t.pos == at && !self.is_blank(at),
            None => self.tile_id_at(at).is_none(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(col: i8, row: i8) -> Coord {
        Coord::new(col, row)
    }

    fn color(ch: char) -> TileColor {
        TileColor::from_char(ch).unwrap()
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.index(c(0, 0)), Some(0));
        assert_eq!(grid.index(c(3, 0)), Some(3));
        assert_eq!(grid.index(c(0, 1)), Some(4));
        assert_eq!(grid.index(c(3, 2)), Some(11));
        assert_eq!(grid.index(c(-1, 0)), None);
        assert_eq!(grid.index(c(4, 0)), None);
        assert_eq!(grid.index(c(0, 3)), None);
    }

    #[test]
    fn test_coords_are_column_major() {
        let grid = Grid::new(2, 2);
        let order: Vec<Coord> = grid.coords().collect();
        assert_eq!(order, vec![c(0, 0), c(0, 1), c(1, 0), c(1, 1)]);
    }

    #[test]
    fn test_spawn_respects_blank_and_ice() {
        let mut grid = Grid::from_rows(&["#~."]).unwrap();
        assert!(grid.spawn(c(0, 0), color('A')).is_none());
        assert!(grid.spawn(c(1, 0), color('A')).is_none());
        assert!(grid.spawn(c(2, 0), color('A')).is_some());
        // Occupied now
        assert!(grid.spawn(c(2, 0), color('B')).is_none());
    }

    #[test]
    fn test_swap_updates_positions() {
        let mut grid = Grid::from_rows(&["AB"]).unwrap();
        let a = grid.tile_id_at(c(0, 0)).unwrap();
        assert!(grid.swap(c(0, 0), c(1, 0)));
        assert_eq!(grid.tile(a).unwrap().pos(), c(1, 0));
        assert_eq!(grid.color_at(c(0, 0)), Some(color('B')));
        assert!(grid.positions_consistent());
    }

    #[test]
    fn test_swap_with_empty_is_noop() {
        let mut grid = Grid::from_rows(&["A."]).unwrap();
        let before = grid.clone();
        assert!(!grid.swap(c(0, 0), c(1, 0)));
        assert!(!grid.swap(c(0, 0), c(5, 0)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_removed_ids_go_stale() {
        let mut grid = Grid::from_rows(&["A."]).unwrap();
        let old = grid.tile_id_at(c(0, 0)).unwrap();
        assert!(grid.remove(c(0, 0)).is_some());
        assert!(grid.tile(old).is_none());

        // Slot is reused with a new generation.
        let new = grid.spawn(c(1, 0), color('B')).unwrap();
        assert_ne!(old, new);
        assert!(grid.tile(old).is_none());
        assert_eq!(grid.tile(new).unwrap().color(), color('B'));
    }

    #[test]
    fn test_relocate_keeps_identity() {
        let mut grid = Grid::from_rows(&[".", "A"]).unwrap();
        let id = grid.tile_id_at(c(0, 1)).unwrap();
        assert!(grid.relocate(c(0, 1), c(0, 0)));
        assert_eq!(grid.tile_id_at(c(0, 0)), Some(id));
        assert_eq!(grid.tile(id).unwrap().row(), 0);
        assert!(grid.tile_at(c(0, 1)).is_none());
    }

    #[test]
    fn test_damage_overlay_only_hits_matching_kind() {
        let mut grid = Grid::new(2, 1);
        grid.set_overlay(c(0, 0), Some(Obstacle::new(ObstacleKind::Lock, 2)));
        assert!(!grid.damage_overlay(c(0, 0), ObstacleKind::Ice, 1));
        assert_eq!(grid.overlay(c(0, 0)).unwrap().hit_points(), 2);
        assert!(!grid.damage_overlay(c(0, 0), ObstacleKind::Lock, 1));
        assert!(grid.damage_overlay(c(0, 0), ObstacleKind::Lock, 1));
        assert!(grid.overlay(c(0, 0)).is_none());
        // No overlay: safe no-op
        assert!(!grid.damage_overlay(c(1, 0), ObstacleKind::Lock, 1));
    }

    #[test]
    fn test_upgrade_clears_matched() {
        let mut grid = Grid::from_rows(&["A"]).unwrap();
        let id = grid.tile_id_at(c(0, 0)).unwrap();
        grid.set_matched(id, true);
        assert!(grid.become_wrapped(id));
        let tile = grid.tile(id).unwrap();
        assert!(!tile.is_matched());
        assert_eq!(tile.special(), Some(Special::Wrapped));
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert_eq!(Grid::from_rows(&["AB", "A"]), Err(LevelError::RaggedRows));
        assert_eq!(Grid::from_rows(&["A?"]), Err(LevelError::UnknownCell('?')));
        assert!(Grid::from_rows(&[]).is_err());
    }
}
