//! Tile grid and destructible terrain
//!
//! The grid is created once per level load and only mutated through
//! [`Grid::damage_tile`], [`Grid::clear_fog`] and [`Grid::destroy_base`].

use serde::{Deserialize, Serialize};

use crate::consts::{EDGE_EPSILON, TILE_SIZE};
use super::collision::Rect;

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Empty,
    Brick,
    /// Two hits left
    BrickDamaged,
    /// One hit left
    BrickBroken,
    Steel,
    SteelDamaged1,
    SteelDamaged2,
    SteelDamaged3,
    Water,
    /// Drawn over tanks, never blocks
    Grass,
    Base,
    /// Hides the arena until the player steps into it
    Fog,
}

impl TileType {
    /// Whether tanks are stopped by this tile
    pub fn blocks_movement(self) -> bool {
        self.is_wall() || matches!(self, TileType::Water | TileType::Base)
    }

    /// Brick or steel in any damage state (stops bullets)
    pub fn is_wall(self) -> bool {
        matches!(
            self,
            TileType::Brick
                | TileType::BrickDamaged
                | TileType::BrickBroken
                | TileType::Steel
                | TileType::SteelDamaged1
                | TileType::SteelDamaged2
                | TileType::SteelDamaged3
        )
    }

    /// Next state in the brick decay chain; steel and everything else is unaffected
    pub fn damaged(self) -> Self {
        match self {
            TileType::Brick => TileType::BrickDamaged,
            TileType::BrickDamaged => TileType::BrickBroken,
            TileType::BrickBroken => TileType::Empty,
            other => other,
        }
    }

    /// Layout character used by the compiled-in levels
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '.' => TileType::Empty,
            '#' => TileType::Brick,
            '@' => TileType::Steel,
            '~' => TileType::Water,
            '"' => TileType::Grass,
            'B' => TileType::Base,
            '%' => TileType::Fog,
            _ => return None,
        })
    }
}

/// Fixed-size tile map, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileType>,
    /// Cleared once an opposing bullet reaches the base tile
    pub base_alive: bool,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Empty; width * height],
            base_alive: true,
        }
    }

    /// Build a grid from layout rows. Unknown characters and short rows are
    /// padded with `Empty`; extra columns and rows are dropped.
    pub fn from_rows<S: AsRef<str>>(width: usize, height: usize, rows: &[S]) -> Self {
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().take(height).enumerate() {
            for (x, c) in row.as_ref().chars().take(width).enumerate() {
                if let Some(tile) = TileType::from_char(c) {
                    grid.tiles[y * width + x] = tile;
                } else {
                    log::warn!("Unknown layout tile {:?} at ({}, {})", c, x, y);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// Tile at (x, y), or `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<TileType> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Overwrite a tile (level construction only)
    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Row-major tiles (for rendering)
    pub fn tiles(&self) -> &[TileType] {
        &self.tiles
    }

    /// Inclusive tile range covered by `rect`, unclamped
    pub fn tile_span(rect: &Rect) -> (i32, i32, i32, i32) {
        let start_x = (rect.x / TILE_SIZE).floor() as i32;
        let end_x = ((rect.x + rect.w - EDGE_EPSILON) / TILE_SIZE).floor() as i32;
        let start_y = (rect.y / TILE_SIZE).floor() as i32;
        let end_y = ((rect.y + rect.h - EDGE_EPSILON) / TILE_SIZE).floor() as i32;
        (start_x, end_x, start_y, end_y)
    }

    /// Advance a brick one step down its decay chain. Returns true if the tile changed.
    pub fn damage_tile(&mut self, x: i32, y: i32) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        let next = self.tiles[i].damaged();
        let changed = next != self.tiles[i];
        self.tiles[i] = next;
        changed
    }

    pub fn destroy_base(&mut self) {
        self.base_alive = false;
    }

    /// True if any tile under `rect` is fog
    pub fn overlaps_fog(&self, rect: &Rect) -> bool {
        let (sx, ex, sy, ey) = Self::tile_span(rect);
        (sy..=ey).any(|y| (sx..=ex).any(|x| self.get(x, y) == Some(TileType::Fog)))
    }

    /// Convert every fog tile on the map to empty, returning the cleared cells
    pub fn clear_fog(&mut self) -> Vec<(usize, usize)> {
        let width = self.width;
        let mut cleared = Vec::new();
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            if *tile == TileType::Fog {
                *tile = TileType::Empty;
                cleared.push((i % width, i / width));
            }
        }
        cleared
    }

    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }
}
