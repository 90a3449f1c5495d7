//! Collision queries against rectangles, the tile grid, and beams
//!
//! Everything here is discrete: callers propose a displacement and ask whether
//! the resulting rectangle is legal. There is no sweeping or penetration
//! resolution.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, TileType};
use super::state::Tank;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, TILE_SIZE};

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Same size, moved by `delta`
    #[inline]
    pub fn offset(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Standard AABB overlap test (touching edges do not overlap)
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// True if `rect` touches any impassable tile or leaves the grid
pub fn map_blocks(grid: &Grid, rect: &Rect) -> bool {
    let (sx, ex, sy, ey) = Grid::tile_span(rect);
    for y in sy..=ey {
        for x in sx..=ex {
            match grid.get(x, y) {
                Some(tile) if !tile.blocks_movement() => {}
                // Outside the grid counts as a wall
                _ => return true,
            }
        }
    }
    false
}

/// What a bullet's center struck this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapHit {
    Miss,
    /// Brick or steel at (x, y)
    Wall { x: i32, y: i32 },
    /// The home base at (x, y)
    Base { x: i32, y: i32 },
    /// Center left the playfield
    Boundary,
}

impl MapHit {
    pub fn is_hit(self) -> bool {
        self != MapHit::Miss
    }
}

/// Sample the single tile under a bullet's center
pub fn bullet_hits_map(grid: &Grid, center: Vec2) -> MapHit {
    let x = (center.x / TILE_SIZE).floor() as i32;
    let y = (center.y / TILE_SIZE).floor() as i32;

    match grid.get(x, y) {
        Some(tile) if tile.is_wall() => MapHit::Wall { x, y },
        Some(TileType::Base) => MapHit::Base { x, y },
        Some(_) => MapHit::Miss,
        None => {
            if center.x < 0.0 || center.x > FIELD_WIDTH || center.y < 0.0 || center.y > FIELD_HEIGHT {
                MapHit::Boundary
            } else {
                MapHit::Miss
            }
        }
    }
}

/// Distance from `point` to the ray starting at `origin` heading along `angle`
///
/// Points behind the origin measure to the origin itself.
pub fn distance_to_ray(origin: Vec2, angle: f32, point: Vec2) -> f32 {
    let dir = Vec2::from_angle(angle);
    let t = (point - origin).dot(dir).max(0.0);
    (point - (origin + dir * t)).length()
}

/// Whether a beam fired from `origin`'s center along `angle` touches `target`
///
/// The target is treated as a circle inscribed in its bounding box.
pub fn resolve_laser_hit(origin: &Tank, angle: f32, target: &Tank, beam_width: f32) -> bool {
    let target_radius = target.size / 2.0;
    distance_to_ray(origin.center(), angle, target.center()) < beam_width / 2.0 + target_radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Tank;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Shared edge is not an overlap
        assert!(!rects_overlap(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!rects_overlap(&a, &Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_map_blocks_walls_and_bounds() {
        let grid = Grid::from_rows(3, 3, &["...", ".#.", "..%"]);
        // Fully inside tile (0, 0)
        assert!(!map_blocks(&grid, &Rect::new(2.0, 2.0, 28.0, 28.0)));
        // Pokes into the brick
        assert!(map_blocks(&grid, &Rect::new(8.0, 8.0, 28.0, 28.0)));
        // Fog is passable
        assert!(!map_blocks(&grid, &Rect::new(66.0, 66.0, 28.0, 28.0)));
        // Off the left edge
        assert!(map_blocks(&grid, &Rect::new(-1.0, 2.0, 28.0, 28.0)));
        // Off the bottom
        assert!(map_blocks(&grid, &Rect::new(66.0, 70.0, 28.0, 28.0)));
    }

    #[test]
    fn test_map_blocks_exact_tile_boundary() {
        let grid = Grid::from_rows(2, 1, &[".#"]);
        // Right edge exactly on the brick's left edge: epsilon keeps it in tile 0
        assert!(!map_blocks(&grid, &Rect::new(0.0, 0.0, 32.0, 32.0)));
        assert!(map_blocks(&grid, &Rect::new(0.5, 0.0, 32.0, 32.0)));
    }

    #[test]
    fn test_bullet_hits_map() {
        let grid = Grid::from_rows(3, 1, &[".#B"]);
        assert_eq!(bullet_hits_map(&grid, Vec2::new(16.0, 16.0)), MapHit::Miss);
        assert_eq!(bullet_hits_map(&grid, Vec2::new(40.0, 16.0)), MapHit::Wall { x: 1, y: 0 });
        assert_eq!(bullet_hits_map(&grid, Vec2::new(70.0, 16.0)), MapHit::Base { x: 2, y: 0 });
        assert_eq!(bullet_hits_map(&grid, Vec2::new(-1.0, 16.0)), MapHit::Boundary);
        assert_eq!(bullet_hits_map(&grid, Vec2::new(16.0, -0.5)), MapHit::Boundary);
    }

    #[test]
    fn test_laser_hit() {
        let boss = Tank::at(Vec2::new(0.0, 0.0), 98.0);
        let mut player = Tank::at(Vec2::new(300.0, 35.0), 28.0);
        // Boss center (49, 49), player center (314, 49): straight along +x
        assert!(resolve_laser_hit(&boss, 0.0, &player, 16.0));
        // Behind the beam
        assert!(!resolve_laser_hit(&boss, PI, &player, 16.0));
        // Perpendicular
        assert!(!resolve_laser_hit(&boss, FRAC_PI_2, &player, 16.0));

        // Offset 21 from the beam line: threshold is 8 + 14 = 22
        player.pos.y = 35.0 + 21.0;
        assert!(resolve_laser_hit(&boss, 0.0, &player, 16.0));
        player.pos.y = 35.0 + 23.0;
        assert!(!resolve_laser_hit(&boss, 0.0, &player, 16.0));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            aw in 1.0f32..50.0, bw in 1.0f32..50.0,
        ) {
            let a = Rect::new(ax, ay, aw, aw);
            let b = Rect::new(bx, by, bw, bw);
            prop_assert_eq!(rects_overlap(&a, &b), rects_overlap(&b, &a));
        }

        #[test]
        fn ray_distance_never_exceeds_origin_distance(
            px in -500.0f32..500.0, py in -500.0f32..500.0, angle in -PI..PI,
        ) {
            let point = Vec2::new(px, py);
            let d = distance_to_ray(Vec2::ZERO, angle, point);
            prop_assert!(d <= point.length() + 1e-3);
        }
    }
}
