//! Compiled-in level layouts
//!
//! Layout characters: `.` empty, `#` brick, `@` steel, `~` water, `"` grass,
//! `B` base, `%` fog.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, TileType};
use super::state::{Juggernaut, SallyAttack, TankKind};
use crate::consts::*;

/// Level 1: defend the base against a quota of basic enemies
const FORTRESS: [&str; GRID_HEIGHT] = [
    "..........................",
    "..........................",
    ".#.#.#.#.#.#..#.#.#.#.#.#.",
    ".#.#.#.#.@.#..#.@.#.#.#.#.",
    ".#.#.#.#.#.#..#.#.#.#.#.#.",
    "..........................",
    "..........................",
    "..........................",
    ".#.#.#.#.#.#..#.#.#.#.#.#.",
    ".#.#.#.#.#.#..#.#.#.#.#.#.",
    ".#.#.#@#.#.#..#.#.#@#.#.#.",
    ".#.#.#.#.#.#..#.#.#.#.#.#.",
    ".#.#.....#.#..#.#.....#.#.",
    ".....~~~.........~~~......",
    ".#.#.....#.#..#.#.....#.#.",
    ".#.#.#@#.#.#..#.#.#@#.#.#.",
    ".#.#.#.#.#.#..#.#.#.#.#.#.",
    ".#.#.#.#.#.#..#.#.#.#.#.#.",
    "............###...........",
    "............#B#...........",
];

/// Rows left clear of fog at the bottom of the boss arenas
const CLEAR_ROWS: usize = 2;

/// How a level is won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelGoal {
    /// Destroy the whole spawn quota
    ClearQuota,
    /// Destroy the level's single boss
    DefeatBoss,
}

/// Level selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    /// Level 1: base defense
    Fortress,
    /// Level 2: Juggernaut arena
    Juggernaut,
    /// Level 3: Sally arena
    Sally,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Fortress, Level::Juggernaut, Level::Sally];

    /// 1-based level number, clamped to the nearest valid level
    pub fn from_number(number: u32) -> Self {
        let index = (number.max(1) as usize - 1).min(Self::ALL.len() - 1);
        if index + 1 != number as usize {
            log::warn!("Level {} out of range, using level {}", number, index + 1);
        }
        Self::ALL[index]
    }

    pub fn number(self) -> u32 {
        match self {
            Level::Fortress => 1,
            Level::Juggernaut => 2,
            Level::Sally => 3,
        }
    }

    pub fn goal(self) -> LevelGoal {
        match self {
            Level::Fortress => LevelGoal::ClearQuota,
            Level::Juggernaut | Level::Sally => LevelGoal::DefeatBoss,
        }
    }

    /// Fresh copy of the level's tile grid
    pub fn grid(self) -> Grid {
        match self {
            Level::Fortress => Grid::from_rows(GRID_WIDTH, GRID_HEIGHT, &FORTRESS),
            Level::Juggernaut => fog_arena(true),
            Level::Sally => fog_arena(false),
        }
    }

    /// Initial "enemies left" counter
    pub fn enemy_count(self) -> u32 {
        match self.goal() {
            LevelGoal::ClearQuota => ENEMY_QUOTA,
            LevelGoal::DefeatBoss => 1,
        }
    }

    /// Basic enemies the spawner will release
    pub fn spawn_quota(self) -> u32 {
        match self.goal() {
            LevelGoal::ClearQuota => ENEMY_QUOTA,
            LevelGoal::DefeatBoss => 0,
        }
    }

    /// Player start: bottom row, two columns left of center
    pub fn player_spawn(self) -> Vec2 {
        let inset = (TILE_SIZE - TANK_SIZE) / 2.0;
        Vec2::new(
            (GRID_WIDTH / 2 - 2) as f32 * TILE_SIZE + inset,
            (GRID_HEIGHT - 1) as f32 * TILE_SIZE + inset,
        )
    }

    /// Top-left corners the level 1 spawner picks from
    pub fn spawn_points(self) -> [Vec2; 3] {
        [
            Vec2::ZERO,
            Vec2::new((GRID_WIDTH / 2) as f32 * TILE_SIZE, 0.0),
            Vec2::new((GRID_WIDTH - 1) as f32 * TILE_SIZE, 0.0),
        ]
    }

    /// Boss placed at load: kind, top-left, size, speed, hp
    pub fn boss(self) -> Option<(TankKind, Vec2, f32, f32, f32)> {
        let mid = (GRID_WIDTH / 2) as f32 * TILE_SIZE;
        match self {
            Level::Fortress => None,
            Level::Juggernaut => Some((
                TankKind::Juggernaut(Juggernaut::dormant()),
                Vec2::new(mid - BOSS_SIZE / 2.0, TILE_SIZE * 2.0),
                BOSS_SIZE,
                BOSS_SPEED,
                BOSS_HP,
            )),
            Level::Sally => Some((
                // Cooldown starts empty: Sally opens with a beam
                TankKind::Sally(SallyAttack::Idle { cooldown: 0 }),
                Vec2::new(mid - SALLY_SIZE / 2.0, TILE_SIZE * 3.0),
                SALLY_SIZE,
                SALLY_SPEED,
                SALLY_HP,
            )),
        }
    }
}

/// Fog everywhere except the bottom rows; optional steel pillar pairs near the
/// top and bottom of the fog
fn fog_arena(pillars: bool) -> Grid {
    let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT);
    let fog_rows = GRID_HEIGHT - CLEAR_ROWS;
    for y in 0..fog_rows {
        for x in 0..GRID_WIDTH {
            grid.set(x as i32, y as i32, TileType::Fog);
        }
    }
    if pillars {
        for y in [2, 3, fog_rows - 2, fog_rows - 1] {
            for x in [4, 5, GRID_WIDTH - 6, GRID_WIDTH - 5] {
                grid.set(x as i32, y as i32, TileType::Steel);
            }
        }
    }
    grid
}
