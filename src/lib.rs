//! Battle City - A top-down tank arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, AI, game state)
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Player preferences (particle budget)

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Game configuration constants
///
/// Every timer is a tick count. The game advances exactly one tick per
/// rendered frame (60 Hz), with no delta-time scaling.
pub mod consts {
    /// Ticks per second the balance values below were tuned for
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Grid dimensions
    pub const TILE_SIZE: f32 = 32.0;
    pub const GRID_WIDTH: usize = 26;
    pub const GRID_HEIGHT: usize = 20;
    pub const FIELD_WIDTH: f32 = GRID_WIDTH as f32 * TILE_SIZE;
    pub const FIELD_HEIGHT: f32 = GRID_HEIGHT as f32 * TILE_SIZE;
    /// Subtracted from a rect's far edge before converting to tile indices
    pub const EDGE_EPSILON: f32 = 0.1;
    /// Off-axis distance from a tile centerline that snaps on a turn
    pub const TURN_SNAP: f32 = 10.0;
    /// Bosses stop chasing on an axis once within this distance
    pub const CHASE_DEADZONE: f32 = 10.0;

    /// Tanks
    pub const TANK_SIZE: f32 = 28.0;
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const PLAYER_MAX_HP: f32 = 3.0;
    pub const ENEMY_SPEED: f32 = 0.375;
    pub const SHOOT_COOLDOWN: u32 = 30;
    pub const ENEMY_SHOOT_COOLDOWN: u32 = SHOOT_COOLDOWN * 2;
    /// Per-tick chance a patrolling enemy picks a new heading
    pub const ENEMY_TURN_CHANCE: f32 = 0.02;
    /// Per-tick chance a ready enemy fires
    pub const ENEMY_FIRE_CHANCE: f32 = 0.03;

    /// Bullets
    pub const BULLET_SIZE: f32 = 4.0;
    pub const PLAYER_BULLET_SPEED: f32 = 3.75;
    pub const ENEMY_BULLET_SPEED: f32 = 3.25;

    /// Level 1 spawning
    pub const ENEMY_QUOTA: u32 = 20;
    pub const SPAWN_INTERVAL: u32 = 180;
    pub const MAX_ACTIVE_ENEMIES: usize = 4;

    /// Scoring
    pub const ENEMY_SCORE: u32 = 1;
    pub const BOSS_SCORE: u32 = 20;

    /// Juggernaut (level 2)
    pub const BOSS_SIZE: f32 = 48.0;
    pub const BOSS_HP: f32 = 30.0;
    pub const BOSS_SPEED: f32 = 0.45;
    pub const BOSS_SHOOT_COOLDOWN: u32 = 80;
    pub const BOSS_BULLET_SPEED: f32 = PLAYER_SPEED;
    pub const BOSS_AWAKEN_DURATION: u32 = 180;
    pub const BOSS_DEFENSE_BUFF_DURATION: u32 = 600;
    pub const BOSS_BUFFED_DAMAGE: f32 = 0.5;
    pub const BOSS_RAGE_SPEED_MULT: f32 = 3.0;
    pub const BOSS_DASH_MIN: f32 = 20.0;
    pub const BOSS_DASH_MAX: f32 = 50.0;
    pub const GLASSCANNON_COOLDOWN: u32 = 12 * TICKS_PER_SECOND;
    pub const GLASSCANNON_SIZE: f32 = BULLET_SIZE * 3.0;
    pub const GLASSCANNON_SPEED_FACTOR: f32 = 0.5;
    /// Bullet clashes needed to trigger the retaliation burst
    pub const CLASH_TRIGGER: u32 = 3;
    pub const CLASH_BURST_BULLETS: usize = 10;
    pub const CLASH_BURST_COOLDOWN: u32 = 240;

    /// Sally (level 3)
    pub const SALLY_SIZE: f32 = TANK_SIZE * 3.5;
    pub const SALLY_HP: f32 = 30.0;
    pub const SALLY_SPEED: f32 = 0.5;
    pub const SALLY_LASER_COOLDOWN: u32 = 180;
    pub const SALLY_PRE_CHARGE: u32 = 6;
    pub const SALLY_CHARGE: u32 = 78;
    pub const SALLY_LASER_DURATION: u32 = 30;
    pub const SALLY_LASER_WIDTH: f32 = 16.0;
    /// The beam deals damage on ticks where the firing timer is a multiple of this
    pub const SALLY_LASER_DAMAGE_INTERVAL: u32 = 10;
    pub const SALLY_LASER_TRACE_DURATION: u32 = 120;
    pub const SALLY_SHOTGUN_BURSTS: u32 = 3;
    pub const SALLY_SHOTGUN_BURST_DELAY: u32 = 12;
    pub const SALLY_SHOTGUN_BULLET_COUNT: usize = 15;
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Velocity of magnitude `speed` along `angle`
#[inline]
pub fn velocity_at(angle: f32, speed: f32) -> Vec2 {
    Vec2::from_angle(angle) * speed
}

/// Seeded RNG used to drive a run
pub fn new_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
