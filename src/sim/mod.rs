//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame, timers in ticks)
//! - Seeded RNG only, passed into every tick
//! - Stable iteration order (list order, never hash order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod grid;
pub mod input;
pub mod levels;
pub mod state;
pub mod tick;

pub use collision::{MapHit, Rect, bullet_hits_map, map_blocks, rects_overlap, resolve_laser_hit};
pub use grid::{Grid, TileType};
pub use input::TickInput;
pub use levels::{Level, LevelGoal};
pub use state::{
    BossHud, BossIntro, Bullet, BulletVariant, Direction, GameEvent, GamePhase, GameState,
    HealSupply, Juggernaut, Motion, Owner, Particle, ParticleKind, SallyAttack, Snapshot, Tank,
    TankKind, MAX_PARTICLES,
};
pub use tick::tick;
