//! Player input resolution: movement, axis snapping, shooting, healing

use glam::Vec2;
use rand::Rng;

use super::collision::map_blocks;
use super::state::{Direction, GameEvent, GameState, Motion, Owner, Particle, ParticleKind};
use super::tick::reveal_fog;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
///
/// Produced by the input collaborator from its key-state; edge detection
/// (e.g. "heal just pressed") happens there, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Movement keys currently held, oldest first. The last one wins.
    pub moves: Vec<Direction>,
    /// Fire held
    pub fire: bool,
    /// Heal pressed this tick
    pub heal: bool,
}

impl TickInput {
    /// Holding a single direction
    pub fn moving(direction: Direction) -> Self {
        Self {
            moves: vec![direction],
            ..Default::default()
        }
    }

    /// Direction that drives the player this tick
    pub fn direction(&self) -> Option<Direction> {
        self.moves.last().copied()
    }
}

/// Snap `pos` onto the tile centerline crossing the new axis of travel, when close enough
fn snap_to_lane(pos: Vec2, size: f32, direction: Direction) -> Vec2 {
    let center = pos + Vec2::splat(size / 2.0);
    let snap = |c: f32| {
        let lane = (c / TILE_SIZE).floor() * TILE_SIZE + TILE_SIZE / 2.0;
        if (c - lane).abs() < TURN_SNAP { Some(lane - size / 2.0) } else { None }
    };
    let mut out = pos;
    if direction.is_vertical() {
        if let Some(x) = snap(center.x) {
            out.x = x;
        }
    } else if let Some(y) = snap(center.y) {
        out.y = y;
    }
    out
}

/// Move, shoot, and heal the player for this tick
pub(crate) fn update_player(state: &mut GameState, input: &TickInput, rng: &mut impl Rng) {
    if state.player.dead {
        return;
    }

    if let Some(direction) = input.direction() {
        let player = &mut state.player;
        if player.direction != direction {
            player.pos = snap_to_lane(player.pos, player.size, direction);
            player.direction = direction;
        }

        let next = player.rect().offset(direction.unit() * player.speed);
        if !map_blocks(&state.grid, &next) {
            player.pos = Vec2::new(next.x, next.y);
            reveal_fog(state, rng);
        }
    }

    if state.player.cooldown > 0 {
        state.player.cooldown -= 1;
    }
    if input.fire && state.player.cooldown == 0 {
        let motion = Motion::Cardinal {
            direction: state.player.direction,
            speed: PLAYER_BULLET_SPEED,
        };
        state.fire_from(state.player.center(), motion, Owner::Player);
        state.player.cooldown = SHOOT_COOLDOWN;
    }

    if input.heal {
        use_heal(state);
    }
}

/// Spend one heal charge on the player, if allowed
fn use_heal(state: &mut GameState) {
    if !state.heal.unlocked || state.heal.charges == 0 {
        return;
    }
    if !state.player.heal(1.0) {
        return;
    }
    state.heal.charges -= 1;
    let pos = state.player.pos;
    state.emit(Particle::new(ParticleKind::Heal, pos, 20));
    state.push_event(GameEvent::HealUsed {
        charges_left: state.heal.charges,
    });
    log::debug!("Heal used, {} charges left", state.heal.charges);
}
