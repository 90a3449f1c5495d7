//! Basic enemy: patrol, turn at random or on contact, fire at random

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::collision::{map_blocks, rects_overlap};
use crate::sim::state::{Direction, GameState, Motion, Owner, Tank};

pub(super) fn update(tank: &mut Tank, index: usize, state: &mut GameState, rng: &mut impl Rng) {
    let next = tank.rect().offset(tank.direction.unit() * tank.speed);

    let collided = map_blocks(&state.grid, &next)
        || state
            .enemies
            .iter()
            .enumerate()
            .any(|(j, other)| j != index && !other.dead && rects_overlap(&next, &other.rect()))
        || (!state.player.dead && rects_overlap(&next, &state.player.rect()));

    if collided || rng.random::<f32>() < ENEMY_TURN_CHANCE {
        tank.direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
    } else {
        tank.pos = Vec2::new(next.x, next.y);
    }

    if tank.cooldown > 0 {
        tank.cooldown -= 1;
    } else if rng.random::<f32>() < ENEMY_FIRE_CHANCE {
        let motion = Motion::Cardinal {
            direction: tank.direction,
            speed: ENEMY_BULLET_SPEED,
        };
        state.fire_from(tank.center(), motion, Owner::Enemy);
        tank.cooldown = ENEMY_SHOOT_COOLDOWN;
    }
}
