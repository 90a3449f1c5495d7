//! Enemy and boss state machines
//!
//! Each archetype gets its own module. Tanks are updated one at a time in
//! list order: the tank being updated is taken out of the list, mutated
//! alongside the rest of the state, and put back.

mod enemy;
mod juggernaut;
mod sally;

use glam::Vec2;
use rand::Rng;

pub use juggernaut::clash_retaliation;

use super::collision::map_blocks;
use super::grid::Grid;
use super::state::{Direction, GameState, Tank, TankKind};
use crate::consts::CHASE_DEADZONE;

/// Run one AI step for every enemy and boss
pub(crate) fn update_enemies(state: &mut GameState, rng: &mut impl Rng) {
    for i in 0..state.enemies.len() {
        if state.enemies[i].dead {
            continue;
        }
        let mut tank = state.enemies[i].clone();
        match tank.kind {
            TankKind::Enemy => enemy::update(&mut tank, i, state, rng),
            TankKind::Juggernaut(_) => juggernaut::update(&mut tank, state, rng),
            TankKind::Sally(_) => sally::update(&mut tank, state, rng),
            TankKind::Player => {}
        }
        state.enemies[i] = tank;
    }
}

/// Approach `target` one axis at a time, each axis blocked independently
///
/// The axis with the larger gap goes first. Not normalized: when both axes
/// are off, the tank moves diagonally at `speed` per axis.
pub(crate) fn chase(tank: &mut Tank, target: Vec2, grid: &Grid) {
    if tank.speed == 0.0 {
        return;
    }
    let gap = target - tank.center();
    let axes = if gap.y.abs() > gap.x.abs() {
        [Vec2::Y, Vec2::X]
    } else {
        [Vec2::X, Vec2::Y]
    };

    for axis in axes {
        let along = gap.dot(axis);
        if along.abs() <= CHASE_DEADZONE {
            continue;
        }
        let step = axis * tank.speed.copysign(along);
        if !map_blocks(grid, &tank.rect().offset(step)) {
            tank.pos += step;
            tank.direction = Direction::dominant(step);
        }
    }
}

/// Move along `vel`, trying x then y so walls only cancel the blocked axis
pub(crate) fn slide(tank: &mut Tank, vel: Vec2, grid: &Grid) {
    if !map_blocks(grid, &tank.rect().offset(Vec2::new(vel.x, 0.0))) {
        tank.pos.x += vel.x;
    }
    if !map_blocks(grid, &tank.rect().offset(Vec2::new(0.0, vel.y))) {
        tank.pos.y += vel.y;
    }
}
