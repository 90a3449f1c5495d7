//! Sally: beam cannon boss
//!
//! Cycle: chase while the laser cools down, freeze, lock aim on the player,
//! hold the beam along that line, then finish with three shotgun bursts.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::chase;
use crate::consts::*;
use crate::sim::collision::resolve_laser_hit;
use crate::sim::combat::damage_player;
use crate::sim::state::{GameState, Motion, Owner, Particle, ParticleKind, SallyAttack, Tank, TankKind};
use crate::{angle_to, velocity_at};

/// Shotgun spread, either side (36 degrees)
const SHOTGUN_SPREAD: f32 = PI / 5.0;
/// Chance per tick of a fire particle
const AURA_CHANCE: f32 = 0.7;

pub(super) fn update(tank: &mut Tank, state: &mut GameState, rng: &mut impl Rng) {
    let TankKind::Sally(attack) = tank.kind else {
        return;
    };
    fire_aura(tank, state, rng);
    let next = step(tank, attack, state, rng);
    tank.kind = TankKind::Sally(next);
}

fn step(tank: &mut Tank, attack: SallyAttack, state: &mut GameState, rng: &mut impl Rng) -> SallyAttack {
    match attack {
        SallyAttack::Idle { cooldown } => {
            if !state.player.dead {
                chase(tank, state.player.center(), &state.grid);
            }
            if cooldown > 0 {
                SallyAttack::Idle { cooldown: cooldown - 1 }
            } else {
                tank.speed = 0.0;
                log::debug!("Sally charging the beam");
                SallyAttack::PreCharge { timer: SALLY_PRE_CHARGE }
            }
        }
        SallyAttack::PreCharge { timer } => {
            if timer > 0 {
                SallyAttack::PreCharge { timer: timer - 1 }
            } else {
                SallyAttack::Charging {
                    timer: SALLY_CHARGE,
                    aim: angle_to(tank.center(), state.player.center()),
                }
            }
        }
        SallyAttack::Charging { timer, aim } => {
            if timer > 0 {
                SallyAttack::Charging { timer: timer - 1, aim }
            } else {
                SallyAttack::Firing {
                    timer: SALLY_LASER_DURATION,
                    aim,
                }
            }
        }
        SallyAttack::Firing { timer, aim } => {
            let damage_tick = timer > 0 && timer % SALLY_LASER_DAMAGE_INTERVAL == 0;
            if damage_tick
                && !state.player.dead
                && resolve_laser_hit(tank, aim, &state.player, SALLY_LASER_WIDTH)
            {
                damage_player(state, 1.0);
            }

            if timer > 0 {
                SallyAttack::Firing { timer: timer - 1, aim }
            } else {
                let trace = Particle::new(ParticleKind::LaserTrace, tank.center(), SALLY_LASER_TRACE_DURATION)
                    .with_angle(aim);
                state.emit(trace);
                SallyAttack::Shotgun { timer: 0, bursts: 0 }
            }
        }
        SallyAttack::Shotgun { timer, bursts } => {
            if timer > 0 {
                SallyAttack::Shotgun { timer: timer - 1, bursts }
            } else if bursts >= SALLY_SHOTGUN_BURSTS {
                tank.speed = SALLY_SPEED;
                SallyAttack::Idle {
                    cooldown: SALLY_LASER_COOLDOWN,
                }
            } else {
                shotgun_burst(tank, state, rng);
                SallyAttack::Shotgun {
                    timer: SALLY_SHOTGUN_BURST_DELAY,
                    bursts: bursts + 1,
                }
            }
        }
    }
}

fn shotgun_burst(tank: &Tank, state: &mut GameState, rng: &mut impl Rng) {
    let center = tank.center();
    let base = angle_to(center, state.player.center());
    for _ in 0..SALLY_SHOTGUN_BULLET_COUNT {
        let spread = (rng.random::<f32>() - 0.5) * 2.0 * SHOTGUN_SPREAD;
        let motion = Motion::Vector {
            vel: velocity_at(base + spread, BOSS_BULLET_SPEED),
        };
        state.fire_from(center, motion, Owner::Boss);
    }
    state.emit(Particle::new(ParticleKind::Impact, center, 10));
}

/// Flames licking off the hull, drifting upward
fn fire_aura(tank: &Tank, state: &mut GameState, rng: &mut impl Rng) {
    if rng.random::<f32>() >= AURA_CHANCE {
        return;
    }
    let angle = rng.random::<f32>() * TAU;
    let pos = tank.center() + velocity_at(angle, tank.size / 1.5);
    let stage = 20 + rng.random_range(0..10);
    let vel = Vec2::new((rng.random::<f32>() - 0.5) * 0.5, -1.0 - rng.random::<f32>());
    state.emit(Particle::new(ParticleKind::Fire, pos, stage).with_vel(vel));
}
