//! Juggernaut: DORMANT -> AWAKENING -> FIGHT brute with an enraged dash phase

use std::f32::consts::{FRAC_PI_4, PI};

use glam::Vec2;
use rand::Rng;

use super::{chase, slide};
use crate::consts::*;
use crate::sim::collision::rects_overlap;
use crate::sim::state::{
    BossIntro, BulletVariant, Direction, GameState, Juggernaut, Motion, Owner, Particle,
    ParticleKind, Tank, TankKind,
};
use crate::{angle_to, velocity_at};

const GLITCH_COLORS: [u32; 4] = [0x00FF00, 0xFF00FF, 0x00FFFF, 0xFFFFFF];
const AURA_RADIUS: f32 = 40.0;
/// Noise added to a dash heading, either side (60 degrees)
const DASH_NOISE: f32 = PI / 3.0;
/// Retaliation burst spread, either side (30 degrees)
const CLASH_SPREAD: f32 = PI / 6.0;

pub(super) fn update(tank: &mut Tank, state: &mut GameState, rng: &mut impl Rng) {
    let TankKind::Juggernaut(mut jugg) = tank.kind.clone() else {
        return;
    };
    step(tank, &mut jugg, state, rng);
    tank.kind = TankKind::Juggernaut(jugg);
}

fn step(tank: &mut Tank, jugg: &mut Juggernaut, state: &mut GameState, rng: &mut impl Rng) {
    jugg.defense_buff = jugg.defense_buff.saturating_sub(1);
    jugg.shotgun_cooldown = jugg.shotgun_cooldown.saturating_sub(1);

    // Ramming the player hardens the hull
    if jugg.intro == BossIntro::Fight
        && !state.player.dead
        && rects_overlap(&tank.rect(), &state.player.rect())
    {
        jugg.defense_buff = BOSS_DEFENSE_BUFF_DURATION;
    }

    match jugg.intro {
        BossIntro::Dormant => return,
        BossIntro::Awakening { timer } => {
            awaken(tank, jugg, timer, state, rng);
            return;
        }
        BossIntro::Fight => {}
    }

    let player_center = state.player.center();
    let player_alive = !state.player.dead;

    if tank.is_enraged() {
        jugg.glasscannon_timer += 1;
        if jugg.glasscannon_timer >= GLASSCANNON_COOLDOWN {
            fire_glasscannon(tank, player_center, state);
            jugg.glasscannon_timer = 0;
        }

        jugg.dash_timer = jugg.dash_timer.saturating_sub(1);
        if jugg.dash_timer == 0 {
            jugg.dash_timer = rng.random_range(BOSS_DASH_MIN..BOSS_DASH_MAX).ceil() as u32;
            if player_alive {
                let noise = (rng.random::<f32>() - 0.5) * 2.0 * DASH_NOISE;
                let angle = angle_to(tank.center(), player_center) + noise;
                jugg.dash = velocity_at(angle, tank.speed * BOSS_RAGE_SPEED_MULT);
                tank.direction = Direction::dominant(jugg.dash);
            }
        }
        slide(tank, jugg.dash, &state.grid);
    } else if player_alive {
        chase(tank, player_center, &state.grid);
    }

    if tank.cooldown > 0 {
        tank.cooldown -= 1;
    } else {
        fire_fan(tank, player_center, state);
        tank.cooldown = BOSS_SHOOT_COOLDOWN;
    }
}

/// Count down the wake-up, throwing aura and glitch particles, then start the fight
fn awaken(tank: &Tank, jugg: &mut Juggernaut, timer: u32, state: &mut GameState, rng: &mut impl Rng) {
    let center = tank.center();
    if timer == 0 {
        jugg.intro = BossIntro::Fight;
        state.emit(Particle::new(ParticleKind::Impact, center, 20));
        log::info!("Juggernaut enters the fight");
        return;
    }

    let timer = timer - 1;
    jugg.intro = BossIntro::Awakening { timer };

    // Spiral of particles sucked toward the center
    if timer % 3 == 0 {
        let angle = timer as f32 / 5.0;
        let pos = center + velocity_at(angle, AURA_RADIUS);
        state.emit(Particle::new(ParticleKind::BossAura, pos, 30).with_vel((center - pos) * 0.05));
    }

    if rng.random::<f32>() > 0.5 {
        let range = 50.0;
        let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * range;
        let stage = 5 + rng.random_range(0..5);
        let color = GLITCH_COLORS[rng.random_range(0..GLITCH_COLORS.len())];
        state.emit(Particle::new(ParticleKind::Glitch, center + offset, stage).with_color(color));
    }
}

/// Three bullets: straight along the cardinal facing nearest the player, and 45 degrees either side
fn fire_fan(tank: &Tank, player_center: Vec2, state: &mut GameState) {
    let center = tank.center();
    let base = Direction::dominant(player_center - center).angle();
    for angle in [base, base - FRAC_PI_4, base + FRAC_PI_4] {
        let motion = Motion::Vector {
            vel: velocity_at(angle, BOSS_BULLET_SPEED),
        };
        state.fire_from(center, motion, Owner::Boss);
    }
}

/// Slow homing spear that ignores other bullets
fn fire_glasscannon(tank: &Tank, player_center: Vec2, state: &mut GameState) {
    let center = tank.center();
    let speed = BOSS_BULLET_SPEED * GLASSCANNON_SPEED_FACTOR;
    let angle = angle_to(center, player_center);
    state.spawn_bullet(
        center - Vec2::splat(GLASSCANNON_SIZE / 2.0),
        Vec2::new(GLASSCANNON_SIZE, GLASSCANNON_SIZE / 3.0),
        Motion::Vector {
            vel: velocity_at(angle, speed),
        },
        Owner::Boss,
        BulletVariant::Glasscannon,
    );
    log::debug!("Juggernaut fires a glasscannon");
}

/// Record a boss-vs-player bullet clash; every third ready clash answers with a spread burst
pub fn clash_retaliation(state: &mut GameState, rng: &mut impl Rng) {
    let Some(index) = state
        .enemies
        .iter()
        .position(|e| matches!(&e.kind, TankKind::Juggernaut(j) if j.intro == BossIntro::Fight))
    else {
        return;
    };

    let boss = &mut state.enemies[index];
    let center = boss.center();
    let TankKind::Juggernaut(jugg) = &mut boss.kind else {
        return;
    };
    jugg.clash_count += 1;
    if jugg.clash_count < CLASH_TRIGGER || jugg.shotgun_cooldown > 0 {
        return;
    }
    jugg.clash_count = 0;
    jugg.shotgun_cooldown = CLASH_BURST_COOLDOWN;

    let base = angle_to(center, state.player.center());
    for _ in 0..CLASH_BURST_BULLETS {
        let spread = (rng.random::<f32>() - 0.5) * 2.0 * CLASH_SPREAD;
        let motion = Motion::Vector {
            vel: velocity_at(base + spread, BOSS_BULLET_SPEED),
        };
        state.fire_from(center, motion, Owner::Boss);
    }
    state.emit(Particle::new(ParticleKind::Impact, center, 15));
    log::debug!("Juggernaut retaliates after bullet clashes");
}
