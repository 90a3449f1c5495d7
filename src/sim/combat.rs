//! Bullet resolution: clashes, flight, map impacts, and tank hits

use glam::Vec2;
use rand::Rng;

use super::ai::clash_retaliation;
use super::collision::{MapHit, bullet_hits_map, rects_overlap};
use super::state::{
    BulletVariant, GameEvent, GamePhase, GameState, Motion, Owner, Particle, ParticleKind,
};
use crate::consts::*;
use crate::{angle_to, velocity_at};

/// Resolve every bullet for this tick
pub(crate) fn update_bullets(state: &mut GameState, rng: &mut impl Rng) {
    clash_bullets(state, rng);
    move_bullets(state);
    hit_map(state);
    hit_tanks(state);
}

/// Opposing bullets that overlap cancel each other out
///
/// Glasscannon bullets neither cancel nor get cancelled.
fn clash_bullets(state: &mut GameState, rng: &mut impl Rng) {
    let mut boss_clashes = 0;
    let n = state.bullets.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (&state.bullets[i], &state.bullets[j]);
            if !a.active || a.variant == BulletVariant::Glasscannon {
                break;
            }
            if !b.active || b.variant == BulletVariant::Glasscannon || a.owner == b.owner {
                continue;
            }
            if !rects_overlap(&a.rect(), &b.rect()) {
                continue;
            }

            let mid = (a.pos + b.pos) / 2.0;
            let owners = (a.owner, b.owner);
            state.bullets[i].active = false;
            state.bullets[j].active = false;
            state.emit(Particle::new(ParticleKind::Standard, mid - Vec2::splat(10.0), 5));
            if matches!(owners, (Owner::Boss, Owner::Player) | (Owner::Player, Owner::Boss)) {
                boss_clashes += 1;
            }
        }
    }

    // Retaliation bullets join after the pass
    for _ in 0..boss_clashes {
        clash_retaliation(state, rng);
    }
}

fn move_bullets(state: &mut GameState) {
    let target = (!state.player.dead).then(|| state.player.center());
    for bullet in state.bullets.iter_mut().filter(|b| b.active) {
        if bullet.variant == BulletVariant::Glasscannon
            && let (Motion::Vector { vel }, Some(target)) = (bullet.motion, target)
        {
            let angle = angle_to(bullet.center(), target);
            bullet.motion = Motion::Vector {
                vel: velocity_at(angle, vel.length()),
            };
        }
        bullet.pos += bullet.step();
    }
}

fn hit_map(state: &mut GameState) {
    for i in 0..state.bullets.len() {
        let bullet = &state.bullets[i];
        if !bullet.active {
            continue;
        }
        let pos = bullet.pos;
        let hit = bullet_hits_map(&state.grid, bullet.center());
        match hit {
            MapHit::Miss => continue,
            MapHit::Wall { x, y } => {
                state.grid.damage_tile(x, y);
            }
            MapHit::Base { .. } => {
                state.grid.destroy_base();
                state.push_event(GameEvent::BaseDestroyed);
                log::info!("Base destroyed");
                if state.phase == GamePhase::Playing {
                    state.set_phase(GamePhase::GameOver);
                }
            }
            MapHit::Boundary => {}
        }
        state.bullets[i].active = false;
        if hit != MapHit::Boundary {
            state.emit(Particle::new(ParticleKind::Standard, pos - Vec2::splat(10.0), 5));
        }
    }
}

fn hit_tanks(state: &mut GameState) {
    for i in 0..state.bullets.len() {
        let bullet = &state.bullets[i];
        if !bullet.active {
            continue;
        }
        let rect = bullet.rect();
        let pos = bullet.pos;

        if bullet.owner == Owner::Player {
            let Some(target) = state
                .enemies
                .iter()
                .position(|e| !e.dead && e.in_fight() && rects_overlap(&rect, &e.rect()))
            else {
                continue;
            };
            state.bullets[i].active = false;
            hit_enemy(state, target, pos);
        } else if !state.player.dead && rects_overlap(&rect, &state.player.rect()) {
            state.bullets[i].active = false;
            damage_player(state, 1.0);
        }
    }
}

/// Apply one player bullet to `state.enemies[index]`
fn hit_enemy(state: &mut GameState, index: usize, bullet_pos: Vec2) {
    let enemy = &mut state.enemies[index];
    let defended = enemy.is_defended();
    let damage = if defended { BOSS_BUFFED_DAMAGE } else { 1.0 };
    let was_enraged = enemy.is_enraged();
    let killed = enemy.take_damage(damage);
    if enemy.is_boss() && !killed && !was_enraged && enemy.is_enraged() {
        log::info!("{} enraged", enemy.boss_name().unwrap_or_default());
    }
    let enemy_pos = enemy.pos;
    let points = enemy.score_value();
    let boss_name = enemy.boss_name();

    if defended {
        state.emit(Particle::new(ParticleKind::Smoke, bullet_pos - Vec2::splat(5.0), 3));
    }
    if killed {
        state.award(points);
        state.enemy_destroyed();
        state.emit(Particle::new(ParticleKind::Standard, enemy_pos, 10));
        if let Some(name) = boss_name {
            log::info!("{} defeated", name);
        }
    } else {
        state.emit(Particle::new(ParticleKind::Standard, bullet_pos, 3));
    }
}

/// Damage the player; a kill ends the run
pub(crate) fn damage_player(state: &mut GameState, amount: f32) {
    if state.player.dead {
        return;
    }
    let pos = state.player.pos;
    if state.player.take_damage(amount) {
        state.emit(Particle::new(ParticleKind::Standard, pos, 10));
        state.push_event(GameEvent::PlayerDied);
        log::info!("Player destroyed");
        if state.phase == GamePhase::Playing {
            state.set_phase(GamePhase::GameOver);
        }
    } else {
        state.emit(Particle::new(ParticleKind::Standard, pos, 5));
    }
}
