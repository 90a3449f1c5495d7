//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use rand::Rng;

use super::ai::update_enemies;
use super::collision::{Rect, rects_overlap};
use super::combat::update_bullets;
use super::input::{TickInput, update_player};
use super::levels::LevelGoal;
use super::state::{
    BossIntro, GameEvent, GamePhase, GameState, Particle, ParticleKind, TankKind,
};
use crate::consts::*;

/// Chance a cleared fog tile puffs smoke
const FOG_SMOKE_CHANCE: f32 = 0.3;

/// Advance the game state by one fixed timestep
///
/// Only runs while [`GamePhase::Playing`]; every other phase is a no-op.
pub fn tick(state: &mut GameState, input: &TickInput, rng: &mut impl Rng) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    update_player(state, input, rng);
    if state.level.goal() == LevelGoal::ClearQuota {
        spawn_enemies(state, rng);
    }
    update_enemies(state, rng);
    update_bullets(state, rng);
    move_particles(state);
    check_victory(state);
    compact(state);
}

/// Release the next quota enemy at a random spawn point when there is room
fn spawn_enemies(state: &mut GameState, rng: &mut impl Rng) {
    state.spawn_timer += 1;
    if state.spawn_timer <= SPAWN_INTERVAL
        || state.alive_enemies() >= MAX_ACTIVE_ENEMIES
        || state.enemies_to_spawn == 0
    {
        return;
    }
    state.spawn_timer = 0;

    let points = state.level.spawn_points();
    let inset = (TILE_SIZE - TANK_SIZE) / 2.0;
    let pos = points[rng.random_range(0..points.len())] + Vec2::splat(inset);
    let rect = Rect::new(pos.x, pos.y, TANK_SIZE, TANK_SIZE);

    let occupied = state.enemies.iter().any(|e| !e.dead && rects_overlap(&rect, &e.rect()))
        || (!state.player.dead && rects_overlap(&rect, &state.player.rect()));
    if occupied {
        log::debug!("Spawn point ({}, {}) occupied, waiting", pos.x, pos.y);
        return;
    }
    state.spawn_enemy(pos);
}

fn move_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut().filter(|p| p.moves()) {
        particle.pos += particle.vel;
    }
}

fn check_victory(state: &mut GameState) {
    if state.phase != GamePhase::Playing || state.alive_enemies() > 0 {
        return;
    }
    let won = match state.level.goal() {
        LevelGoal::ClearQuota => state.enemies_to_spawn == 0,
        LevelGoal::DefeatBoss => state.boss_spawned,
    };
    if won {
        log::info!("Level {} cleared with score {}", state.level.number(), state.score);
        state.set_phase(GamePhase::Victory);
    }
}

/// Drop spent bullets, destroyed tanks, and expired particles
fn compact(state: &mut GameState) {
    state.bullets.retain(|b| b.active);
    state.enemies.retain(|e| !e.dead);
    state.particles.retain_mut(|p| {
        p.stage = p.stage.saturating_sub(1);
        p.stage > 0
    });
}

/// Reveal the whole map once the player steps into fog, waking a dormant boss
///
/// Does nothing when the player is not touching fog, so calling it again after
/// a reveal changes nothing.
pub(crate) fn reveal_fog(state: &mut GameState, rng: &mut impl Rng) {
    if !state.grid.overlaps_fog(&state.player.rect()) {
        return;
    }

    let cleared = state.grid.clear_fog();
    for (x, y) in &cleared {
        if rng.random::<f32>() < FOG_SMOKE_CHANCE {
            let center = (Vec2::new(*x as f32, *y as f32) + Vec2::splat(0.5)) * TILE_SIZE;
            state.emit(Particle::new(ParticleKind::Smoke, center, 23));
        }
    }
    log::info!("Fog cleared ({} tiles)", cleared.len());
    state.push_event(GameEvent::FogCleared { tiles: cleared.len() });

    let mut awakened = false;
    for enemy in &mut state.enemies {
        if let TankKind::Juggernaut(j) = &mut enemy.kind
            && j.intro == BossIntro::Dormant
        {
            j.intro = BossIntro::Awakening {
                timer: BOSS_AWAKEN_DURATION,
            };
            awakened = true;
        }
    }
    if awakened {
        log::info!("Juggernaut awakens");
        state.push_event(GameEvent::BossAwakened);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_rng;
    use crate::sim::grid::TileType;
    use crate::sim::state::{Direction, Motion, Owner};

    fn playing(level: u32) -> GameState {
        let mut state = GameState::new(level);
        state.start();
        state.drain_events();
        state
    }

    #[test]
    fn test_tick_only_while_playing() {
        let mut state = GameState::new(1);
        let mut rng = new_rng(1);
        tick(&mut state, &TickInput::moving(Direction::Up), &mut rng);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.pos, state.level.player_spawn());

        state.start();
        state.open_shop();
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_spawner_waits_then_spawns() {
        let mut state = playing(1);
        let mut rng = new_rng(2);
        for _ in 0..SPAWN_INTERVAL {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert!(state.enemies.is_empty());
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies_to_spawn, ENEMY_QUOTA - 1);
        assert_eq!(state.spawn_timer, 0);
    }

    #[test]
    fn test_spawner_caps_active_enemies() {
        let mut state = playing(1);
        let mut rng = new_rng(3);
        for x in 0..MAX_ACTIVE_ENEMIES {
            state.spawn_enemy(Vec2::new(200.0 + 40.0 * x as f32, 200.0));
        }
        let before = state.enemies_to_spawn;
        state.spawn_timer = SPAWN_INTERVAL;
        spawn_enemies(&mut state, &mut rng);
        assert_eq!(state.enemies_to_spawn, before);
    }

    #[test]
    fn test_boss_levels_do_not_spawn() {
        let mut state = playing(2);
        let mut rng = new_rng(4);
        for _ in 0..(SPAWN_INTERVAL * 2) {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_fog_reveal_wakes_boss() {
        let mut state = playing(2);
        let mut rng = new_rng(5);
        // Step north from the clear rows into the fog
        state.player.pos.y = (GRID_HEIGHT - 2) as f32 * TILE_SIZE + 1.0;
        tick(&mut state, &TickInput::moving(Direction::Up), &mut rng);

        assert_eq!(state.grid.count(TileType::Fog), 0);
        let boss = state.boss().expect("boss");
        assert!(matches!(&boss.kind, TankKind::Juggernaut(j) if matches!(j.intro, BossIntro::Awakening { .. })));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::BossAwakened));
        assert!(events.iter().any(|e| matches!(e, GameEvent::FogCleared { .. })));
    }

    #[test]
    fn test_fog_reveal_idempotent() {
        let mut state = playing(3);
        let mut rng = new_rng(6);
        state.player.pos = Vec2::new(100.0, 100.0);
        reveal_fog(&mut state, &mut rng);
        let particles = state.particles.len();
        let events = state.drain_events().len();
        assert!(events > 0);

        reveal_fog(&mut state, &mut rng);
        assert_eq!(state.particles.len(), particles);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_dormant_boss_waits_in_fog() {
        let mut state = playing(2);
        let mut rng = new_rng(7);
        let pos = state.enemies[0].pos;
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.enemies[0].pos, pos);
        assert!(state.bullets.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_particles_age_out() {
        let mut state = playing(1);
        let mut rng = new_rng(8);
        state.emit(Particle::new(ParticleKind::Smoke, Vec2::ZERO, 2));
        state.emit(Particle::new(ParticleKind::Fire, Vec2::ZERO, 3).with_vel(Vec2::new(0.0, -1.0)));
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.particles.len(), 2);
        assert_eq!(state.particles[1].pos, Vec2::new(0.0, -1.0));
        // Smoke never drifts
        assert_eq!(state.particles[0].pos, Vec2::ZERO);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.particles.len(), 1);
    }

    #[test]
    fn test_boss_kill_is_victory() {
        let mut state = playing(3);
        let mut rng = new_rng(9);
        state.enemies[0].hp = 1.0;
        let center = state.enemies[0].center();
        state.fire_from(center, Motion::Vector { vel: Vec2::ZERO }, Owner::Player);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.score, BOSS_SCORE);
        assert_eq!(state.enemies_left, 0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut state = playing(1);
            let mut rng = new_rng(seed);
            let inputs = [
                TickInput::moving(Direction::Up),
                TickInput {
                    fire: true,
                    ..Default::default()
                },
                TickInput::moving(Direction::Left),
                TickInput::default(),
            ];
            for n in 0..2000 {
                tick(&mut state, &inputs[n % inputs.len()], &mut rng);
            }
            state
        };

        let a = run(42);
        let b = run(42);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player, b.player);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.bullets, b.bullets);
        assert_eq!(a.score, b.score);
        assert_eq!(a.grid.tiles(), b.grid.tiles());
    }
}
