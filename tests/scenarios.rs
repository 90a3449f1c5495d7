//! End-to-end runs of the simulation through the public tick API

use battle_city::consts::*;
use battle_city::new_rng;
use battle_city::sim::{
    BossIntro, BulletVariant, GameEvent, GamePhase, GameState, Motion, Owner, SallyAttack,
    TankKind, TickInput, TileType, tick,
};
use glam::Vec2;

fn playing(level: u32) -> GameState {
    let mut state = GameState::new(level);
    state.start();
    state.drain_events();
    state
}

/// A motionless bullet centered on `center`
fn plant(state: &mut GameState, center: Vec2, owner: Owner) {
    state.fire_from(center, Motion::Vector { vel: Vec2::ZERO }, owner);
}

fn idle(state: &mut GameState, rng: &mut impl rand::Rng) {
    tick(state, &TickInput::default(), rng);
}

#[test]
fn test_twenty_kills_win_level_one() {
    let mut state = playing(1);
    let mut rng = new_rng(20);
    for k in 0..ENEMY_QUOTA {
        state.spawn_enemy(Vec2::new(4.0 + 41.0 * k as f32, 2.0));
    }
    for enemy in &mut state.enemies {
        enemy.cooldown = 10_000;
    }
    assert_eq!(state.enemies_to_spawn, 0);

    for _ in 0..ENEMY_QUOTA {
        let target = state.enemies.iter().find(|e| !e.dead).expect("enemy left").center();
        plant(&mut state, target, Owner::Player);
        idle(&mut state, &mut rng);
    }

    assert_eq!(state.score, 20);
    assert_eq!(state.enemies_left, 0);
    assert_eq!(state.phase, GamePhase::Victory);
    let events = state.drain_events();
    assert!(events.contains(&GameEvent::PhaseChanged {
        from: GamePhase::Playing,
        to: GamePhase::Victory,
    }));
}

#[test]
fn test_juggernaut_enrages_at_half_hp() {
    let mut state = playing(2);
    let mut rng = new_rng(2);
    {
        let boss = &mut state.enemies[0];
        if let TankKind::Juggernaut(j) = &mut boss.kind {
            j.intro = BossIntro::Fight;
        }
        boss.hp = BOSS_HP / 2.0 + 1.0;
        boss.cooldown = 10_000;
    }
    let center = state.enemies[0].center();
    plant(&mut state, center, Owner::Player);
    idle(&mut state, &mut rng);

    let boss = &state.enemies[0];
    assert_eq!(boss.hp, BOSS_HP / 2.0);
    assert!(boss.is_enraged());

    idle(&mut state, &mut rng);
    let TankKind::Juggernaut(j) = &state.enemies[0].kind else {
        panic!("boss changed kind");
    };
    assert!((j.dash.length() - BOSS_SPEED * BOSS_RAGE_SPEED_MULT).abs() < 1e-4);
}

#[test]
fn test_player_death_ends_run() {
    let mut state = playing(1);
    let mut rng = new_rng(3);
    state.player.hp = 1.0;
    let center = state.player.center();
    plant(&mut state, center, Owner::Enemy);
    idle(&mut state, &mut rng);

    assert!(state.player.dead);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert!(state.drain_events().contains(&GameEvent::PlayerDied));

    // Further ticks are no-ops
    let ticks = state.time_ticks;
    let pos = state.player.pos;
    tick(&mut state, &TickInput::moving(battle_city::sim::Direction::Left), &mut rng);
    assert_eq!(state.time_ticks, ticks);
    assert_eq!(state.player.pos, pos);
}

#[test]
fn test_sally_beam_ticks_every_ten() {
    let mut state = playing(3);
    let mut rng = new_rng(4);
    state.player.max_hp = 10.0;
    state.player.hp = 10.0;

    let mut hits = Vec::new();
    let mut last_hp = state.player.hp;
    for _ in 0..1000 {
        idle(&mut state, &mut rng);
        if state.player.hp < last_hp {
            assert_eq!(last_hp - state.player.hp, 1.0);
            hits.push(state.time_ticks);
            last_hp = state.player.hp;
        }
        if matches!(state.enemies[0].kind, TankKind::Sally(SallyAttack::Shotgun { .. })) {
            break;
        }
    }

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[1] - hits[0], u64::from(SALLY_LASER_DAMAGE_INTERVAL));
    assert_eq!(hits[2] - hits[1], u64::from(SALLY_LASER_DAMAGE_INTERVAL));
}

#[test]
fn test_bullet_clash_rules() {
    let mut state = playing(1);
    let mut rng = new_rng(5);

    // Opposing owners cancel
    plant(&mut state, Vec2::new(200.0, 170.0), Owner::Player);
    plant(&mut state, Vec2::new(201.0, 170.0), Owner::Enemy);
    // Same owner pass through each other
    plant(&mut state, Vec2::new(400.0, 170.0), Owner::Enemy);
    plant(&mut state, Vec2::new(401.0, 170.0), Owner::Enemy);
    // Glasscannon shrugs off a player bullet
    state.spawn_bullet(
        Vec2::new(600.0, 166.0),
        Vec2::new(GLASSCANNON_SIZE, GLASSCANNON_SIZE / 3.0),
        Motion::Vector { vel: Vec2::ZERO },
        Owner::Boss,
        BulletVariant::Glasscannon,
    );
    plant(&mut state, Vec2::new(606.0, 168.0), Owner::Player);

    idle(&mut state, &mut rng);
    assert_eq!(state.bullets.len(), 4);
    assert!(state.bullets.iter().all(|b| b.pos.x > 300.0));
}

#[test]
fn test_brick_takes_three_hits() {
    let mut state = playing(1);
    let mut rng = new_rng(6);
    assert_eq!(state.grid.get(1, 2), Some(TileType::Brick));
    let center = Vec2::new(1.5, 2.5) * TILE_SIZE;

    let expected = [TileType::BrickDamaged, TileType::BrickBroken, TileType::Empty];
    for tile in expected {
        plant(&mut state, center, Owner::Player);
        idle(&mut state, &mut rng);
        assert_eq!(state.grid.get(1, 2), Some(tile));
        assert!(state.bullets.is_empty());
    }

    // Cleared: the next bullet sails through
    plant(&mut state, center, Owner::Player);
    idle(&mut state, &mut rng);
    assert_eq!(state.bullets.len(), 1);
}

#[test]
fn test_steel_is_indestructible() {
    let mut state = playing(1);
    let mut rng = new_rng(7);
    assert_eq!(state.grid.get(9, 3), Some(TileType::Steel));
    let center = Vec2::new(9.5, 3.5) * TILE_SIZE;
    for _ in 0..5 {
        plant(&mut state, center, Owner::Player);
        idle(&mut state, &mut rng);
    }
    assert_eq!(state.grid.get(9, 3), Some(TileType::Steel));
}

#[test]
fn test_dormant_boss_ignores_bullets() {
    let mut state = playing(2);
    let mut rng = new_rng(8);
    let pos = state.enemies[0].pos;
    for _ in 0..10 {
        let center = state.enemies[0].center();
        plant(&mut state, center, Owner::Player);
        idle(&mut state, &mut rng);
    }
    let boss = &state.enemies[0];
    assert_eq!(boss.hp, BOSS_HP);
    assert_eq!(boss.pos, pos);
    assert_eq!(state.score, 0);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn test_base_hit_is_defeat() {
    let mut state = playing(1);
    let mut rng = new_rng(9);
    assert_eq!(state.grid.get(13, 19), Some(TileType::Base));
    plant(&mut state, Vec2::new(13.5, 19.5) * TILE_SIZE, Owner::Enemy);
    idle(&mut state, &mut rng);

    assert_eq!(state.phase, GamePhase::GameOver);
    assert!(!state.grid.base_alive);
    assert!(state.drain_events().contains(&GameEvent::BaseDestroyed));
}

#[test]
fn test_fog_walk_wakes_juggernaut() {
    let mut state = playing(2);
    let mut rng = new_rng(10);
    let up = TickInput::moving(battle_city::sim::Direction::Up);
    while state.grid.count(TileType::Fog) > 0 {
        assert!(state.time_ticks < 100, "player never reached the fog");
        tick(&mut state, &up, &mut rng);
    }

    for _ in 0..=BOSS_AWAKEN_DURATION {
        idle(&mut state, &mut rng);
    }
    let boss = state.boss().expect("boss");
    assert!(boss.in_fight());
    assert!(state.snapshot().boss.is_some());
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut state = playing(2);
        let mut rng = new_rng(seed);
        let inputs = [
            TickInput::moving(battle_city::sim::Direction::Up),
            TickInput {
                fire: true,
                ..Default::default()
            },
        ];
        for n in 0..1500 {
            tick(&mut state, &inputs[(n / 40) % inputs.len()], &mut rng);
        }
        serde_json::to_string(&state.snapshot()).expect("snapshot serializes")
    };
    assert_eq!(run(77), run(77));
}
