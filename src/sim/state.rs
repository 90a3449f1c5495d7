//! Game state and core simulation types
//!
//! All state the simulation mutates lives in [`GameState`]. Collaborators
//! (renderer, HUD, meta-progression) read it after a tick, or consume the
//! [`GameEvent`]s it queues; they never mutate it directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::grid::Grid;
use super::levels::Level;
use crate::consts::*;

/// Cardinal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Order used for random heading picks
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit step in screen space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Facing along the dominant axis of `v` (vertical wins ties)
    pub fn dominant(v: Vec2) -> Self {
        if v.x.abs() > v.y.abs() {
            if v.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if v.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// Angle of this facing in radians
    pub fn angle(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Direction::Right => 0.0,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
            Direction::Up => -FRAC_PI_2,
        }
    }
}

/// Which side fired a bullet / which side a tank belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
    Boss,
}

/// Boss intro lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossIntro {
    /// Hidden in the fog; only the fog reveal wakes it
    Dormant,
    /// Cinematic wake-up, counting down
    Awakening { timer: u32 },
    Fight,
}

/// Juggernaut (level 2 brute) state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Juggernaut {
    pub intro: BossIntro,
    /// Ticks of halved incoming damage left
    pub defense_buff: u32,
    /// Opposing bullet clashes since the last retaliation burst
    pub clash_count: u32,
    pub shotgun_cooldown: u32,
    /// Counts up while enraged; fires a glasscannon when full
    pub glasscannon_timer: u32,
    pub dash_timer: u32,
    pub dash: Vec2,
}

impl Juggernaut {
    pub fn dormant() -> Self {
        Self {
            intro: BossIntro::Dormant,
            defense_buff: 0,
            clash_count: 0,
            shotgun_cooldown: 0,
            glasscannon_timer: 0,
            dash_timer: 0,
            dash: Vec2::ZERO,
        }
    }
}

/// Sally's attack cycle: IDLE -> PRE_CHARGE -> CHARGING -> FIRING -> SHOTGUN -> IDLE
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SallyAttack {
    /// Chasing the player until the cooldown runs out
    Idle { cooldown: u32 },
    /// Frozen, about to lock aim
    PreCharge { timer: u32 },
    /// Aim locked, telegraphing
    Charging { timer: u32, aim: f32 },
    /// Beam active along the locked aim
    Firing { timer: u32, aim: f32 },
    /// Spread bursts toward the player
    Shotgun { timer: u32, bursts: u32 },
}

impl SallyAttack {
    /// Locked beam angle, if one is set
    pub fn aim(&self) -> Option<f32> {
        match *self {
            SallyAttack::Charging { aim, .. } | SallyAttack::Firing { aim, .. } => Some(aim),
            _ => None,
        }
    }
}

/// Behavioral class of a tank, carrying only the fields its AI needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TankKind {
    Player,
    Enemy,
    Juggernaut(Juggernaut),
    Sally(SallyAttack),
}

/// A tank (player, basic enemy, or boss)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height (tanks are square)
    pub size: f32,
    pub direction: Direction,
    pub speed: f32,
    /// Ticks until the next shot is allowed
    pub cooldown: u32,
    /// May be fractional on bosses (buffed hits deal half damage)
    pub hp: f32,
    pub max_hp: f32,
    pub dead: bool,
    pub kind: TankKind,
}

impl Tank {
    pub fn new(id: u32, kind: TankKind, pos: Vec2, size: f32, speed: f32, hp: f32) -> Self {
        Self {
            id,
            pos,
            size,
            direction: Direction::Down,
            speed,
            cooldown: 0,
            hp,
            max_hp: hp,
            dead: false,
            kind,
        }
    }

    /// Basic enemy with no id at `pos` (test fixture)
    #[cfg(test)]
    pub(crate) fn at(pos: Vec2, size: f32) -> Self {
        Self::new(0, TankKind::Enemy, pos, size, ENEMY_SPEED, 1.0)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn owner(&self) -> Owner {
        match self.kind {
            TankKind::Player => Owner::Player,
            TankKind::Enemy => Owner::Enemy,
            TankKind::Juggernaut(_) | TankKind::Sally(_) => Owner::Boss,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.owner() == Owner::Boss
    }

    /// Bosses outside FIGHT are inert and untouchable; everyone else is always fighting
    pub fn in_fight(&self) -> bool {
        match &self.kind {
            TankKind::Juggernaut(j) => j.intro == BossIntro::Fight,
            _ => true,
        }
    }

    /// Enrage threshold (inclusive)
    pub fn is_enraged(&self) -> bool {
        self.hp <= self.max_hp / 2.0
    }

    /// Damage reduction currently active
    pub fn is_defended(&self) -> bool {
        matches!(&self.kind, TankKind::Juggernaut(j) if j.defense_buff > 0)
    }

    /// Apply damage, keeping hp within [0, max_hp]. Returns true if this killed the tank.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.hp = (self.hp - amount).clamp(0.0, self.max_hp);
        if self.hp <= 0.0 {
            self.dead = true;
        }
        self.dead
    }

    /// Restore hp, never past max. Returns true if anything was restored.
    pub fn heal(&mut self, amount: f32) -> bool {
        if self.dead || self.hp >= self.max_hp {
            return false;
        }
        self.hp = (self.hp + amount).min(self.max_hp);
        true
    }

    /// Kill value awarded to the player
    pub fn score_value(&self) -> u32 {
        if self.is_boss() { BOSS_SCORE } else { ENEMY_SCORE }
    }

    /// HUD name for bosses
    pub fn boss_name(&self) -> Option<&'static str> {
        match self.kind {
            TankKind::Juggernaut(_) => Some("JUGGERNAUT"),
            TankKind::Sally(_) => Some("SALLY"),
            _ => None,
        }
    }
}

/// How a bullet moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Cardinal { direction: Direction, speed: f32 },
    /// Free-angle velocity per tick
    Vector { vel: Vec2 },
}

/// Bullet behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletVariant {
    #[default]
    Standard,
    /// Homing, unstoppable by other bullets
    Glasscannon,
}

/// A projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub motion: Motion,
    pub owner: Owner,
    pub active: bool,
    pub variant: BulletVariant,
}

impl Bullet {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Displacement applied this tick
    pub fn step(&self) -> Vec2 {
        match self.motion {
            Motion::Cardinal { direction, speed } => direction.unit() * speed,
            Motion::Vector { vel } => vel,
        }
    }
}

/// Visual flavor of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Standard,
    Smoke,
    Fire,
    Heal,
    Impact,
    Glitch,
    LaserTrace,
    BossAura,
}

/// A cosmetic particle; never collides with anything
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Ticks of life left
    pub stage: u32,
    pub kind: ParticleKind,
    pub vel: Vec2,
    /// 0xRRGGBB override
    pub color: Option<u32>,
    /// Beam direction for laser traces
    pub angle: Option<f32>,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: Vec2, stage: u32) -> Self {
        Self {
            pos,
            stage,
            kind,
            vel: Vec2::ZERO,
            color: None,
            angle: None,
        }
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Only aura and fire particles drift
    pub fn moves(&self) -> bool {
        matches!(self.kind, ParticleKind::BossAura | ParticleKind::Fire)
    }
}

/// Global game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level select; no simulation
    Menu,
    /// The only phase that runs ticks
    Playing,
    GameOver,
    Victory,
    /// Upgrade shop; no simulation
    Shop,
}

/// Notifications for collaborators, drained after each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreAwarded { points: u32 },
    EnemiesLeftChanged { remaining: u32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// For the externally owned death counter
    PlayerDied,
    HealUsed { charges_left: u32 },
    BaseDestroyed,
    FogCleared { tiles: usize },
    BossAwakened,
}

/// Heal item availability, owned by meta-progression
///
/// The simulation only ever decrements `charges`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealSupply {
    pub unlocked: bool,
    pub charges: u32,
}

/// Complete simulation state for one level
#[derive(Debug, Clone)]
pub struct GameState {
    pub level: Level,
    pub phase: GamePhase,
    pub grid: Grid,
    pub player: Tank,
    /// Basic enemies and bosses
    pub enemies: Vec<Tank>,
    pub bullets: Vec<Bullet>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub score: u32,
    /// Enemies the player still has to destroy
    pub enemies_left: u32,
    /// Level 1 quota not yet spawned
    pub enemies_to_spawn: u32,
    pub spawn_timer: u32,
    pub boss_spawned: bool,
    pub heal: HealSupply,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Cosmetic particle budget
    pub max_particles: usize,
    /// Phase to restore when the shop closes
    pub(crate) shop_return: Option<GamePhase>,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

/// Default particle budget when no settings are supplied
pub const MAX_PARTICLES: usize = 2000;

impl GameState {
    /// New session sitting in the menu with `level` selected (clamped to a valid level)
    pub fn new(level: u32) -> Self {
        let level = Level::from_number(level);
        let mut state = Self {
            level,
            phase: GamePhase::Menu,
            grid: Grid::new(GRID_WIDTH, GRID_HEIGHT),
            player: Tank::new(0, TankKind::Player, Vec2::ZERO, TANK_SIZE, PLAYER_SPEED, PLAYER_MAX_HP),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            score: 0,
            enemies_left: 0,
            enemies_to_spawn: 0,
            spawn_timer: 0,
            boss_spawned: false,
            heal: HealSupply::default(),
            time_ticks: 0,
            max_particles: MAX_PARTICLES,
            shop_return: None,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reload the current level: fresh grid, player, and counters
    pub fn reset(&mut self) {
        let level = self.level;
        self.grid = level.grid();
        self.enemies.clear();
        self.bullets.clear();
        self.particles.clear();
        self.events.clear();
        self.score = 0;
        self.spawn_timer = 0;
        self.time_ticks = 0;
        self.enemies_left = level.enemy_count();
        self.enemies_to_spawn = level.spawn_quota();

        let id = self.next_entity_id();
        let mut player = Tank::new(id, TankKind::Player, level.player_spawn(), TANK_SIZE, PLAYER_SPEED, PLAYER_MAX_HP);
        player.direction = Direction::Up;
        self.player = player;

        self.boss_spawned = false;
        if let Some((kind, pos, size, speed, hp)) = level.boss() {
            let id = self.next_entity_id();
            self.enemies.push(Tank::new(id, kind, pos, size, speed, hp));
            self.boss_spawned = true;
        }

        log::info!(
            "Loaded level {} ({} enemies, boss: {})",
            level.number(),
            self.enemies_left,
            self.boss_spawned
        );
    }

    /// Spawn a 1-hp patrolling enemy at `pos`, charging it against the spawn quota
    pub fn spawn_enemy(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Tank::new(id, TankKind::Enemy, pos, TANK_SIZE, ENEMY_SPEED, 1.0));
        self.enemies_to_spawn = self.enemies_to_spawn.saturating_sub(1);
        log::debug!("Spawned enemy {} at ({}, {}), {} left to spawn", id, pos.x, pos.y, self.enemies_to_spawn);
        id
    }

    /// Queue a bullet
    pub fn spawn_bullet(&mut self, pos: Vec2, size: Vec2, motion: Motion, owner: Owner, variant: BulletVariant) {
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos,
            size,
            motion,
            owner,
            active: true,
            variant,
        });
    }

    /// Standard-size bullet centered on `center`
    pub fn fire_from(&mut self, center: Vec2, motion: Motion, owner: Owner) {
        let half = BULLET_SIZE / 2.0;
        self.spawn_bullet(
            center - Vec2::splat(half),
            Vec2::splat(BULLET_SIZE),
            motion,
            owner,
            BulletVariant::Standard,
        );
    }

    /// Add a particle if the budget allows
    pub fn emit(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move to `to`, announcing the change
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.push_event(GameEvent::PhaseChanged { from, to });
    }

    pub(crate) fn award(&mut self, points: u32) {
        self.score += points;
        self.push_event(GameEvent::ScoreAwarded { points });
    }

    pub(crate) fn enemy_destroyed(&mut self) {
        self.enemies_left = self.enemies_left.saturating_sub(1);
        self.push_event(GameEvent::EnemiesLeftChanged {
            remaining: self.enemies_left,
        });
    }

    /// The level's boss, alive or not
    pub fn boss(&self) -> Option<&Tank> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    pub fn boss_mut(&mut self) -> Option<&mut Tank> {
        self.enemies.iter_mut().find(|e| e.is_boss())
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.dead).count()
    }

    /// Start (or restart) the selected level
    pub fn start(&mut self) {
        match self.phase {
            GamePhase::Menu | GamePhase::GameOver | GamePhase::Victory => {
                self.reset();
                self.set_phase(GamePhase::Playing);
            }
            GamePhase::Playing | GamePhase::Shop => {}
        }
    }

    /// Choose a level from the menu. Returns the level actually selected.
    pub fn select_level(&mut self, number: u32) -> Level {
        if self.phase == GamePhase::Menu {
            self.level = Level::from_number(number);
            self.reset();
        }
        self.level
    }

    pub fn open_shop(&mut self) {
        if matches!(self.phase, GamePhase::Menu | GamePhase::Playing) {
            self.shop_return = Some(self.phase);
            self.set_phase(GamePhase::Shop);
        }
    }

    pub fn close_shop(&mut self) {
        if self.phase == GamePhase::Shop {
            let back = self.shop_return.take().unwrap_or(GamePhase::Menu);
            self.set_phase(back);
        }
    }

    pub fn return_to_menu(&mut self) {
        if self.phase != GamePhase::Menu {
            self.shop_return = None;
            self.set_phase(GamePhase::Menu);
        }
    }

    /// Read-only view for the renderer/HUD
    pub fn snapshot(&self) -> Snapshot<'_> {
        let boss = self.boss().filter(|b| b.in_fight()).map(|b| BossHud {
            name: b.boss_name().unwrap_or_default(),
            hp_fraction: if b.max_hp > 0.0 { b.hp / b.max_hp } else { 0.0 },
            enraged: b.is_enraged(),
            defended: b.is_defended(),
        });
        Snapshot {
            phase: self.phase,
            level: self.level.number(),
            grid: &self.grid,
            player: &self.player,
            enemies: &self.enemies,
            bullets: &self.bullets,
            particles: &self.particles,
            score: self.score,
            enemies_left: self.enemies_left,
            boss,
        }
    }
}

/// Boss health bar data
#[derive(Debug, Clone, Serialize)]
pub struct BossHud {
    pub name: &'static str,
    pub hp_fraction: f32,
    pub enraged: bool,
    pub defended: bool,
}

/// Borrowed view of a [`GameState`] for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub level: u32,
    pub grid: &'a Grid,
    pub player: &'a Tank,
    pub enemies: &'a [Tank],
    pub bullets: &'a [Bullet],
    pub particles: &'a [Particle],
    pub score: u32,
    pub enemies_left: u32,
    pub boss: Option<BossHud>,
}
