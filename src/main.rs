//! Battle City entry point
//!
//! The web build is driven from JS through `platform::web::WebGame`. Natively
//! this runs a headless autopilot game and prints a summary:
//!
//! ```text
//! battle-city [level] [seed] [max_ticks]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use battle_city::consts::*;
    use battle_city::new_rng;
    use battle_city::sim::{Direction, GameEvent, GamePhase, GameState, TickInput, tick};
    use battle_city::Settings;

    /// Line up with the nearest live enemy on one axis, then face it and shoot
    fn autopilot(state: &GameState) -> TickInput {
        let me = state.player.center();
        let target = state
            .enemies
            .iter()
            .filter(|e| !e.dead)
            .min_by(|a, b| me.distance_squared(a.center()).total_cmp(&me.distance_squared(b.center())));

        let Some(target) = target else {
            return TickInput::default();
        };
        let gap = target.center() - me;
        let aligned = gap.x.abs() < TANK_SIZE / 2.0 || gap.y.abs() < TANK_SIZE / 2.0;
        let direction = if aligned {
            Direction::dominant(gap)
        } else if gap.x.abs() < gap.y.abs() {
            // Close the short axis first
            if gap.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if gap.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };

        TickInput {
            moves: vec![direction],
            fire: aligned,
            heal: state.player.hp < PLAYER_MAX_HP,
        }
    }

    fn arg<T: std::str::FromStr>(n: usize, default: T) -> T {
        std::env::args().nth(n).and_then(|s| s.parse().ok()).unwrap_or(default)
    }

    pub fn run() {
        let level: u32 = arg(1, 1);
        let seed: u64 = arg(2, 0xB477);
        let max_ticks: u64 = arg(3, 60 * u64::from(TICKS_PER_SECOND) * 5);

        let mut state = GameState::new(level);
        Settings::load().apply(&mut state);
        state.heal.unlocked = true;
        state.heal.charges = 3;
        state.start();

        let mut rng = new_rng(seed);
        let mut kills = 0;
        let mut heals = 0;
        while state.phase == GamePhase::Playing && state.time_ticks < max_ticks {
            let input = autopilot(&state);
            tick(&mut state, &input, &mut rng);
            for event in state.drain_events() {
                match event {
                    GameEvent::EnemiesLeftChanged { .. } => kills += 1,
                    GameEvent::HealUsed { .. } => heals += 1,
                    _ => {}
                }
            }
        }

        let seconds = state.time_ticks as f32 / TICKS_PER_SECOND as f32;
        println!("level:        {}", state.level.number());
        println!("seed:         {:#x}", seed);
        println!("outcome:      {:?}", state.phase);
        println!("ticks:        {} ({:.1}s)", state.time_ticks, seconds);
        println!("score:        {}", state.score);
        println!("kills:        {}", kills);
        println!("enemies left: {}", state.enemies_left);
        println!("player hp:    {}/{}", state.player.hp, state.player.max_hp);
        println!("heals used:   {}", heals);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Battle City (native, headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
