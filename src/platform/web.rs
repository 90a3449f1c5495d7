//! Browser facade
//!
//! JS owns the canvas and the animation loop: it forwards key events, calls
//! [`WebGame::frame`] once per `requestAnimationFrame`, and renders from the
//! JSON snapshot.

use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use super::keys::KeyTracker;
use crate::Settings;
use crate::new_rng;
use crate::sim::{GamePhase, GameState, HealSupply, tick};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
    log::info!("Battle City starting...");
}

fn js_error(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    rng: Pcg32,
    keys: KeyTracker,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    /// `seed` is usually `Date.now()`
    #[wasm_bindgen(constructor)]
    pub fn new(level: u32, seed: f64) -> WebGame {
        let settings = Settings::load();
        let mut state = GameState::new(level);
        settings.apply(&mut state);
        Self {
            state,
            rng: new_rng(seed as u64),
            keys: KeyTracker::new(),
            settings,
        }
    }

    /// Returns true when the key is handled and the page should not scroll
    pub fn key_down(&mut self, code: &str) -> bool {
        self.keys.key_down(code)
    }

    pub fn key_up(&mut self, code: &str) {
        self.keys.key_up(code);
    }

    /// Window lost focus: drop held keys so the tank doesn't keep driving
    pub fn blur(&mut self) {
        self.keys.clear();
    }

    /// Heal availability comes from the meta-progression owned by JS
    pub fn set_heal_supply(&mut self, unlocked: bool, charges: u32) {
        self.state.heal = HealSupply { unlocked, charges };
    }

    pub fn heal_charges(&self) -> u32 {
        self.state.heal.charges
    }

    pub fn select_level(&mut self, level: u32) -> u32 {
        self.state.select_level(level).number()
    }

    pub fn start(&mut self) {
        self.keys.clear();
        self.state.start();
    }

    pub fn open_shop(&mut self) {
        self.state.open_shop();
    }

    pub fn close_shop(&mut self) {
        self.state.close_shop();
    }

    pub fn return_to_menu(&mut self) {
        self.state.return_to_menu();
    }

    /// Replace settings from JSON and persist them
    pub fn apply_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(js_error)?;
        settings.apply(&mut self.state);
        settings.save();
        self.settings = settings;
        Ok(())
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.settings.to_json().map_err(js_error)
    }

    /// Advance exactly one tick
    pub fn frame(&mut self) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        let input = self.keys.snapshot();
        tick(&mut self.state, &input, &mut self.rng);
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.state.phase)
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.snapshot()).map_err(js_error)
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.drain_events()).map_err(js_error)
    }
}
