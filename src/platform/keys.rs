//! Keyboard state to per-tick input
//!
//! Works on `KeyboardEvent.code` strings so layouts don't matter. Arrows and
//! WASD move, Space fires, R heals.

use crate::sim::{Direction, TickInput};

/// What a physical key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Fire,
    Heal,
}

impl KeyAction {
    pub fn from_code(code: &str) -> Option<Self> {
        let action = match code {
            "ArrowUp" | "KeyW" => KeyAction::Move(Direction::Up),
            "ArrowDown" | "KeyS" => KeyAction::Move(Direction::Down),
            "ArrowLeft" | "KeyA" => KeyAction::Move(Direction::Left),
            "ArrowRight" | "KeyD" => KeyAction::Move(Direction::Right),
            "Space" => KeyAction::Fire,
            "KeyR" => KeyAction::Heal,
            _ => return None,
        };
        Some(action)
    }
}

/// Held keys, in press order
#[derive(Debug, Clone, Default)]
pub struct KeyTracker {
    /// Held movement keys by code, most recent last
    held: Vec<(String, Direction)>,
    fire: bool,
    heal_pressed: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is one the game uses (caller should suppress the default action)
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(action) = KeyAction::from_code(code) else {
            return false;
        };
        match action {
            KeyAction::Move(direction) => {
                // Auto-repeat must not reorder the stack
                if !self.held.iter().any(|(c, _)| c == code) {
                    self.held.push((code.to_string(), direction));
                }
            }
            KeyAction::Fire => self.fire = true,
            KeyAction::Heal => self.heal_pressed = true,
        }
        true
    }

    pub fn key_up(&mut self, code: &str) {
        match KeyAction::from_code(code) {
            Some(KeyAction::Move(_)) => self.held.retain(|(c, _)| c != code),
            Some(KeyAction::Fire) => self.fire = false,
            Some(KeyAction::Heal) | None => {}
        }
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        self.held.clear();
        self.fire = false;
        self.heal_pressed = false;
    }

    /// Input for the next tick. Heal fires once per press.
    pub fn snapshot(&mut self) -> TickInput {
        TickInput {
            moves: self.held.iter().map(|(_, d)| *d).collect(),
            fire: self.fire,
            heal: std::mem::take(&mut self.heal_pressed),
        }
    }
}
