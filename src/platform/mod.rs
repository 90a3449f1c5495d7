//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key codes to per-tick input)
//! - The JS-facing game facade (web only)

pub mod keys;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use keys::{KeyAction, KeyTracker};
