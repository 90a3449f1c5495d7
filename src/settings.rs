//! Player preferences
//!
//! Persisted in LocalStorage on the web. The only setting the simulation sees
//! is the cosmetic particle budget.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (explosions, smoke, boss auras)
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Push the particle budget into a running game
    pub fn apply(&self, state: &mut GameState) {
        state.max_particles = self.max_particles();
        state.particles.truncate(state.max_particles);
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "battle_city_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Could not serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Particle, ParticleKind};
    use glam::Vec2;

    #[test]
    fn test_particle_budget() {
        assert_eq!(Settings::default().max_particles(), 500);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_particles(), 2000);
        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(QualityPreset::parse("LOW"), Some(QualityPreset::Low));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_json() {
        let settings = Settings::from_json(r#"{"quality":"Low"}"#).expect("partial settings parse");
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.particles);
        assert!(Settings::from_json("not json").is_err());

        let json = settings.to_json().expect("serialize");
        assert_eq!(Settings::from_json(&json).expect("parse"), settings);
    }

    #[test]
    fn test_apply_trims_particles() {
        let mut state = GameState::new(1);
        for _ in 0..10 {
            state.emit(Particle::new(ParticleKind::Smoke, Vec2::ZERO, 5));
        }
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        settings.apply(&mut state);
        assert!(state.particles.is_empty());
        state.emit(Particle::new(ParticleKind::Smoke, Vec2::ZERO, 5));
        assert!(state.particles.is_empty());
    }
}
