//! Splash settings
//!
//! Persisted as JSON in LocalStorage, separate from the flat preference keys.

use serde::{Deserialize, Serialize};

use crate::consts::{POOL_MAX, RECYCLE_DELAY_MS};

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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum shape elements kept alive for this preset
    pub fn max_shapes(&self) -> usize {
        match self {
            QualityPreset::Low => 20,
            QualityPreset::Medium => POOL_MAX,
            QualityPreset::High => 120,
        }
    }
}

/// Splash settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pool capacity preset
    pub quality: QualityPreset,
    /// How long a shape stays on screen before it is recycled
    pub shape_lifetime_ms: f64,
    /// Chance that a drag move spawns a shape (0.0 - 1.0)
    pub pointer_move_spawn_chance: f64,
    /// Chance that each moving touch spawns a shape (0.0 - 1.0)
    pub touch_move_spawn_chance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            shape_lifetime_ms: RECYCLE_DELAY_MS,
            pointer_move_spawn_chance: 0.4,
            touch_move_spawn_chance: 0.25,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective pool capacity
    pub fn max_shapes(&self) -> usize {
        self.quality.max_shapes()
    }

    /// Clamp out-of-range values (hand-edited storage, old versions)
    pub fn sanitized(mut self) -> Self {
        self.pointer_move_spawn_chance = sanitize_chance(self.pointer_move_spawn_chance);
        self.touch_move_spawn_chance = sanitize_chance(self.touch_move_spawn_chance);
        if !self.shape_lifetime_ms.is_finite() || self.shape_lifetime_ms < 0.0 {
            self.shape_lifetime_ms = RECYCLE_DELAY_MS;
        }
        self
    }

    /// Parse settings JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring corrupt settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shape_splash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
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

fn sanitize_chance(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
