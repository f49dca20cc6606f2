//! Flat key/value preferences
//!
//! Two string entries kept for compatibility with older builds of the page:
//! - `muted`: `"0"` or `"1"`, default `0`
//! - `volume`: decimal string in `[0, 1]`, default `"0.8"`

use std::collections::HashMap;

pub const MUTED_KEY: &str = "muted";
pub const VOLUME_KEY: &str = "volume";
pub const DEFAULT_VOLUME: f32 = 0.8;

/// String key/value storage backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - preferences won't persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(key, value);
        }
    }
}

/// User preferences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preferences {
    pub muted: bool,
    /// 0.0 - 1.0
    pub volume: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            muted: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl Preferences {
    /// Read both entries, falling back to defaults for missing or bad values
    pub fn load(store: &impl KeyValueStore) -> Self {
        let muted = store
            .get(MUTED_KEY)
            .and_then(|v| v.trim().parse::<u8>().ok())
            .map(|v| v != 0)
            .unwrap_or(false);
        let volume = store
            .get(VOLUME_KEY)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_VOLUME);
        Self { muted, volume }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(MUTED_KEY, if self.muted { "1" } else { "0" });
        store.set(VOLUME_KEY, &self.volume.to_string());
    }

    /// Flip mute and persist
    pub fn toggle_muted(&mut self, store: &mut impl KeyValueStore) -> bool {
        self.muted = !self.muted;
        store.set(MUTED_KEY, if self.muted { "1" } else { "0" });
        log::info!("Muted: {}", self.muted);
        self.muted
    }

    /// Set volume (clamped) and persist
    pub fn set_volume(&mut self, volume: f32, store: &mut impl KeyValueStore) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        store.set(VOLUME_KEY, &self.volume.to_string());
    }

    /// Volume after mute
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}
