//! Shape Splash - tap, drag or type to splash shapes across the screen
//!
//! Core modules:
//! - `recycler`: Capped element pool with deferred, cancellable recycling
//! - `timer`: Deterministic single-shot timer queue
//! - `shape`: Random shape parameters and box geometry
//! - `spawn`: Input handling that drives the recycler
//! - `settings` / `prefs`: Persisted configuration
//! - `dom`: Browser presentation (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod prefs;
pub mod recycler;
pub mod settings;
pub mod shape;
pub mod spawn;
pub mod timer;

pub use prefs::{KeyValueStore, MemoryStore, Preferences};
pub use recycler::{Element, Handle, Reclaim, Recycler, RecyclerStats};
pub use settings::{QualityPreset, Settings};
pub use shape::{Shape, ShapeKind, ShapeState, ShapeStyle};
pub use spawn::Spawner;

/// Splash configuration constants
pub mod consts {
    /// Default cap on shape elements kept alive (pooled + shown)
    pub const POOL_MAX: usize = 60;
    /// How long a shape stays up before it is recycled (ms)
    pub const RECYCLE_DELAY_MS: f64 = 1600.0;

    /// Shape size range (px, inclusive)
    pub const SHAPE_SIZE_MIN: u32 = 26;
    pub const SHAPE_SIZE_MAX: u32 = 110;
}
