//! Input-driven shape spawning
//!
//! Translates pointer, touch and keyboard input into spawn requests and runs
//! each spawned element through the recycler: acquire, show, schedule recycle.
//! Platform-independent so the browser shell stays thin.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::recycler::{Handle, Recycler};
use crate::settings::Settings;
use crate::shape::{Shape, ShapeStyle};

/// Owns the recycler and the spawn RNG
pub struct Spawner<E: Shape> {
    recycler: Recycler<E>,
    rng: Pcg32,
    settings: Settings,
    /// Pointer held down (mouse button or pen contact)
    dragging: bool,
    spawned: u64,
}

impl<E: Shape> Spawner<E> {
    pub fn new(seed: u64, settings: Settings, factory: impl FnMut() -> E + 'static) -> Self {
        let settings = settings.sanitized();
        Self {
            recycler: Recycler::new(settings.max_shapes(), factory),
            rng: Pcg32::seed_from_u64(seed),
            settings,
            dragging: false,
            spawned: 0,
        }
    }

    /// Show a random shape centered on `pos`
    pub fn spawn_at(&mut self, pos: Vec2, now_ms: f64) -> Handle {
        let handle = self.recycler.acquire();
        let style = ShapeStyle::random(&mut self.rng, pos);
        if let Some(shape) = self.recycler.element_mut(handle) {
            shape.show(&style);
        }
        self.recycler
            .schedule_recycle(handle, self.settings.shape_lifetime_ms, now_ms);
        self.spawned += 1;
        handle
    }

    pub fn pointer_down(&mut self, pos: Vec2, now_ms: f64) -> Handle {
        self.dragging = true;
        self.spawn_at(pos, now_ms)
    }

    /// Spawn along a drag, thinned out by `pointer_move_spawn_chance`
    pub fn pointer_move(&mut self, pos: Vec2, now_ms: f64) -> Option<Handle> {
        if !self.dragging {
            return None;
        }
        let chance = self.settings.pointer_move_spawn_chance;
        self.rng
            .random_bool(chance)
            .then(|| self.spawn_at(pos, now_ms))
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn pointer_cancel(&mut self) {
        self.dragging = false;
    }

    /// One shape per new touch point
    pub fn touch_start(&mut self, points: &[Vec2], now_ms: f64) -> Vec<Handle> {
        points.iter().map(|p| self.spawn_at(*p, now_ms)).collect()
    }

    /// Each moving touch spawns with `touch_move_spawn_chance`
    pub fn touch_move(&mut self, points: &[Vec2], now_ms: f64) -> Vec<Handle> {
        let chance = self.settings.touch_move_spawn_chance;
        let mut spawned = Vec::new();
        for p in points {
            if self.rng.random_bool(chance) {
                spawned.push(self.spawn_at(*p, now_ms));
            }
        }
        spawned
    }

    /// Space/Enter spawn in the middle of the viewport
    pub fn key(&mut self, key: &str, viewport: Vec2, now_ms: f64) -> Option<Handle> {
        match key {
            " " | "Enter" => Some(self.spawn_at(viewport / 2.0, now_ms)),
            _ => None,
        }
    }

    /// Recycle everything whose display time is over
    pub fn tick(&mut self, now_ms: f64) -> usize {
        self.recycler.advance(now_ms)
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        let settings = settings.sanitized();
        if settings.max_shapes() != self.recycler.capacity() {
            self.recycler.set_capacity(settings.max_shapes());
        }
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn recycler(&self) -> &Recycler<E> {
        &self.recycler
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Total spawns since creation
    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::shape::ShapeState;

    fn spawner(settings: Settings) -> Spawner<ShapeState> {
        Spawner::new(12345, settings, ShapeState::default)
    }

    fn always_spawn() -> Settings {
        Settings {
            pointer_move_spawn_chance: 1.0,
            touch_move_spawn_chance: 1.0,
            ..Settings::default()
        }
    }

    #[test]
    fn test_spawn_shows_then_recycles() {
        let mut s = spawner(Settings::default());
        let pos = Vec2::new(120.0, 80.0);
        let h = s.spawn_at(pos, 0.0);

        let shape = s.recycler().element(h).expect("live shape");
        assert!(shape.is_visible());
        assert_eq!(shape.style.map(|st| st.center), Some(pos));
        assert!(shape.layout.is_some());

        assert_eq!(s.tick(1599.0), 0);
        assert_eq!(s.tick(1601.0), 1);
        assert!(s.recycler().is_pooled(h));
        // No leftover rotation/color/size from the previous display
        assert_eq!(s.recycler().element(h), Some(&ShapeState::default()));
    }

    #[test]
    fn test_respawn_reuses_pooled_element() {
        let mut s = spawner(Settings::default());
        let first = s.spawn_at(Vec2::ZERO, 0.0);
        s.tick(2000.0);
        let second = s.spawn_at(Vec2::new(5.0, 5.0), 2000.0);
        assert_eq!(first, second);
        assert_eq!(s.recycler().stats().allocated, 1);
        assert_eq!(s.recycler().stats().reused, 1);
    }

    #[test]
    fn test_pointer_move_requires_drag() {
        let mut s = spawner(always_spawn());
        assert!(s.pointer_move(Vec2::ZERO, 0.0).is_none());

        s.pointer_down(Vec2::ZERO, 0.0);
        assert!(s.is_dragging());
        assert!(s.pointer_move(Vec2::ONE, 1.0).is_some());

        s.pointer_up();
        assert!(s.pointer_move(Vec2::ONE, 2.0).is_none());

        s.pointer_down(Vec2::ZERO, 3.0);
        s.pointer_cancel();
        assert!(!s.is_dragging());
        assert_eq!(s.spawned(), 3);
    }

    #[test]
    fn test_move_chance_zero_never_spawns() {
        let mut s = spawner(Settings {
            pointer_move_spawn_chance: 0.0,
            touch_move_spawn_chance: 0.0,
            ..Settings::default()
        });
        s.pointer_down(Vec2::ZERO, 0.0);
        for i in 0..100 {
            assert!(s.pointer_move(Vec2::splat(i as f32), i as f64).is_none());
        }
        assert!(s.touch_move(&[Vec2::ZERO, Vec2::ONE], 0.0).is_empty());
        assert_eq!(s.spawned(), 1);
    }

    #[test]
    fn test_touch_start_spawns_every_point() {
        let mut s = spawner(Settings::default());
        let points = [Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0)];
        let handles = s.touch_start(&points, 0.0);
        assert_eq!(handles.len(), 3);
        assert_eq!(s.recycler().in_use_len(), 3);
        assert!(s.touch_move(&[], 1.0).is_empty());
    }

    #[test]
    fn test_touch_move_with_full_chance() {
        let mut s = spawner(always_spawn());
        let handles = s.touch_move(&[Vec2::ZERO, Vec2::ONE], 0.0);
        assert_eq!(handles.len(), 2);
    }

    #[test]
    fn test_key_spawns_at_viewport_center() {
        let mut s = spawner(Settings::default());
        let viewport = Vec2::new(800.0, 600.0);
        let h = s.key("Enter", viewport, 0.0).expect("enter spawns");
        let center = s.recycler().element(h).and_then(|e| e.style).map(|st| st.center);
        assert_eq!(center, Some(Vec2::new(400.0, 300.0)));

        assert!(s.key(" ", viewport, 0.0).is_some());
        assert!(s.key("a", viewport, 0.0).is_none());
    }

    #[test]
    fn test_burst_is_bounded_by_capacity() {
        let mut s = spawner(Settings::from_preset(QualityPreset::Low));
        for i in 0..500 {
            s.spawn_at(Vec2::splat(i as f32), i as f64);
            assert!(s.recycler().len() <= 20);
        }
        assert_eq!(s.recycler().stats().allocated, 20);
        assert!(s.recycler().stats().fallbacks > 0);

        // Everything drains once spawning stops
        s.tick(10_000.0);
        assert_eq!(s.recycler().in_use_len(), 0);
        assert_eq!(s.recycler().pool_len(), 20);
    }

    #[test]
    fn test_apply_settings_resizes_pool() {
        let mut s = spawner(Settings::default());
        for i in 0..30 {
            s.spawn_at(Vec2::ZERO, i as f64);
        }
        s.tick(5000.0);
        assert_eq!(s.recycler().pool_len(), 30);

        s.apply_settings(Settings::from_preset(QualityPreset::Low));
        assert_eq!(s.recycler().capacity(), 20);
        assert_eq!(s.recycler().pool_len(), 20);
    }

    #[test]
    fn test_custom_lifetime() {
        let mut s = spawner(Settings {
            shape_lifetime_ms: 300.0,
            ..Settings::default()
        });
        let h = s.spawn_at(Vec2::ZERO, 100.0);
        assert_eq!(s.tick(399.0), 0);
        assert_eq!(s.tick(400.0), 1);
        assert!(s.recycler().is_pooled(h));
    }

    #[test]
    fn test_same_seed_same_shapes() {
        let mut a = spawner(Settings::default());
        let mut b = spawner(Settings::default());
        for i in 0..10 {
            let p = Vec2::splat(i as f32 * 10.0);
            let ha = a.spawn_at(p, 0.0);
            let hb = b.spawn_at(p, 0.0);
            assert_eq!(a.recycler().element(ha), b.recycler().element(hb));
        }
    }
}
