//! Shape Splash entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_splash {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, KeyboardEvent, PointerEvent, TouchEvent, TouchList};

    use shape_splash::dom::DomShape;
    use shape_splash::prefs::LocalStore;
    use shape_splash::{Preferences, Settings, Spawner};

    /// Splash instance holding all state
    struct Splash {
        spawner: Spawner<DomShape>,
        prefs: Preferences,
        store: LocalStore,
        last_stats_log: f64,
    }

    /// Milliseconds since page load
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn viewport() -> Vec2 {
        let Some(window) = web_sys::window() else {
            return Vec2::ZERO;
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(w as f32, h as f32)
    }

    fn touch_points(list: &TouchList) -> Vec<Vec2> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
            .collect()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Shape Splash starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };
        let Some(app) = document
            .get_element_by_id("app")
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        else {
            log::error!("No #app element - cannot start");
            return;
        };

        let settings = Settings::load();
        let store = LocalStore::new();
        let prefs = Preferences::load(&store);
        log::info!(
            "Pool capacity {}, shape lifetime {}ms, muted {}, volume {}",
            settings.max_shapes(),
            settings.shape_lifetime_ms,
            prefs.muted,
            prefs.volume
        );

        let factory = {
            let document = document.clone();
            let app: web_sys::Element = app.clone().into();
            move || DomShape::create(&document, &app)
        };
        let seed = js_sys::Date::now() as u64;
        let splash = Rc::new(RefCell::new(Splash {
            spawner: Spawner::new(seed, settings, factory),
            prefs,
            store,
            last_stats_log: 0.0,
        }));

        fit_to_viewport(&app);
        setup_input_handlers(&app, splash.clone());
        request_animation_frame(splash);

        log::info!("Shape Splash running!");
    }

    /// Make the surface fill the viewport height (mobile browser bars)
    fn fit_to_viewport(app: &HtmlElement) {
        let _ = app
            .style()
            .set_property("height", &format!("{}px", viewport().y));
    }

    fn setup_input_handlers(app: &HtmlElement, splash: Rc<RefCell<Splash>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Pointer down - spawn and start a drag
        {
            let splash = splash.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                splash.borrow_mut().spawner.pointer_down(pos, now_ms());
            });
            let _ = app
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move - thinned-out trail while dragging
        {
            let splash = splash.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                splash.borrow_mut().spawner.pointer_move(pos, now_ms());
            });
            let _ = app
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up/cancel anywhere ends the drag
        for event_name in ["pointerup", "pointercancel"] {
            let splash = splash.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                splash.borrow_mut().spawner.pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - every new finger spawns
        {
            let splash = splash.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let points = touch_points(&event.changed_touches());
                splash.borrow_mut().spawner.touch_start(&points, now_ms());
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(true);
            let _ = app.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Touch move
        {
            let splash = splash.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let points = touch_points(&event.changed_touches());
                splash.borrow_mut().spawner.touch_move(&points, now_ms());
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(true);
            let _ = app.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Keyboard
        {
            let splash = splash.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut s = splash.borrow_mut();
                match event.key().as_str() {
                    "m" | "M" => {
                        let Splash { prefs, store, .. } = &mut *s;
                        prefs.toggle_muted(store);
                    }
                    key => {
                        s.spawner.key(key, viewport(), now_ms());
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                fit_to_viewport(&app);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(splash: Rc<RefCell<Splash>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(splash, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(splash: Rc<RefCell<Splash>>, time: f64) {
        {
            let mut s = splash.borrow_mut();
            s.spawner.tick(time);

            // Pool stats every 10s
            if time - s.last_stats_log > 10_000.0 {
                s.last_stats_log = time;
                let r = s.spawner.recycler();
                log::debug!(
                    "Shapes: {} shown, {} pooled, stats {:?}",
                    r.in_use_len(),
                    r.pool_len(),
                    r.stats()
                );
            }
        }

        request_animation_frame(splash);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_splash::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shape Splash (native) starting...");
    log::info!("Native mode has no display - run with `trunk serve` for the web version");

    println!("\nRunning headless splash...");
    headless_splash();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the spawner with a synthetic drag and print pool usage
#[cfg(not(target_arch = "wasm32"))]
fn headless_splash() {
    use glam::Vec2;
    use shape_splash::{Settings, ShapeState, Spawner};

    let settings = Settings::load();
    let capacity = settings.max_shapes();
    let mut spawner = Spawner::new(42, settings, ShapeState::default);

    // 3 seconds of dragging at 120 events/s, then let everything expire
    let mut now = 0.0;
    spawner.pointer_down(Vec2::new(100.0, 100.0), now);
    for i in 0..360 {
        now = i as f64 * (1000.0 / 120.0);
        let pos = Vec2::new(100.0 + i as f32 * 2.0, 100.0 + (i as f32 * 0.1).sin() * 50.0);
        spawner.pointer_move(pos, now);
        spawner.tick(now);
        assert!(spawner.recycler().len() <= capacity);
    }
    spawner.pointer_up();
    spawner.tick(now + 2000.0);

    let r = spawner.recycler();
    println!(
        "✓ {} spawns, {} elements alive (cap {}), {:?}",
        spawner.spawned(),
        r.len(),
        capacity,
        r.stats()
    );
}
