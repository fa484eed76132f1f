//! Brick Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use brick_breaker::platform::{FrameRequestId, FrameScheduler, Notifier};
    use brick_breaker::renderer::{Palette, RenderState, SceneBuilder};
    use brick_breaker::sim::RoundOutcome;
    use brick_breaker::{Game, Settings};

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame`-backed scheduler sharing one persistent callback
    struct AnimationFrames {
        callback: FrameCallback,
    }

    impl FrameScheduler for AnimationFrames {
        fn request_frame(&mut self) -> Option<FrameRequestId> {
            let window = web_sys::window()?;
            let callback = self.callback.borrow();
            let callback = callback.as_ref()?;
            window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .ok()
                .map(FrameRequestId)
        }

        fn cancel_frame(&mut self, id: FrameRequestId) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id.0);
            }
        }
    }

    /// End-of-round messages via `window.alert` (blocks the page until dismissed)
    struct AlertNotifier {
        blocking: bool,
    }

    impl Notifier for AlertNotifier {
        fn notify(&mut self, outcome: RoundOutcome) {
            log::info!("{}", outcome.message());
            if !self.blocking {
                return;
            }
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(outcome.message());
            }
        }
    }

    /// Game instance holding all state
    struct App {
        game: Game<AnimationFrames, AlertNotifier>,
        scene: SceneBuilder,
        render_state: Option<RenderState>,
        settings: Settings,
    }

    impl App {
        /// One display refresh: simulate, then present what was drawn
        fn frame(&mut self) {
            self.game.on_frame(&mut self.scene);
            self.present();
        }

        fn present(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let background = self.scene.palette().background;
                match render_state.render(self.scene.vertices(), background) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn toggle_contrast(&mut self) {
            self.settings.high_contrast = !self.settings.high_contrast;
            self.scene
                .set_palette(Palette::for_contrast(self.settings.high_contrast));
            self.settings.save();
            log::info!("High contrast: {}", self.settings.high_contrast);
        }

        /// Focus lost: never leave a direction key stuck down
        fn on_focus_lost(&mut self, reason: &str) {
            self.game.release_keys();
            if self.settings.pause_on_blur && self.game.session().is_running() {
                self.game.request_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        console_log::init_with_level(settings.log_level()).expect("Failed to init logger");

        log::info!(
            "Brick Breaker starting ({} quality)...",
            settings.quality.as_str()
        );

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let scene = SceneBuilder::new(
            Palette::for_contrast(settings.high_contrast),
            settings.quality.circle_segments(),
        );
        let app = Rc::new(RefCell::new(App {
            game: Game::new(
                AnimationFrames {
                    callback: callback.clone(),
                },
                AlertNotifier {
                    blocking: settings.blocking_alerts,
                },
            ),
            scene,
            render_state: None,
            settings,
        }));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        {
            let app = app.clone();
            *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                app.borrow_mut().frame();
            }));
        }

        setup_input_handlers(app.clone());
        setup_auto_pause(app.clone());

        app.borrow_mut().game.start();

        log::info!("Brick Breaker running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let key = event.key();
                let mut app = app.borrow_mut();
                if key == "h" || key == "H" {
                    app.toggle_contrast();
                } else if app.game.push_key(&key, true) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().game.push_key(&event.key(), false) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().on_focus_lost("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().on_focus_lost("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Frames simulated by a native run when no count is given
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_HEADLESS_FRAMES: u64 = 2000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brick_breaker::platform::{LogNotifier, ManualScheduler};
    use brick_breaker::renderer::{Palette, SceneBuilder};
    use brick_breaker::{Game, QualityPreset, Settings};

    let settings = Settings::load();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .init();

    let mut args = std::env::args().skip(1);
    let frames = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(DEFAULT_HEADLESS_FRAMES);
    let quality = args
        .next()
        .and_then(|a| QualityPreset::from_name(&a))
        .unwrap_or(settings.quality);

    log::info!(
        "Brick Breaker (native) starting: {} headless frames, {} quality",
        frames,
        quality.as_str()
    );
    log::info!("Native mode has no window - run with `trunk serve` to play");

    let mut game = Game::new(ManualScheduler::new(), LogNotifier::default());
    let mut scene = SceneBuilder::new(
        Palette::for_contrast(settings.high_contrast),
        quality.circle_segments(),
    );

    game.start();
    let mut ran = 0;
    while ran < frames && game.scheduler_mut().fire().is_some() {
        game.on_frame(&mut scene);
        ran += 1;
    }
    game.stop();

    let session = game.session();
    println!(
        "{} frames: {} won, {} lost, {} bricks left, {} vertices in last frame",
        ran,
        session.rounds_won,
        session.rounds_lost,
        session.bricks_remaining,
        scene.vertices().len()
    );
}
