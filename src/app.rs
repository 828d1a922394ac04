use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{Vec2, Vec3};
use web_time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::{Camera, Projection};
use crate::config::{read_js_config, ControlsConfig, Mode};
use crate::controls::TouchControls;
use crate::input::{TouchChange, TouchTracker};

// Demo scene constants
const FOV_DEGREES: f32 = 50.0;
const ORTHO_HALF_HEIGHT: f32 = 8.0;
const START_POSITION: Vec3 = Vec3::new(0.0, 6.0, 16.0);

struct AppState {
    window: Arc<Window>,
    controls: TouchControls,
    input: TouchTracker,
    redraw_pending: Arc<AtomicBool>,
    started: Instant,
}

impl AppState {
    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn forward(&mut self, change: TouchChange) {
        let points = self.input.points(self.now_ms());
        match change {
            TouchChange::Begin => self.controls.on_touch_start(&points),
            TouchChange::Move => self.controls.on_touch_move(&points),
            TouchChange::End => self.controls.on_touch_end(),
            TouchChange::Ignored => return,
        }
        self.window.request_redraw();
    }

    fn toggle_mode(&mut self) {
        let mode = match self.controls.config().mode {
            Mode::Orbit => Mode::Map,
            Mode::Map => Mode::Orbit,
        };
        log::info!("switching to {mode} mode");
        let config = ControlsConfig {
            mode,
            ..self.controls.config().clone()
        };
        self.controls.set_config(config);
    }

    fn toggle_projection(&mut self) {
        let Some(camera) = self.controls.camera_mut() else {
            return;
        };
        let projection = match *camera.projection() {
            Projection::Perspective { aspect, .. } => Projection::Orthographic {
                zoom: 1.0,
                half_height: ORTHO_HALF_HEIGHT,
                aspect,
            },
            Projection::Orthographic { aspect, .. } => Projection::Perspective {
                fov: FOV_DEGREES,
                aspect,
            },
        };
        log::info!("projection: {:?}", projection);
        camera.set_projection(projection);
        self.window.request_redraw();
    }
}

struct App {
    state: Option<AppState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes().with_title("pinchcam");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attributes =
            window_attributes.with_inner_size(winit::dpi::PhysicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;

            if let (Some(canvas), Some(document)) = (
                window.canvas(),
                web_sys::window().and_then(|w| w.document()),
            ) {
                if let Some(container) = document.get_element_by_id("canvas") {
                    // Replace placeholder with canvas
                    let _ = container.replace_with_with_node_1(&canvas);
                } else if let Some(body) = document.body() {
                    let _ = body.append_child(&canvas);
                }
            }
        }

        let size = window.inner_size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;

        let mut camera = Camera::perspective(FOV_DEGREES, aspect);
        camera.position = START_POSITION;
        camera.look_at(Vec3::ZERO);

        let mut controls = TouchControls::new(read_js_config());
        controls.attach_camera(camera);
        controls.set_viewport_height(size.height as f32);

        let redraw_pending = Arc::new(AtomicBool::new(true));
        let flag = redraw_pending.clone();
        controls.set_redraw_requester(move || flag.store(true, Ordering::Relaxed));
        controls.set_change_listener(|snapshot| {
            log::debug!(
                "camera at {} looking at {} (r = {:.3}, phi = {:.3}, theta = {:.3})",
                snapshot.position,
                snapshot.target,
                snapshot.spherical.radius,
                snapshot.spherical.phi,
                snapshot.spherical.theta,
            );
        });

        log::info!("pinchcam ready - size: {}x{}", size.width, size.height);

        self.state = Some(AppState {
            window,
            controls,
            input: TouchTracker::new(),
            redraw_pending,
            started: Instant::now(),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                state.controls.set_viewport_height(physical_size.height as f32);
                if let Some(camera) = state.controls.camera_mut() {
                    camera.set_aspect(
                        physical_size.width.max(1) as f32 / physical_size.height.max(1) as f32,
                    );
                }
                state.window.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    PhysicalKey::Code(KeyCode::KeyM) => state.toggle_mode(),
                    PhysicalKey::Code(KeyCode::KeyP) => state.toggle_projection(),
                    PhysicalKey::Code(KeyCode::KeyR) => {
                        state.controls.reset();
                    }
                    _ => {}
                }
            }

            WindowEvent::Touch(touch) => {
                let change = state.input.handle_touch(&touch);
                state.forward(change);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button: MouseButton::Left,
                ..
            } => {
                let change = state.input.handle_mouse_button(btn_state);
                state.forward(change);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let change = state
                    .input
                    .handle_mouse_move(Vec2::new(position.x as f32, position.y as f32));
                state.forward(change);
            }

            WindowEvent::RedrawRequested => {
                // A renderer would draw the scene with the camera here.
                state.controls.update();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.redraw_pending.swap(false, Ordering::Relaxed) {
                state.window.request_redraw();
            }
        }
    }
}

pub fn run() {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
    }
}
