//! Touch gesture camera controls.
//!
//! [`TouchControls`] turns multi-touch input into orbit / pan / zoom (orbit
//! mode) or pan / rotate / tilt-zoom (map mode) motion of a [`Camera`] around
//! a target point, with damping and user-configurable limits.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod app;
pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod gesture;
pub mod input;
pub mod math;
pub mod phase;

pub use camera::{Camera, Projection};
pub use config::{read_js_config, ControlsConfig, Mode};
pub use controls::{ControlsSnapshot, TouchControls};
pub use error::ConfigError;
pub use gesture::TouchPoint;
pub use phase::{GesturePhase, MapPhase, MoveHandlers, OrbitPhase};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {err}").into());
    }
    app::run();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn native_main() {
    env_logger::init();
    app::run();
}
