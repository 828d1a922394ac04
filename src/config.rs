use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Interaction scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// One finger rotates around the target, two fingers dolly and pan.
    #[default]
    Orbit,
    /// One finger pans, two fingers rotate, zoom and tilt together.
    Map,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orbit" => Ok(Mode::Orbit),
            "map" => Ok(Mode::Map),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Orbit => f.write_str("orbit"),
            Mode::Map => f.write_str("map"),
        }
    }
}

/// Control parameters. Owned by the host and replaced wholesale through
/// [`TouchControls::set_config`](crate::TouchControls::set_config); the
/// controller only reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlsConfig {
    pub enabled: bool,
    pub mode: Mode,

    /// Distance limits for perspective cameras, zoom factor limits for
    /// orthographic ones.
    pub min_zoom: f32,
    pub max_zoom: f32,

    /// Radians in `[0, π]`.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    /// Radians. Unbounded when either is infinite.
    pub min_azimuth_angle: f32,
    pub max_azimuth_angle: f32,

    pub enable_damping: bool,
    /// Fraction of the pending delta applied each frame, in `[0, 1)`.
    pub damping_factor: f32,

    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub enable_rotate: bool,
    pub rotate_speed: f32,
    pub enable_pan: bool,
    pub pan_speed: f32,

    /// Don't claim a gesture on touch start; wait for the first move so taps
    /// fall through to the host.
    pub ignore_quick_press: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: Mode::Orbit,
            min_zoom: 0.0,
            max_zoom: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            min_azimuth_angle: f32::NEG_INFINITY,
            max_azimuth_angle: f32::INFINITY,
            enable_damping: true,
            damping_factor: 0.1,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_rotate: true,
            rotate_speed: 1.0,
            enable_pan: true,
            pan_speed: 1.0,
            ignore_quick_press: false,
        }
    }
}

impl ControlsConfig {
    /// Per-frame fraction applied from the accumulators.
    pub fn effective_damping(&self) -> f32 {
        if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(ConfigError::DampingFactor(self.damping_factor));
        }

        if self.min_zoom.is_nan() || self.max_zoom.is_nan() || self.min_zoom > self.max_zoom {
            return Err(ConfigError::ZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        let (min, max) = (self.min_polar_angle, self.max_polar_angle);
        if !(0.0..=PI).contains(&min) || !(0.0..=PI).contains(&max) || min > max {
            return Err(ConfigError::PolarBounds { min, max });
        }

        let (min, max) = (self.min_azimuth_angle, self.max_azimuth_angle);
        if min.is_nan() || max.is_nan() {
            return Err(ConfigError::AzimuthBounds { min, max });
        }
        if min.is_finite() && max.is_finite() {
            let in_range = (-TAU..=TAU).contains(&min) && (-TAU..=TAU).contains(&max);
            if !in_range || (max - min).abs() >= TAU {
                return Err(ConfigError::AzimuthBounds { min, max });
            }
        }

        for (name, value) in [
            ("zoom", self.zoom_speed),
            ("rotate", self.rotate_speed),
            ("pan", self.pan_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Speed { name, value });
            }
        }

        Ok(())
    }
}

/// Reads overrides from `window.pinchcamConfig`. Missing keys keep defaults.
#[cfg(target_arch = "wasm32")]
pub fn read_js_config() -> ControlsConfig {
    let defaults = ControlsConfig::default();
    let Some(window) = web_sys::window() else {
        return defaults;
    };
    let params = match js_sys::Reflect::get(&window, &JsValue::from_str("pinchcamConfig")) {
        Ok(params) if params.is_object() => params,
        _ => return defaults,
    };

    let get = |key: &str| js_sys::Reflect::get(&params, &key.into()).ok();
    let get_f32 = |key: &str, default: f32| -> f32 {
        get(key)
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
            .unwrap_or(default)
    };
    let get_bool = |key: &str, default: bool| -> bool {
        get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    };

    let mode = match get("mode").and_then(|v| v.as_string()) {
        Some(name) => name.parse().unwrap_or_else(|err| {
            log::warn!("{err}; falling back to {}", defaults.mode);
            defaults.mode
        }),
        None => defaults.mode,
    };

    ControlsConfig {
        enabled: get_bool("enabled", defaults.enabled),
        mode,
        min_zoom: get_f32("minZoom", defaults.min_zoom),
        max_zoom: get_f32("maxZoom", defaults.max_zoom),
        min_polar_angle: get_f32("minPolarAngle", defaults.min_polar_angle),
        max_polar_angle: get_f32("maxPolarAngle", defaults.max_polar_angle),
        min_azimuth_angle: get_f32("minAzimuthAngle", defaults.min_azimuth_angle),
        max_azimuth_angle: get_f32("maxAzimuthAngle", defaults.max_azimuth_angle),
        enable_damping: get_bool("enableDamping", defaults.enable_damping),
        damping_factor: get_f32("dampingFactor", defaults.damping_factor),
        enable_zoom: get_bool("enableZoom", defaults.enable_zoom),
        zoom_speed: get_f32("zoomSpeed", defaults.zoom_speed),
        enable_rotate: get_bool("enableRotate", defaults.enable_rotate),
        rotate_speed: get_f32("rotateSpeed", defaults.rotate_speed),
        enable_pan: get_bool("enablePan", defaults.enable_pan),
        pan_speed: get_f32("panSpeed", defaults.pan_speed),
        ignore_quick_press: get_bool("ignoreQuickPress", defaults.ignore_quick_press),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read_js_config() -> ControlsConfig {
    ControlsConfig::default()
}
