//! Error types for pinchcam.
//!
//! Gesture handling and the update step never fail; a bad frame simply leaves
//! the camera where it is. Only configuration can be rejected.

use thiserror::Error;

/// Problems detected by [`ControlsConfig::validate`](crate::ControlsConfig::validate).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Damping factor must lie in `[0, 1)`.
    #[error("damping factor {0} is outside [0, 1)")]
    DampingFactor(f32),

    /// `min_zoom` exceeds `max_zoom`, or either is NaN.
    #[error("zoom bounds [{min}, {max}] are inverted or not numbers")]
    ZoomBounds {
        /// Lower zoom bound.
        min: f32,
        /// Upper zoom bound.
        max: f32,
    },

    /// Polar bounds must satisfy `0 <= min <= max <= π`.
    #[error("polar bounds [{min}, {max}] must satisfy 0 <= min <= max <= π")]
    PolarBounds {
        /// Lower polar bound.
        min: f32,
        /// Upper polar bound.
        max: f32,
    },

    /// Finite azimuth bounds must lie in `[-2π, 2π]` and span less than a full turn.
    #[error("azimuth bounds [{min}, {max}] must lie in [-2π, 2π] and span less than 2π")]
    AzimuthBounds {
        /// Lower azimuth bound.
        min: f32,
        /// Upper azimuth bound.
        max: f32,
    },

    /// A speed multiplier is negative or not finite.
    #[error("{name} speed {value} must be finite and non-negative")]
    Speed {
        /// Which axis the speed belongs to.
        name: &'static str,
        /// The offending value.
        value: f32,
    },

    /// Unrecognized navigation mode name.
    #[error("unknown navigation mode {0:?} (expected \"orbit\" or \"map\")")]
    UnknownMode(String),
}
