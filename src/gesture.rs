//! Touch gesture classification and integration.
//!
//! [`GestureState::begin`] picks a phase from the touch count and records
//! anchors; [`GestureState::integrate`] turns anchor-to-current motion into
//! pending rotation, zoom and pan, which the update step later consumes.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::config::{ControlsConfig, Mode};
use crate::math::shortest_angle;
use crate::phase::{GesturePhase, MapPhase, MoveHandlers, OrbitPhase};

/// Minimum pinch rate, in pixels per millisecond, before a map gesture zooms.
pub const ZOOM_RATE_THRESHOLD: f32 = 0.5;
/// Twist, in radians, below which a map gesture does not rotate.
pub const ROTATE_THRESHOLD: f32 = 0.01;
/// Vertical midpoint travel, in pixels, below which a map gesture does not tilt.
pub const TILT_THRESHOLD: f32 = 2.0;
/// Radians of tilt per pixel of midpoint travel.
const TILT_FACTOR: f32 = 0.01;

/// One active touch in screen pixels, with a timestamp in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub timestamp: f64,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32, timestamp: f64) -> Self {
        Self { x, y, timestamp }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// The first two touches as a pair, if there are exactly two.
fn two(touches: &[TouchPoint]) -> Option<(Vec2, Vec2)> {
    match touches {
        [a, b] => Some((a.position(), b.position())),
        _ => None,
    }
}

/// Single touch position, or the midpoint of two.
fn anchor_point(touches: &[TouchPoint]) -> Option<Vec2> {
    match touches {
        [a] => Some(a.position()),
        [a, b] => Some((a.position() + b.position()) * 0.5),
        _ => None,
    }
}

fn event_time(touches: &[TouchPoint]) -> f64 {
    touches
        .iter()
        .take(2)
        .map(|t| t.timestamp)
        .fold(f64::NEG_INFINITY, f64::max)
}

fn twist(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.y.atan2(d.x)
}

/// Last seen touch geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Anchors {
    pub rotate: Vec2,
    pub pan: Vec2,
    pub distance: f32,
    pub angle: f32,
    pub timestamp: f64,
}

/// Motion waiting to be applied by the update step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Accumulators {
    pub theta_delta: f32,
    pub phi_delta: f32,
    pub pan_offset: Vec3,
    pub scale: f32,
}

impl Default for Accumulators {
    fn default() -> Self {
        Self {
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Accumulators {
    /// Keeps the unapplied share of the rotation and pan; zoom is always fully
    /// applied.
    pub fn decay(&mut self, damping: f32) {
        let keep = 1.0 - damping;
        self.theta_delta *= keep;
        self.phi_delta *= keep;
        self.pan_offset *= keep;
        self.scale = 1.0;
    }
}

/// What the integrator needs to see of the controller.
pub(crate) struct MoveContext<'a> {
    pub config: &'a ControlsConfig,
    pub camera: Option<&'a Camera>,
    pub target: Vec3,
    pub viewport_height: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct GestureState {
    pub phase: GesturePhase,
    pub anchors: Anchors,
    pub acc: Accumulators,
}

impl GestureState {
    pub fn new(mode: Mode) -> Self {
        Self {
            phase: GesturePhase::idle(mode),
            anchors: Anchors::default(),
            acc: Accumulators::default(),
        }
    }

    fn set_phase(&mut self, phase: GesturePhase) {
        if self.phase != phase {
            log::debug!("gesture phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Classifies a new touch set and records its anchors.
    pub fn begin(&mut self, touches: &[TouchPoint], config: &ControlsConfig) {
        if !config.enabled {
            return;
        }

        let phase = match (config.mode, touches) {
            (Mode::Orbit, [t]) if config.enable_rotate => {
                self.anchors.rotate = t.position();
                GesturePhase::Orbit(OrbitPhase::Rotating)
            }
            (Mode::Orbit, [a, b]) if config.enable_zoom || config.enable_pan => {
                if config.enable_zoom {
                    self.anchors.distance = a.position().distance(b.position());
                }
                if config.enable_pan {
                    self.anchors.pan = (a.position() + b.position()) * 0.5;
                }
                GesturePhase::Orbit(OrbitPhase::Dollying)
            }
            (Mode::Map, [t]) if config.enable_pan => {
                self.anchors.pan = t.position();
                GesturePhase::Map(MapPhase::Panning)
            }
            (Mode::Map, [a, b]) => {
                self.anchors.distance = a.position().distance(b.position());
                self.anchors.angle = twist(a.position(), b.position());
                self.anchors.timestamp = event_time(touches);
                self.anchors.pan = (a.position() + b.position()) * 0.5;
                GesturePhase::Map(MapPhase::RotatingOrZooming)
            }
            (mode, _) => GesturePhase::idle(mode),
        };
        self.set_phase(phase);
    }

    /// Lifting the fingers only ends the phase; pending motion keeps decaying.
    pub fn end(&mut self) {
        self.set_phase(GesturePhase::idle(self.phase.mode()));
    }

    /// Drops the phase and all pending motion.
    pub fn clear(&mut self, mode: Mode) {
        self.phase = GesturePhase::idle(mode);
        self.anchors = Anchors::default();
        self.acc = Accumulators::default();
    }

    pub fn integrate(&mut self, touches: &[TouchPoint], ctx: &MoveContext<'_>) {
        if !ctx.config.enabled || touches.len() != self.phase.touch_count() {
            return;
        }

        let handlers = MoveHandlers::gated(self.phase, ctx.config);
        if handlers.rotate {
            self.rotate(touches, ctx);
        }
        if handlers.dolly {
            self.dolly(touches, ctx.config);
        }
        if handlers.pan {
            self.pan(touches, ctx);
        }
        if handlers.rotate_or_zoom {
            self.rotate_or_zoom(touches, ctx.config);
        }
    }

    fn rotate(&mut self, touches: &[TouchPoint], ctx: &MoveContext<'_>) {
        let Some(point) = anchor_point(touches) else {
            return;
        };
        let delta = (point - self.anchors.rotate) * ctx.config.rotate_speed;
        self.anchors.rotate = point;

        let height = ctx.viewport_height;
        if height <= 0.0 {
            log::trace!("rotate skipped: zero viewport height");
            return;
        }
        // Height for both axes keeps rotation free of aspect distortion.
        self.acc.theta_delta -= TAU * delta.x / height;
        self.acc.phi_delta -= TAU * delta.y / height;
    }

    fn dolly(&mut self, touches: &[TouchPoint], config: &ControlsConfig) {
        let Some((a, b)) = two(touches) else {
            return;
        };
        let distance = a.distance(b);
        let previous = self.anchors.distance;
        self.anchors.distance = distance;

        if previous > 0.0 && distance > 0.0 {
            self.acc.scale /= (distance / previous).powf(config.zoom_speed);
        }
    }

    fn pan(&mut self, touches: &[TouchPoint], ctx: &MoveContext<'_>) {
        let Some(point) = anchor_point(touches) else {
            return;
        };
        let delta = (point - self.anchors.pan) * ctx.config.pan_speed;
        self.anchors.pan = point;

        if let Some(offset) = pan_offset(delta, ctx) {
            self.acc.pan_offset += offset;
        }
    }

    fn rotate_or_zoom(&mut self, touches: &[TouchPoint], config: &ControlsConfig) {
        let Some((a, b)) = two(touches) else {
            return;
        };
        let distance = a.distance(b);
        let angle = twist(a, b);
        let midpoint = (a + b) * 0.5;
        let timestamp = event_time(touches);

        let previous = self.anchors;
        self.anchors.distance = distance;
        self.anchors.angle = angle;
        self.anchors.pan = midpoint;
        self.anchors.timestamp = timestamp;

        if config.enable_zoom && previous.distance > 0.0 && distance > 0.0 {
            let rate = pinch_rate(distance - previous.distance, timestamp - previous.timestamp);
            if rate > ZOOM_RATE_THRESHOLD {
                self.acc.scale /= (distance / previous.distance).powf(config.zoom_speed);
            }
        }

        if config.enable_rotate {
            let angle_delta = shortest_angle(previous.angle, angle);
            if angle_delta.abs() > ROTATE_THRESHOLD {
                self.acc.theta_delta -= angle_delta * config.rotate_speed;
            }

            let dy = midpoint.y - previous.pan.y;
            if dy.abs() > TILT_THRESHOLD {
                self.acc.phi_delta += dy * TILT_FACTOR * config.rotate_speed;
            }
        }
    }
}

/// Pixels per millisecond. No elapsed time counts as instantaneous.
fn pinch_rate(distance_change: f32, elapsed_ms: f64) -> f32 {
    let change = distance_change.abs();
    if elapsed_ms > 0.0 {
        change / elapsed_ms as f32
    } else if change > 0.0 {
        f32::INFINITY
    } else {
        0.0
    }
}

/// Converts a pixel drag into a world-space move of the target, along the
/// camera's local X and Y axes.
fn pan_offset(delta: Vec2, ctx: &MoveContext<'_>) -> Option<Vec3> {
    let camera = ctx.camera?;
    let height = ctx.viewport_height;
    if height <= 0.0 {
        log::trace!("pan skipped: zero viewport height");
        return None;
    }

    let target_distance = (camera.position - ctx.target).length();
    let angular_scale = camera.projection().pan_angular_scale(ctx.config.zoom_speed);
    let world_per_pixel = 2.0 * target_distance * angular_scale.to_radians().tan() / height;

    let offset = camera.right() * (-delta.x * world_per_pixel)
        + camera.local_up() * (delta.y * world_per_pixel);
    offset.is_finite().then_some(offset)
}
