//! The controller the host talks to: touch callbacks in, camera motion out.

use std::fmt;

use glam::{Quat, Vec3};

use crate::camera::Camera;
use crate::config::ControlsConfig;
use crate::gesture::{GestureState, MoveContext, TouchPoint};
use crate::math::{clamp_azimuth, clamp_safe, wrap_angle, Spherical, EPS};
use crate::phase::GesturePhase;

type ChangeListener = Box<dyn FnMut(&ControlsSnapshot) + Send>;
type RedrawRequester = Box<dyn FnMut() + Send>;

/// State handed to the change listener after the camera moved.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlsSnapshot {
    pub config: ControlsConfig,
    pub target: Vec3,
    pub position: Vec3,
    pub rotation: Quat,
    /// Orthographic zoom, `None` for perspective cameras.
    pub zoom: Option<f32>,
    pub spherical: Spherical,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SavedState {
    target: Vec3,
    position: Option<Vec3>,
    zoom: Option<f32>,
}

/// Touch-driven orbit / map camera controls.
///
/// The host feeds touch events through [`TouchControls::on_touch_start`],
/// [`TouchControls::on_touch_move`] and [`TouchControls::on_touch_end`], and
/// calls [`TouchControls::update`] once per frame. Gesture callbacks only
/// accumulate motion; the camera and target change exclusively in `update`.
///
/// All calls must be serialized by the host. Nothing here locks.
pub struct TouchControls {
    config: ControlsConfig,
    target: Vec3,
    camera: Option<Camera>,
    viewport_height: f32,
    spherical: Spherical,
    gesture: GestureState,
    last_position: Vec3,
    last_rotation: Quat,
    saved: Option<SavedState>,
    change_listener: Option<ChangeListener>,
    redraw_requester: Option<RedrawRequester>,
}

impl TouchControls {
    pub fn new(config: ControlsConfig) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("applying invalid controls config: {err}");
        }
        Self {
            gesture: GestureState::new(config.mode),
            config,
            target: Vec3::ZERO,
            camera: None,
            viewport_height: 0.0,
            spherical: Spherical::default(),
            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            saved: None,
            change_listener: None,
            redraw_requester: None,
        }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    /// Replaces the configuration. Invalid values are applied anyway (with a
    /// warning) and bounds go through `clamp_safe`. A mode switch ends the
    /// current gesture but keeps pending motion.
    pub fn set_config(&mut self, config: ControlsConfig) {
        if let Err(err) = config.validate() {
            log::warn!("applying invalid controls config: {err}");
        }
        if config.mode != self.config.mode {
            log::debug!("controls mode {} -> {}", self.config.mode, config.mode);
            self.gesture.phase = GesturePhase::idle(config.mode);
        }
        self.config = config;
    }

    /// Attaches a camera, returning the previous one. The camera's current
    /// pose becomes the change-detection baseline and the state restored by
    /// [`TouchControls::reset`].
    pub fn attach_camera(&mut self, camera: Camera) -> Option<Camera> {
        log::debug!(
            "camera attached ({})",
            if camera.projection().is_perspective() {
                "perspective"
            } else {
                "orthographic"
            }
        );
        self.last_position = camera.position;
        self.last_rotation = camera.rotation;
        self.spherical = spherical_of(&camera, self.target);
        let previous = self.camera.replace(camera);
        self.save_state();
        previous
    }

    pub fn detach_camera(&mut self) -> Option<Camera> {
        log::debug!("camera detached");
        self.camera.take()
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Heights that are not positive and finite disable pixel conversion.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = if height.is_finite() && height > 0.0 {
            height
        } else {
            0.0
        };
    }

    pub fn phase(&self) -> GesturePhase {
        self.gesture.phase
    }

    /// Polar angle from the up axis as of the last update.
    pub fn polar_angle(&self) -> f32 {
        self.spherical.phi
    }

    /// Azimuth as of the last update.
    pub fn azimuthal_angle(&self) -> f32 {
        self.spherical.theta
    }

    /// Camera-to-target distance as of the last update.
    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    pub fn set_change_listener(&mut self, listener: impl FnMut(&ControlsSnapshot) + Send + 'static) {
        self.change_listener = Some(Box::new(listener));
    }

    pub fn set_redraw_requester(&mut self, requester: impl FnMut() + Send + 'static) {
        self.redraw_requester = Some(Box::new(requester));
    }

    /// Whether a touch start should be claimed as a gesture. With
    /// `ignore_quick_press`, gestures only begin once the fingers move.
    pub fn claims_touch_start(&self) -> bool {
        self.config.enabled && !self.config.ignore_quick_press
    }

    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) {
        if !self.claims_touch_start() {
            return;
        }
        self.gesture.begin(touches, &self.config);
    }

    /// Integrates a move. If the touch count no longer matches the active
    /// phase, the touch set is classified again first, so anchors never lag
    /// behind the fingers.
    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) {
        if !self.config.enabled {
            return;
        }
        if touches.len() != self.gesture.phase.touch_count() {
            self.gesture.begin(touches, &self.config);
        }

        let ctx = MoveContext {
            config: &self.config,
            camera: self.camera.as_ref(),
            target: self.target,
            viewport_height: self.viewport_height,
        };
        self.gesture.integrate(touches, &ctx);
    }

    /// Ends the gesture. Pending motion is kept and settles through damping.
    pub fn on_touch_end(&mut self) {
        self.gesture.end();
    }

    /// Applies pending motion to the camera. Returns true, and notifies the
    /// host, only when the camera visibly changed.
    pub fn update(&mut self) -> bool {
        let Some(camera) = self.camera.as_mut() else {
            log::trace!("update skipped: no camera attached");
            return false;
        };
        let config = &self.config;
        let acc = &mut self.gesture.acc;

        // Work in a frame where the camera's up vector is +Y.
        let quat = Quat::from_rotation_arc(camera.up.try_normalize().unwrap_or(Vec3::Y), Vec3::Y);
        let quat_inverse = quat.inverse();

        let mut spherical = Spherical::from_vec3(quat * (camera.position - self.target));

        let damping = config.effective_damping();
        spherical.theta = wrap_angle(spherical.theta + acc.theta_delta * damping);
        spherical.phi += acc.phi_delta * damping;

        spherical.theta = clamp_azimuth(
            spherical.theta,
            config.min_azimuth_angle,
            config.max_azimuth_angle,
        );
        spherical.phi = clamp_safe(
            spherical.phi,
            config.min_polar_angle.max(0.0) + EPS,
            config.max_polar_angle.min(std::f32::consts::PI) - EPS,
        );

        let mut zoom_changed = false;
        match camera.zoom() {
            None => {
                spherical.radius =
                    clamp_safe(spherical.radius * acc.scale, config.min_zoom, config.max_zoom);
            }
            Some(zoom) => {
                let next = if acc.scale != 1.0 {
                    zoom / (acc.scale * config.zoom_speed)
                } else {
                    zoom
                };
                let next = clamp_safe(next, config.min_zoom, config.max_zoom);
                if next != zoom && next.is_finite() && next > 0.0 {
                    camera.set_zoom(next);
                    camera.update_projection_matrix();
                    zoom_changed = true;
                }
            }
        }

        self.target += acc.pan_offset * damping;

        camera.position = self.target + quat_inverse * spherical.to_vec3();
        camera.look_at(self.target);

        acc.decay(damping);
        self.spherical = spherical;

        let moved = self.last_position.distance_squared(camera.position) > EPS
            || 8.0 * (1.0 - self.last_rotation.dot(camera.rotation).abs()) > EPS;
        if !(moved || zoom_changed) {
            return false;
        }

        self.last_position = camera.position;
        self.last_rotation = camera.rotation;
        self.notify();
        true
    }

    pub fn snapshot(&self) -> Option<ControlsSnapshot> {
        let camera = self.camera.as_ref()?;
        Some(ControlsSnapshot {
            config: self.config.clone(),
            target: self.target,
            position: camera.position,
            rotation: camera.rotation,
            zoom: camera.zoom(),
            spherical: self.spherical,
        })
    }

    /// Remembers the target, camera position and zoom for [`TouchControls::reset`].
    pub fn save_state(&mut self) {
        self.saved = Some(SavedState {
            target: self.target,
            position: self.camera.as_ref().map(|c| c.position),
            zoom: self.camera.as_ref().and_then(Camera::zoom),
        });
    }

    /// Restores the saved state, drops all pending motion and runs an update.
    /// Returns true and notifies if anything was restored, including a zoom
    /// the update itself leaves alone.
    pub fn reset(&mut self) -> bool {
        log::debug!("controls reset");
        let mut restored = false;
        if let Some(saved) = self.saved {
            restored |= self.target.distance_squared(saved.target) > EPS;
            self.target = saved.target;
            if let Some(camera) = self.camera.as_mut() {
                if let Some(position) = saved.position {
                    restored |= camera.position.distance_squared(position) > EPS;
                    camera.position = position;
                }
                if let Some(zoom) = saved.zoom {
                    restored |= camera.zoom() != Some(zoom);
                    camera.set_zoom(zoom);
                    camera.update_projection_matrix();
                }
            }
        }
        self.gesture.clear(self.config.mode);
        if self.update() {
            return true;
        }
        if !restored || self.camera.is_none() {
            return false;
        }
        self.notify();
        true
    }

    fn notify(&mut self) {
        if let Some(request_redraw) = self.redraw_requester.as_mut() {
            request_redraw();
        }
        if self.change_listener.is_none() {
            return;
        }
        if let Some(snapshot) = self.snapshot() {
            if let Some(listener) = self.change_listener.as_mut() {
                listener(&snapshot);
            }
        }
    }
}

impl Default for TouchControls {
    fn default() -> Self {
        Self::new(ControlsConfig::default())
    }
}

impl fmt::Debug for TouchControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouchControls")
            .field("config", &self.config)
            .field("target", &self.target)
            .field("camera", &self.camera)
            .field("viewport_height", &self.viewport_height)
            .field("phase", &self.gesture.phase)
            .field(
                "change_listener",
                &self.change_listener.as_ref().map(|_| "<function>"),
            )
            .field(
                "redraw_requester",
                &self.redraw_requester.as_ref().map(|_| "<function>"),
            )
            .finish_non_exhaustive()
    }
}

fn spherical_of(camera: &Camera, target: Vec3) -> Spherical {
    let quat = Quat::from_rotation_arc(camera.up.try_normalize().unwrap_or(Vec3::Y), Vec3::Y);
    Spherical::from_vec3(quat * (camera.position - target))
}
