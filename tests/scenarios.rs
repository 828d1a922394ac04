use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use pinchcam::{
    Camera, ControlsConfig, GesturePhase, MapPhase, Mode, OrbitPhase, TouchControls, TouchPoint,
};

const HEIGHT: f32 = 500.0;

fn perspective_controls(config: ControlsConfig) -> TouchControls {
    let mut camera = Camera::perspective(50.0, 1.0);
    camera.position = Vec3::new(0.0, 0.0, 10.0);
    camera.look_at(Vec3::ZERO);

    let mut controls = TouchControls::new(config);
    controls.attach_camera(camera);
    controls.set_viewport_height(HEIGHT);
    controls.update();
    controls
}

fn orthographic_controls(config: ControlsConfig) -> TouchControls {
    let mut camera = Camera::orthographic(5.0, 1.0);
    camera.position = Vec3::new(0.0, 0.0, 10.0);
    camera.look_at(Vec3::ZERO);

    let mut controls = TouchControls::new(config);
    controls.attach_camera(camera);
    controls.set_viewport_height(HEIGHT);
    controls
}

fn at(x: f32, y: f32, t: f64) -> TouchPoint {
    TouchPoint::new(x, y, t)
}

fn drag(controls: &mut TouchControls, from: (f32, f32), to: (f32, f32)) {
    controls.on_touch_start(&[at(from.0, from.1, 0.0)]);
    controls.on_touch_move(&[at(to.0, to.1, 16.0)]);
    controls.on_touch_end();
}

fn position(controls: &TouchControls) -> Vec3 {
    controls.camera().expect("camera attached").position
}

#[test]
fn vertical_orbit_drag_leaves_azimuth_alone() {
    let mut controls = perspective_controls(ControlsConfig {
        enable_damping: false,
        ..Default::default()
    });
    let theta = controls.azimuthal_angle();
    let phi = controls.polar_angle();

    drag(&mut controls, (100.0, 100.0), (100.0, 50.0));
    assert!(controls.update());

    assert!((controls.azimuthal_angle() - theta).abs() < 1e-5);
    // Dragging up by 50 px raises phi by 2π·50/500.
    let expected = phi + 2.0 * PI * 50.0 / HEIGHT;
    assert!((controls.polar_angle() - expected).abs() < 1e-4);
}

#[test]
fn fast_map_pinch_zooms_in() {
    let mut controls = perspective_controls(ControlsConfig {
        mode: Mode::Map,
        ..Default::default()
    });

    controls.on_touch_start(&[at(100.0, 200.0, 0.0), at(200.0, 200.0, 0.0)]);
    assert_eq!(controls.phase(), GesturePhase::Map(MapPhase::RotatingOrZooming));
    controls.on_touch_move(&[at(75.0, 200.0, 20.0), at(225.0, 200.0, 20.0)]);
    controls.update();

    assert!((controls.distance() - 10.0 / 1.5).abs() < 1e-3);
}

#[test]
fn slow_map_pinch_does_not_zoom() {
    let mut controls = perspective_controls(ControlsConfig {
        mode: Mode::Map,
        ..Default::default()
    });

    controls.on_touch_start(&[at(100.0, 200.0, 0.0), at(200.0, 200.0, 0.0)]);
    controls.on_touch_move(&[at(75.0, 200.0, 500.0), at(225.0, 200.0, 500.0)]);
    controls.update();

    assert!((controls.distance() - 10.0).abs() < 1e-3);
}

#[test]
fn orbit_pinch_on_orthographic_camera_changes_zoom() {
    let mut controls = orthographic_controls(ControlsConfig {
        enable_pan: false,
        min_zoom: 0.1,
        max_zoom: 10.0,
        ..Default::default()
    });

    // Fingers closing from 100 px to 50 px apart: scale factor 2.
    controls.on_touch_start(&[at(100.0, 100.0, 0.0), at(200.0, 100.0, 0.0)]);
    assert_eq!(controls.phase(), GesturePhase::Orbit(OrbitPhase::Dollying));
    controls.on_touch_move(&[at(125.0, 100.0, 16.0), at(175.0, 100.0, 16.0)]);
    assert!(controls.update());

    let zoom = controls.camera().and_then(Camera::zoom);
    assert_eq!(zoom, Some(0.5));
    // Orthographic zoom leaves the camera distance alone.
    assert!((controls.distance() - 10.0).abs() < 1e-4);
}

#[test]
fn orthographic_zoom_is_clamped() {
    let mut controls = orthographic_controls(ControlsConfig {
        enable_pan: false,
        min_zoom: 0.8,
        max_zoom: 10.0,
        ..Default::default()
    });

    controls.on_touch_start(&[at(100.0, 100.0, 0.0), at(200.0, 100.0, 0.0)]);
    controls.on_touch_move(&[at(125.0, 100.0, 16.0), at(175.0, 100.0, 16.0)]);
    controls.update();

    assert_eq!(controls.camera().and_then(Camera::zoom), Some(0.8));
}

#[test]
fn perspective_distance_respects_zoom_bounds() {
    let mut controls = perspective_controls(ControlsConfig {
        min_zoom: 8.0,
        max_zoom: 12.0,
        enable_pan: false,
        ..Default::default()
    });

    controls.on_touch_start(&[at(100.0, 100.0, 0.0), at(200.0, 100.0, 0.0)]);
    controls.on_touch_move(&[at(0.0, 100.0, 16.0), at(300.0, 100.0, 16.0)]);
    controls.update();
    assert!((controls.distance() - 8.0).abs() < 1e-4);

    controls.on_touch_move(&[at(140.0, 100.0, 32.0), at(160.0, 100.0, 32.0)]);
    controls.update();
    assert!((controls.distance() - 12.0).abs() < 1e-4);
}

#[test]
fn polar_angle_stops_short_of_its_bounds() {
    let min = 0.5;
    let max = 2.0;
    let mut controls = perspective_controls(ControlsConfig {
        min_polar_angle: min,
        max_polar_angle: max,
        enable_damping: false,
        ..Default::default()
    });

    drag(&mut controls, (100.0, 400.0), (100.0, 0.0));
    controls.update();
    assert!(controls.polar_angle() < max);
    assert!((controls.polar_angle() - max).abs() < 1e-4);

    drag(&mut controls, (100.0, 0.0), (100.0, 400.0));
    controls.update();
    assert!(controls.polar_angle() > min);
    assert!((controls.polar_angle() - min).abs() < 1e-4);
}

#[test]
fn azimuth_clamps_to_plain_interval() {
    let mut controls = perspective_controls(ControlsConfig {
        min_azimuth_angle: -0.3,
        max_azimuth_angle: 0.3,
        enable_damping: false,
        ..Default::default()
    });

    drag(&mut controls, (100.0, 100.0), (0.0, 100.0));
    controls.update();
    assert_eq!(controls.azimuthal_angle(), 0.3);

    drag(&mut controls, (0.0, 100.0), (200.0, 100.0));
    controls.update();
    assert_eq!(controls.azimuthal_angle(), -0.3);
}

#[test]
fn azimuth_snaps_to_nearest_bound_of_wrapped_interval() {
    // Camera starts at theta = 0, inside the excluded side of [2.5, -2.5].
    let mut controls = perspective_controls(ControlsConfig {
        min_azimuth_angle: 2.5,
        max_azimuth_angle: -2.5,
        enable_damping: false,
        ..Default::default()
    });

    drag(&mut controls, (100.0, 100.0), (95.0, 100.0));
    controls.update();
    assert_eq!(controls.azimuthal_angle(), 2.5);
}

#[test]
fn zero_viewport_height_freezes_rotation() {
    let mut controls = perspective_controls(ControlsConfig::default());
    controls.set_viewport_height(0.0);
    let before = position(&controls);

    drag(&mut controls, (100.0, 100.0), (300.0, 300.0));
    assert!(!controls.update());
    assert!((position(&controls) - before).length() < 1e-4);
}

#[test]
fn detached_camera_pauses_motion() {
    let mut controls = perspective_controls(ControlsConfig::default());
    drag(&mut controls, (100.0, 100.0), (300.0, 100.0));

    let camera = controls.detach_camera();
    assert!(camera.is_some());
    assert!(!controls.update());
    assert!(controls.camera().is_none());
}

#[test]
fn damping_settles_monotonically() {
    let mut controls = perspective_controls(ControlsConfig {
        damping_factor: 0.25,
        ..Default::default()
    });
    drag(&mut controls, (100.0, 100.0), (160.0, 100.0));

    let mut previous_step = f32::INFINITY;
    let mut last = position(&controls);
    let mut last_notified_frame = None;
    for frame in 0..200 {
        if controls.update() {
            last_notified_frame = Some(frame);
        }
        let current = position(&controls);
        let step = (current - last).length();
        assert!(step <= previous_step + 1e-5, "frame {frame}: {step} > {previous_step}");
        previous_step = step;
        last = current;
    }
    let last_notified_frame = last_notified_frame.expect("drag moved the camera");
    assert!(last_notified_frame > 1);
    assert!(last_notified_frame < 100, "damping never settled");

    // Settled: another update neither moves nor notifies.
    let settled = position(&controls);
    assert!(!controls.update());
    assert!((position(&controls) - settled).length() < 1e-4);
}

#[test]
fn change_listener_sees_target_and_config() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut controls = perspective_controls(ControlsConfig {
        mode: Mode::Map,
        enable_damping: false,
        ..Default::default()
    });
    let sink = seen.clone();
    controls.set_change_listener(move |snapshot| {
        sink.lock().unwrap().push(snapshot.clone());
    });

    drag(&mut controls, (200.0, 200.0), (150.0, 200.0));
    assert!(controls.update());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].config.mode, Mode::Map);
    assert_eq!(seen[0].target, controls.target());
    assert!(seen[0].target.x > 0.0);
}

#[test]
fn moving_target_between_frames_recenters_camera() {
    let mut controls = perspective_controls(ControlsConfig::default());
    controls.set_target(Vec3::new(0.0, 0.0, 5.0));
    controls.update();

    let forward = controls.camera().unwrap().rotation * Vec3::NEG_Z;
    assert!((forward - Vec3::NEG_Z).length() < 1e-4);
    assert!((controls.distance() - 5.0).abs() < 1e-4);
    assert!((controls.polar_angle() - FRAC_PI_2).abs() < 1e-3);
}
