use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Margin kept between the polar angle and its bounds, and the threshold for
/// reporting a visual change.
pub const EPS: f32 = 1e-6;

/// Camera offset relative to the target, Y-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Polar angle from +Y, radians.
    pub phi: f32,
    /// Azimuth around +Y, measured from +Z towards +X, radians.
    pub theta: f32,
}

impl Spherical {
    pub const fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

impl Default for Spherical {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

/// Clamp that tolerates `lo > hi` (the upper bound wins) instead of panicking
/// like [`f32::clamp`].
pub fn clamp_safe(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

/// Wraps an angle into `[-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    (angle + PI).rem_euclid(TAU) - PI
}

/// Signed difference `to - from`, taken the short way around the circle.
/// The result lies in `(-π, π]`.
pub fn shortest_angle(from: f32, to: f32) -> f32 {
    let delta = (to - from + PI).rem_euclid(TAU) - PI;
    if delta <= -PI {
        delta + TAU
    } else {
        delta
    }
}

/// Blends `z` towards `z² + 0.25` as the zoom grows, so orthographic pan speed
/// stays visually consistent across zoom levels.
pub fn smoothed_inverse_zoom(zoom: f32) -> f32 {
    let blend = 1.0 - (-zoom / 10_000.0).exp();
    zoom + blend * (zoom * zoom - zoom + 0.25)
}

/// Restricts `theta` to the azimuth interval `[min, max]`. Both bounds are
/// first normalized into `(-π, π]`; if the normalized interval wraps
/// (`min > max`) the angle snaps to whichever bound is nearer. Infinite bounds
/// leave `theta` untouched.
pub fn clamp_azimuth(theta: f32, min: f32, max: f32) -> f32 {
    if !(min.is_finite() && max.is_finite()) {
        return theta;
    }
    let min = normalize_bound(min);
    let max = normalize_bound(max);
    if min <= max {
        clamp_safe(theta, min, max)
    } else if theta > (min + max) / 2.0 {
        theta.max(min)
    } else {
        theta.min(max)
    }
}

fn normalize_bound(angle: f32) -> f32 {
    if angle <= -PI {
        angle + TAU
    } else if angle > PI {
        angle - TAU
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_angle_takes_the_short_way() {
        let delta = shortest_angle(3.0, -3.0);
        assert!(delta.abs() <= PI);
        assert!((delta - (TAU - 6.0)).abs() < 1e-5);
        assert!((shortest_angle(-3.0, 3.0) + (TAU - 6.0)).abs() < 1e-5);
    }

    #[test]
    fn shortest_angle_half_turn_is_positive() {
        assert!((shortest_angle(0.0, PI) - PI).abs() < 1e-5);
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-5.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn spherical_from_offset() {
        let s = Spherical::from_vec3(Vec3::new(0.0, 0.0, 5.0));
        assert!((s.radius - 5.0).abs() < 1e-6);
        assert!((s.phi - PI / 2.0).abs() < 1e-6);
        assert!(s.theta.abs() < 1e-6);

        let back = s.to_vec3();
        assert!((back - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn spherical_of_zero_vector() {
        assert_eq!(Spherical::from_vec3(Vec3::ZERO), Spherical::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn smoothed_inverse_zoom_blend() {
        let z = 1.0e6;
        assert!((smoothed_inverse_zoom(z) / (z * z) - 1.0).abs() < 1e-3);
        assert!((smoothed_inverse_zoom(1.0) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn negative_half_turn_bound_becomes_positive() {
        assert_eq!(normalize_bound(-PI), PI);
        assert_eq!(normalize_bound(PI), PI);
        assert_eq!(clamp_azimuth(0.5, -PI, -PI), PI);
    }

    #[test]
    fn azimuth_clamp_plain_interval() {
        assert_eq!(clamp_azimuth(1.0, -0.5, 0.5), 0.5);
        assert_eq!(clamp_azimuth(-1.0, -0.5, 0.5), -0.5);
        assert_eq!(clamp_azimuth(0.2, -0.5, 0.5), 0.2);
        assert_eq!(clamp_azimuth(3.0, f32::NEG_INFINITY, f32::INFINITY), 3.0);
    }

    #[test]
    fn azimuth_clamp_wrapped_interval_snaps_to_nearest_bound() {
        // Allowed region is [2.5, π] ∪ [-π, -2.5]; midpoint of the bounds is 0.
        assert_eq!(clamp_azimuth(0.3, 2.5, -2.5), 2.5);
        assert_eq!(clamp_azimuth(-0.3, 2.5, -2.5), -2.5);
        assert_eq!(clamp_azimuth(3.0, 2.5, -2.5), 3.0);
        assert_eq!(clamp_azimuth(-3.0, 2.5, -2.5), -3.0);
    }

    #[test]
    fn clamp_safe_does_not_panic_on_inverted_bounds() {
        assert_eq!(clamp_safe(5.0, 2.0, 1.0), 1.0);
    }
}
