use glam::{Mat3, Mat4, Quat, Vec3};

use crate::math::smoothed_inverse_zoom;

/// Degrees of orthographic pan scale per unit of inverse zoom.
const ORTHOGRAPHIC_PAN_SCALE: f32 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees.
        fov: f32,
        aspect: f32,
    },
    Orthographic {
        zoom: f32,
        /// Half the visible height at zoom 1, in world units.
        half_height: f32,
        aspect: f32,
    },
}

impl Projection {
    pub fn is_perspective(&self) -> bool {
        matches!(self, Projection::Perspective { .. })
    }

    pub fn zoom(&self) -> Option<f32> {
        match *self {
            Projection::Orthographic { zoom, .. } => Some(zoom),
            Projection::Perspective { .. } => None,
        }
    }

    /// Angle in degrees whose tangent turns a pixel drag into world units.
    pub fn pan_angular_scale(&self, zoom_speed: f32) -> f32 {
        match *self {
            Projection::Perspective { fov, .. } => fov / 2.0,
            Projection::Orthographic { zoom, .. } => {
                (1.0 / smoothed_inverse_zoom(zoom)) * zoom_speed * ORTHOGRAPHIC_PAN_SCALE
            }
        }
    }
}

/// The camera the controls drive: a position, an orientation, an up vector
/// and one of the two projections.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    pub up: Vec3,
    pub near: f32,
    pub far: f32,
    projection: Projection,
    projection_matrix: Mat4,
}

impl Camera {
    pub fn perspective(fov: f32, aspect: f32) -> Self {
        Self::with_projection(Projection::Perspective { fov, aspect })
    }

    pub fn orthographic(half_height: f32, aspect: f32) -> Self {
        Self::with_projection(Projection::Orthographic {
            zoom: 1.0,
            half_height,
            aspect,
        })
    }

    fn with_projection(projection: Projection) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            rotation: Quat::IDENTITY,
            up: Vec3::Y,
            near: 0.1,
            far: 1000.0,
            projection,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.update_projection_matrix();
    }

    /// Orthographic zoom factor, `None` for perspective cameras.
    pub fn zoom(&self) -> Option<f32> {
        self.projection.zoom()
    }

    /// Changes the orthographic zoom. The projection matrix is not recomputed;
    /// call [`Camera::update_projection_matrix`] afterwards.
    pub fn set_zoom(&mut self, value: f32) {
        if let Projection::Orthographic { zoom, .. } = &mut self.projection {
            *zoom = value;
        }
    }

    pub fn set_aspect(&mut self, value: f32) {
        match &mut self.projection {
            Projection::Perspective { aspect, .. } | Projection::Orthographic { aspect, .. } => {
                *aspect = value;
            }
        }
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = match self.projection {
            Projection::Perspective { fov, aspect } => {
                Mat4::perspective_rh(fov.to_radians(), aspect, self.near, self.far)
            }
            Projection::Orthographic {
                zoom,
                half_height,
                aspect,
            } => {
                let half_h = half_height / zoom;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        };
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Camera-local +X in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Camera-local +Y in world space.
    pub fn local_up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Orients the camera so its -Z axis points at `target`, keeping `up`.
    pub fn look_at(&mut self, target: Vec3) {
        let mut back = self.position - target;
        if back.length_squared() == 0.0 {
            back = Vec3::Z;
        }
        let back = back.normalize();

        let up = self.up.try_normalize().unwrap_or(Vec3::Y);
        let right = match up.cross(back).try_normalize() {
            Some(right) => right,
            // Looking straight along the up vector.
            None => back.any_orthonormal_vector(),
        };
        let true_up = back.cross(right);

        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, true_up, back)).normalize();
    }
}
