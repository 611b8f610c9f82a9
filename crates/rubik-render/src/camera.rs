//! Camera system for view and projection matrix generation.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Quat, Vec3};

/// A camera that generates view and projection matrices for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion. Identity looks down -Z.
    pub rotation: Quat,
    pub projection: Projection,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

/// Projection type for the camera.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
    /// Orthographic projection, e.g. for a flat debug view of one face.
    Orthographic {
        /// Half-width of the view volume in world units.
        half_width: f32,
        /// Half-height of the view volume in world units.
        half_height: f32,
    },
}

/// Per-frame camera data in GPU layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
}

impl Camera {
    /// A perspective camera with a vertical field of view in degrees.
    pub fn perspective(fov_deg: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: fov_deg.to_radians(),
                aspect_ratio,
            },
            near,
            far,
        }
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Compute the projection matrix. Depth maps near to -1 and far to +1.
    pub fn projection_matrix(&self) -> Mat4 {
        match &self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => Mat4::perspective_rh_gl(*fov_y, *aspect_ratio, self.near, self.far),
            Projection::Orthographic {
                half_width,
                half_height,
            } => Mat4::orthographic_rh_gl(
                -*half_width,
                *half_width,
                -*half_height,
                *half_height,
                self.near,
                self.far,
            ),
        }
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Turns the camera to face `target`, keeping world +Y as up.
    ///
    /// Does nothing if `target` is at the camera position or straight above
    /// or below it.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let Some(right) = forward.cross(Vec3::Y).try_normalize() else {
            return;
        };
        let up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize();
    }

    /// Update the aspect ratio for perspective projection. Zero-sized
    /// viewports (minimised windows) are ignored.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        if let Projection::Perspective { aspect_ratio, .. } = &mut self.projection {
            *aspect_ratio = width / height;
        }
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_pos: self.position.extend(1.0).to_array(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(70.0, 1.0, 0.1, 100.0)
    }
}
