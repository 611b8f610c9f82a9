//! Free-fly camera: mouse look plus unrestricted movement.

use glam::{Quat, Vec2, Vec3};

use crate::camera::Camera;

/// Movement intent for one frame, each component in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlyInput {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreeFlyCamera {
    pub position: Vec3,
    /// Radians about world +Y. Zero looks down -Z.
    pub yaw: f32,
    /// Radians above the horizon, clamped to ±89°.
    pub pitch: f32,
    /// World units per second.
    pub speed: f32,
    /// Radians per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for FreeFlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 15.0),
            yaw: 0.0,
            pitch: 0.0,
            speed: 10.0,
            mouse_sensitivity: 0.003,
        }
    }
}

impl FreeFlyCamera {
    /// Starts from wherever `camera` currently is and looks.
    pub fn from_camera(camera: &Camera, speed: f32) -> Self {
        let forward = camera.forward();
        Self {
            position: camera.position,
            yaw: (-forward.x).atan2(-forward.z),
            pitch: forward.y.clamp(-1.0, 1.0).asin(),
            speed,
            ..Self::default()
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Mouse look. Moving right turns right, moving down looks down.
    pub fn look(&mut self, delta: Vec2) {
        let limit = 89.0_f32.to_radians();
        self.yaw -= delta.x * self.mouse_sensitivity;
        self.pitch = (self.pitch - delta.y * self.mouse_sensitivity).clamp(-limit, limit);
    }

    /// Moves along the view direction, its right vector and world up.
    pub fn fly(&mut self, input: FlyInput, dt: f32) {
        let rotation = self.rotation();
        let direction = rotation * Vec3::NEG_Z * input.forward
            + rotation * Vec3::X * input.right
            + Vec3::Y * input.up;
        self.position += direction.normalize_or_zero() * self.speed * dt;
    }

    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = self.position;
        camera.rotation = self.rotation();
    }
}
