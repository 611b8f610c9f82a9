//! Orbit controller: the camera circles the cube and always faces its centre.

use glam::{Vec2, Vec3};

use crate::camera::Camera;

/// Largest pitch magnitude, keeping the view off the poles.
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Spherical camera placement around `target`.
///
/// Yaw is measured in the XZ plane from +X towards +Z, pitch upward from the
/// horizon. Yaw stays in `[0, 360)`, pitch in `[-89, 89]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    yaw_deg: f32,
    pitch_deg: f32,
    radius: f32,
    pub target: Vec3,
    /// Degrees per pixel of drag.
    pub sensitivity: f32,
    /// Radius change per scroll line.
    pub zoom_step: f32,
    pub radius_min: f32,
    pub radius_max: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(-90.0, 0.0, 15.0)
    }
}

impl OrbitCamera {
    pub fn new(yaw_deg: f32, pitch_deg: f32, radius: f32) -> Self {
        let mut orbit = Self {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            radius,
            target: Vec3::ZERO,
            sensitivity: 0.3,
            zoom_step: 1.0,
            radius_min: 2.0,
            radius_max: 80.0,
        };
        orbit.set_angles(yaw_deg, pitch_deg);
        orbit.radius = radius.clamp(orbit.radius_min, orbit.radius_max);
        orbit
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Sets both angles, wrapping yaw and clamping pitch.
    pub fn set_angles(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw_deg = yaw_deg.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs.
        if self.yaw_deg >= 360.0 {
            self.yaw_deg = 0.0;
        }
        self.pitch_deg = pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Applies a drag of `delta` pixels. Dragging right increases yaw,
    /// dragging down increases pitch.
    pub fn rotate(&mut self, delta: Vec2) {
        self.set_angles(
            self.yaw_deg + delta.x * self.sensitivity,
            self.pitch_deg + delta.y * self.sensitivity,
        );
    }

    /// Scrolling up (positive) moves the camera closer.
    pub fn zoom(&mut self, scroll_lines: f32) {
        self.radius =
            (self.radius - scroll_lines * self.zoom_step).clamp(self.radius_min, self.radius_max);
    }

    /// Camera position for the current angles.
    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.pitch_deg.to_radians().sin_cos();
        let (sin_y, cos_y) = self.yaw_deg.to_radians().sin_cos();
        self.target + self.radius * Vec3::new(cos_p * cos_y, sin_p, cos_p * sin_y)
    }

    /// Places `camera` on the orbit, facing the target.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pose() {
        let orbit = OrbitCamera::default();
        assert!((orbit.yaw_deg() - 270.0).abs() < 1e-4);
        assert_eq!(orbit.pitch_deg(), 0.0);
        assert_eq!(orbit.radius(), 15.0);
        assert!((orbit.position() - Vec3::new(0.0, 0.0, -15.0)).length() < 1e-4);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut orbit = OrbitCamera::new(350.0, 0.0, 10.0);
        orbit.rotate(Vec2::new(100.0, 0.0));
        assert!((orbit.yaw_deg() - 20.0).abs() < 1e-3);
        orbit.rotate(Vec2::new(-100.0, 0.0));
        assert!((orbit.yaw_deg() - 350.0).abs() < 1e-3);
        orbit.set_angles(-720.0 - 45.0, 0.0);
        assert!((orbit.yaw_deg() - 315.0).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_clamps() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(0.0, 10_000.0));
        assert_eq!(orbit.pitch_deg(), PITCH_LIMIT_DEG);
        orbit.rotate(Vec2::new(0.0, -50_000.0));
        assert_eq!(orbit.pitch_deg(), -PITCH_LIMIT_DEG);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut orbit = OrbitCamera::default();
        orbit.zoom(3.0);
        assert_eq!(orbit.radius(), 12.0);
        orbit.zoom(1000.0);
        assert_eq!(orbit.radius(), orbit.radius_min);
        orbit.zoom(-1000.0);
        assert_eq!(orbit.radius(), orbit.radius_max);
    }

    #[test]
    fn test_position_keeps_radius() {
        let mut orbit = OrbitCamera::new(33.0, 47.0, 9.0);
        orbit.target = Vec3::new(1.0, 2.0, 3.0);
        assert!(((orbit.position() - orbit.target).length() - 9.0).abs() < 1e-4);
        assert!(orbit.position().y > orbit.target.y);
    }

    #[test]
    fn test_apply_faces_target() {
        let orbit = OrbitCamera::new(10.0, 30.0, 20.0);
        let mut camera = Camera::default();
        orbit.apply_to(&mut camera);
        let expected = (orbit.target - camera.position).normalize();
        assert!((camera.forward() - expected).length() < 1e-5);
    }
}
