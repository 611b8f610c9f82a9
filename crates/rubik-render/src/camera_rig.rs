//! The active camera plus both controllers that can drive it.

use tracing::info;

use crate::camera::Camera;
use crate::free_fly_camera::FreeFlyCamera;
use crate::orbit_camera::OrbitCamera;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Orbit,
    FreeFly,
}

/// Owns the render [`Camera`] and keeps it in sync with whichever
/// controller is active.
#[derive(Debug, Clone)]
pub struct CameraRig {
    camera: Camera,
    mode: CameraMode,
    pub orbit: OrbitCamera,
    pub free_fly: FreeFlyCamera,
}

impl CameraRig {
    pub fn new(camera: Camera, orbit: OrbitCamera, fly_speed: f32) -> Self {
        let mut rig = Self {
            camera,
            mode: CameraMode::Orbit,
            orbit,
            free_fly: FreeFlyCamera {
                speed: fly_speed,
                ..FreeFlyCamera::default()
            },
        };
        rig.sync();
        rig
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switches controllers. Free-fly takes over from the current view so
    /// the picture does not jump; orbit snaps back to its own pose.
    pub fn toggle_mode(&mut self) -> CameraMode {
        self.mode = match self.mode {
            CameraMode::Orbit => {
                self.free_fly = FreeFlyCamera::from_camera(&self.camera, self.free_fly.speed);
                CameraMode::FreeFly
            }
            CameraMode::FreeFly => CameraMode::Orbit,
        };
        info!("Camera mode: {:?}", self.mode);
        self.sync();
        self.mode
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
    }

    /// Copies the active controller's pose into the camera. Call after
    /// mutating `orbit` or `free_fly`.
    pub fn sync(&mut self) {
        match self.mode {
            CameraMode::Orbit => self.orbit.apply_to(&mut self.camera),
            CameraMode::FreeFly => self.free_fly.apply_to(&mut self.camera),
        }
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(Camera::default(), OrbitCamera::default(), 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_starts_in_orbit() {
        let rig = CameraRig::default();
        assert_eq!(rig.mode(), CameraMode::Orbit);
        assert!((rig.camera().position - rig.orbit.position()).length() < 1e-6);
    }

    #[test]
    fn test_toggle_preserves_view() {
        let mut rig = CameraRig::default();
        rig.orbit.rotate(Vec2::new(40.0, 25.0));
        rig.sync();
        let before = rig.camera().clone();

        assert_eq!(rig.toggle_mode(), CameraMode::FreeFly);
        assert!((rig.camera().position - before.position).length() < 1e-4);
        assert!((rig.camera().forward() - before.forward()).length() < 1e-4);
    }

    #[test]
    fn test_toggle_back_restores_orbit() {
        let mut rig = CameraRig::default();
        rig.toggle_mode();
        rig.free_fly.position += Vec3::new(5.0, 0.0, 0.0);
        rig.sync();
        rig.toggle_mode();
        assert_eq!(rig.mode(), CameraMode::Orbit);
        assert!((rig.camera().position - rig.orbit.position()).length() < 1e-6);
    }

    #[test]
    fn test_viewport_sets_aspect() {
        let mut rig = CameraRig::default();
        rig.set_viewport(1600, 800);
        assert!(matches!(
            rig.camera().projection,
            crate::camera::Projection::Perspective { aspect_ratio, .. } if (aspect_ratio - 2.0).abs() < 1e-6
        ));
    }
}
