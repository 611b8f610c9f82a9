//! Turn descriptions and the layer membership test.

use glam::{IVec3, Mat3};

use crate::face::SignedAxis;

/// Which layer along the turn axis rotates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerSelect {
    /// The outer face layer on the side the axis points to.
    Outer,
    /// An explicit layer coordinate along the axis, regardless of its sign.
    /// Values past the last layer are clamped.
    Index(u32),
}

impl LayerSelect {
    /// The grid coordinate along `axis` that this selection refers to.
    #[must_use]
    pub fn resolve(self, axis: SignedAxis, size: u32) -> i32 {
        match self {
            LayerSelect::Outer => axis.outer_coordinate(size),
            LayerSelect::Index(i) => i.min(size.max(1) - 1) as i32,
        }
    }
}

/// Whether a cubie at `p` is part of the `layer` turning about `axis`.
///
/// The animation overlay and the commit both go through this function so
/// that the cubies drawn rotating are exactly the cubies that move.
#[must_use]
pub fn layer_contains(axis: SignedAxis, layer: LayerSelect, size: u32, p: IVec3) -> bool {
    axis.axis.component(p) == layer.resolve(axis, size)
}

/// A fully-specified turn: axis, layer, and signed angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnSpec {
    /// Rotation axis; the right-hand rule about it gives positive angles.
    pub axis: SignedAxis,
    /// The turning layer.
    pub layer: LayerSelect,
    /// Signed turn angle in degrees.
    pub angle_deg: f32,
}

/// An in-progress turn animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Turn {
    spec: TurnSpec,
    current_angle_deg: f32,
}

impl Turn {
    /// Starts a turn at zero progress.
    #[must_use]
    pub fn new(spec: TurnSpec) -> Self {
        Self {
            spec,
            current_angle_deg: 0.0,
        }
    }

    /// The turn being animated.
    #[must_use]
    pub fn spec(&self) -> TurnSpec {
        self.spec
    }

    /// Rotation axis.
    #[must_use]
    pub fn axis(&self) -> SignedAxis {
        self.spec.axis
    }

    /// Turning layer.
    #[must_use]
    pub fn layer(&self) -> LayerSelect {
        self.spec.layer
    }

    /// Signed target angle in degrees.
    #[must_use]
    pub fn target_angle_deg(&self) -> f32 {
        self.spec.angle_deg
    }

    /// Unsigned progress in degrees, in `[0, |target|]`.
    #[must_use]
    pub fn current_angle_deg(&self) -> f32 {
        self.current_angle_deg
    }

    /// Progress carrying the sign of the target.
    #[must_use]
    pub fn signed_angle_deg(&self) -> f32 {
        self.current_angle_deg.copysign(self.spec.angle_deg)
    }

    /// Whether the animation has reached its target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_angle_deg >= self.spec.angle_deg.abs()
    }

    /// Advances by `delta_deg`, clamped at the target magnitude.
    pub fn step(&mut self, delta_deg: f32) {
        let goal = self.spec.angle_deg.abs();
        self.current_angle_deg = (self.current_angle_deg + delta_deg.max(0.0)).min(goal);
    }

    /// Whether a cubie at `p` is part of the turning layer.
    #[must_use]
    pub fn contains(&self, p: IVec3, size: u32) -> bool {
        layer_contains(self.spec.axis, self.spec.layer, size, p)
    }

    /// Display rotation for the current progress.
    #[must_use]
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_axis_angle(self.spec.axis.to_vec3(), self.signed_angle_deg().to_radians())
    }
}
