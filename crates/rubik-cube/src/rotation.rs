//! Exact quarter-turn rotations on integer lattice coordinates.

use std::ops::Mul;

use glam::{IVec3, Mat3};

use crate::error::TurnError;
use crate::face::SignedAxis;

/// Largest deviation from an integer tolerated when snapping a rotation
/// matrix entry.
pub const SNAP_TOLERANCE: f32 = 1e-4;

/// An axis-aligned rotation stored as a signed permutation matrix.
///
/// Applying it to integer coordinates is exact, so repeated commits never
/// accumulate floating-point drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuarterRotation {
    cols: [IVec3; 3],
}

impl QuarterRotation {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        cols: [IVec3::X, IVec3::Y, IVec3::Z],
    };

    /// Builds the right-handed rotation of `angle_deg` about `axis`, snapping
    /// each entry to the nearest integer.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::NotQuarterTurn`] if any entry is further than
    /// [`SNAP_TOLERANCE`] from an integer.
    pub fn from_axis_angle(axis: SignedAxis, angle_deg: f32) -> Result<Self, TurnError> {
        let m = Mat3::from_axis_angle(axis.to_vec3(), angle_deg.to_radians());
        let mut cols = [IVec3::ZERO; 3];
        for (col, out) in [m.x_axis, m.y_axis, m.z_axis].into_iter().zip(&mut cols) {
            let rounded = col.round();
            if (col - rounded).abs().max_element() > SNAP_TOLERANCE {
                return Err(TurnError::NotQuarterTurn { angle_deg });
            }
            *out = rounded.as_ivec3();
        }
        Ok(Self { cols })
    }

    /// Rotates an integer vector.
    #[must_use]
    pub fn apply(&self, v: IVec3) -> IVec3 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }

    /// The same rotation as a float matrix.
    #[must_use]
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(
            self.cols[0].as_vec3(),
            self.cols[1].as_vec3(),
            self.cols[2].as_vec3(),
        )
    }
}

impl Default for QuarterRotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for QuarterRotation {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            cols: rhs.cols.map(|c| self.apply(c)),
        }
    }
}
