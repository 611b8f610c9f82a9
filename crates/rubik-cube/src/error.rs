//! Cube engine error types.

use glam::IVec3;

use crate::cubie::CubieId;

/// Fatal invariant violations detected while committing a turn.
///
/// The lattice is never mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TurnError {
    /// The turn angle does not produce an axis-aligned rotation.
    #[error("turn of {angle_deg} degrees is not a multiple of a quarter turn")]
    NotQuarterTurn {
        /// The requested angle.
        angle_deg: f32,
    },

    /// A rotated coordinate did not land on a lattice point.
    #[error("cubie {id} rotated from {from} to {to}, outside the lattice")]
    OffLattice {
        /// The cubie being moved.
        id: CubieId,
        /// Its grid position before the turn.
        from: IVec3,
        /// The (doubled, centred) coordinate it would have moved to.
        to: IVec3,
    },

    /// Two cubies would occupy the same grid coordinate after the turn.
    #[error("two cubies would occupy {position} after the turn")]
    Collision {
        /// The doubly-occupied coordinate.
        position: IVec3,
    },
}

/// Errors produced while parsing move notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    /// The face letter is not one of `R L U D F B`.
    #[error("unknown face '{0}' in move notation")]
    UnknownFace(char),

    /// A token had no face letter.
    #[error("missing face letter in '{0}'")]
    MissingFace(String),

    /// The suffix after the face letter is not `'`, `2`, or `2'`.
    #[error("invalid suffix '{suffix}' in '{token}'")]
    InvalidSuffix {
        /// The whole token.
        token: String,
        /// The unparsed suffix.
        suffix: String,
    },

    /// A layer depth prefix of zero or an unparsable number.
    #[error("invalid layer depth in '{0}'")]
    InvalidDepth(String),

    /// The layer depth exceeds the lattice size.
    #[error("layer depth {depth} exceeds cube size {size}")]
    DepthOutOfRange {
        /// Requested depth (1-based from the face).
        depth: u32,
        /// Lattice edge length.
        size: u32,
    },
}
