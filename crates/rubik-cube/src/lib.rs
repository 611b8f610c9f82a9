//! Cube state and turn engine: an NxNxN lattice of cubies, layer turn
//! animation, and the commit that permutes and reorients cubies.

mod cubie;
mod engine;
mod error;
mod face;
mod lattice;
pub mod notation;
mod rotation;
mod scramble;
mod selection;
mod turn;

pub use cubie::{Cubie, CubieId};
pub use engine::{
    DEFAULT_TURN_SPEED_DEG_S, RejectReason, TurnEngine, TurnProgress, TurnRequest,
    layer_membership,
};
pub use error::{NotationError, TurnError};
pub use face::{
    Axis, FACE_TABLE, Face, FaceRule, INTERIOR_RGBA, Sign, SignedAxis, Sticker, StickerColor,
};
pub use lattice::{CubeLattice, DEFAULT_SPACING, MAX_SIZE, clamp_size};
pub use notation::{Move, format_moves, invert_moves, parse_moves};
pub use rotation::{QuarterRotation, SNAP_TOLERANCE};
pub use scramble::scramble;
pub use selection::Selection;
pub use turn::{LayerSelect, Turn, TurnSpec, layer_contains};
