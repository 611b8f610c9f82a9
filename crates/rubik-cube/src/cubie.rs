//! A single unit cube of the lattice.

use std::fmt;

use glam::{IVec3, Mat3, Mat4, Vec3};

use crate::face::{FACE_TABLE, Face, Sticker};

/// Stable identifier of a cubie, assigned at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubieId(pub u32);

impl fmt::Display for CubieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical state of one cubie.
///
/// Grid position and orientation change only through a turn commit (or the
/// desync escape hatch on [`CubeLattice`](crate::CubeLattice)). Stickers are
/// bound to local faces for the cubie's whole lifetime; their world direction
/// follows [`local_orientation`](Self::local_orientation).
#[derive(Clone, Debug, PartialEq)]
pub struct Cubie {
    id: CubieId,
    grid_position: IVec3,
    stickers: [Sticker; 6],
    local_orientation: Mat3,
    translation_offset: Vec3,
}

impl Cubie {
    /// Creates a cubie at `grid_position` with shell stickers for a lattice of
    /// edge length `size`.
    pub(crate) fn new(id: CubieId, grid_position: IVec3, size: u32) -> Self {
        let mut stickers = [None; 6];
        for rule in &FACE_TABLE {
            if rule.on_shell(grid_position, size) {
                stickers[rule.face.index()] = Some(rule.color);
            }
        }
        Self {
            id,
            grid_position,
            stickers,
            local_orientation: Mat3::IDENTITY,
            translation_offset: Vec3::ZERO,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> CubieId {
        self.id
    }

    /// Current lattice coordinate, each component in `[0, size-1]`.
    #[must_use]
    pub fn grid_position(&self) -> IVec3 {
        self.grid_position
    }

    /// Sticker array indexed by [`Face::index`].
    #[must_use]
    pub fn stickers(&self) -> &[Sticker; 6] {
        &self.stickers
    }

    /// Sticker on a local face.
    #[must_use]
    pub fn sticker(&self, face: Face) -> Sticker {
        self.stickers[face.index()]
    }

    /// Accumulated rotation of all committed turns.
    #[must_use]
    pub fn local_orientation(&self) -> Mat3 {
        self.local_orientation
    }

    /// Extra translation applied by the desync escape hatch.
    #[must_use]
    pub fn translation_offset(&self) -> Vec3 {
        self.translation_offset
    }

    /// Whether the desync escape hatch has moved this cubie off its slot.
    #[must_use]
    pub fn is_desynced(&self) -> bool {
        self.translation_offset != Vec3::ZERO
    }

    /// The sticker this cubie shows towards the world direction `world_face`.
    #[must_use]
    pub fn world_sticker(&self, world_face: Face) -> Sticker {
        // The orientation is orthonormal, so its transpose is its inverse.
        let local = self.local_orientation.transpose() * world_face.normal();
        Face::nearest(local).and_then(|face| self.sticker(face))
    }

    /// Builds the model matrix for this cubie.
    ///
    /// `slot` is the world position of the cubie's grid slot and
    /// `anim_rotation` is the in-progress layer rotation (identity for cubies
    /// outside the turning layer). The rotation is applied last so the whole
    /// layer pivots about the lattice centre.
    #[must_use]
    pub fn model_matrix(&self, slot: Vec3, anim_rotation: Mat4, scale: f32) -> Mat4 {
        anim_rotation
            * Mat4::from_translation(slot + self.translation_offset)
            * Mat4::from_mat3(self.local_orientation)
            * Mat4::from_scale(Vec3::splat(scale))
    }

    pub(crate) fn apply_turn(&mut self, grid_position: IVec3, rotation: Mat3) {
        self.grid_position = grid_position;
        self.local_orientation = rotation * self.local_orientation;
    }

    pub(crate) fn apply_desync(&mut self, delta: Mat4) {
        let rotation = Mat3::from_mat4(delta);
        self.local_orientation = rotation * self.local_orientation;
        self.translation_offset += delta.w_axis.truncate();
    }

    pub(crate) fn clear_desync(&mut self) {
        self.translation_offset = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::StickerColor;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_corner_has_three_stickers() {
        let cubie = Cubie::new(CubieId(0), IVec3::new(2, 2, 2), 3);
        assert_eq!(cubie.sticker(Face::PosX), Some(StickerColor::Red));
        assert_eq!(cubie.sticker(Face::PosY), Some(StickerColor::White));
        assert_eq!(cubie.sticker(Face::PosZ), Some(StickerColor::Blue));
        assert_eq!(cubie.sticker(Face::NegX), None);
        assert_eq!(cubie.stickers().iter().flatten().count(), 3);
    }

    #[test]
    fn test_center_piece_has_no_stickers() {
        let cubie = Cubie::new(CubieId(13), IVec3::new(1, 1, 1), 3);
        assert!(cubie.stickers().iter().all(Option::is_none));
    }

    #[test]
    fn test_world_sticker_follows_orientation() {
        let mut cubie = Cubie::new(CubieId(0), IVec3::new(1, 2, 1), 3);
        assert_eq!(cubie.world_sticker(Face::PosY), Some(StickerColor::White));

        // A quarter turn about +X carries the up face to the front.
        let rot = Mat3::from_cols(Vec3::X, Vec3::Z, Vec3::NEG_Y);
        cubie.apply_turn(IVec3::new(1, 1, 2), rot);
        assert_eq!(cubie.world_sticker(Face::PosZ), Some(StickerColor::White));
        assert_eq!(cubie.world_sticker(Face::PosY), None);
        // The local binding never changes.
        assert_eq!(cubie.sticker(Face::PosY), Some(StickerColor::White));
    }

    #[test]
    fn test_model_matrix_places_cubie_at_slot() {
        let cubie = Cubie::new(CubieId(0), IVec3::ZERO, 3);
        let slot = Vec3::new(-2.1, -2.1, -2.1);
        let model = cubie.model_matrix(slot, Mat4::IDENTITY, 1.0);
        assert!((model.w_axis.truncate() - slot).length() < 1e-6);
    }

    #[test]
    fn test_model_matrix_applies_animation_last() {
        let cubie = Cubie::new(CubieId(0), IVec3::ZERO, 3);
        let slot = Vec3::new(0.0, 2.0, 0.0);
        let anim = Mat4::from_rotation_x(FRAC_PI_2);
        let model = cubie.model_matrix(slot, anim, 1.0);
        // Rotating (0, 2, 0) a quarter turn about +X lands on (0, 0, 2).
        assert!((model.w_axis.truncate() - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_desync_moves_and_clears() {
        let mut cubie = Cubie::new(CubieId(0), IVec3::ZERO, 2);
        cubie.apply_desync(Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0)));
        assert!(cubie.is_desynced());
        assert_eq!(cubie.translation_offset(), Vec3::new(0.0, 0.5, 0.0));
        cubie.clear_desync();
        assert!(!cubie.is_desynced());
        assert_eq!(cubie.grid_position(), IVec3::ZERO);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(CubieId(7).to_string(), "#7");
    }
}
