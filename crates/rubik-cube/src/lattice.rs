//! The NxNxN lattice of cubies and the turn commit.

use glam::{IVec3, Mat4, Vec3};
use tracing::{debug, warn};

use crate::cubie::{Cubie, CubieId};
use crate::error::TurnError;
use crate::face::{FACE_TABLE, SignedAxis};
use crate::rotation::QuarterRotation;
use crate::turn::{LayerSelect, layer_contains};

/// World distance between neighbouring slot centres. Slightly larger than a
/// unit cube's edge so cubies render with a visible gap.
pub const DEFAULT_SPACING: f32 = 2.1;

/// Largest edge length. Every cubie id of a lattice this size still fits
/// the 24-bit picking code.
pub const MAX_SIZE: u32 = 255;

const EMPTY: usize = usize::MAX;

/// `size` clamped to `1..=MAX_SIZE`.
#[must_use]
pub fn clamp_size(size: u32) -> u32 {
    let clamped = size.clamp(1, MAX_SIZE);
    if clamped != size {
        warn!("Cube size {size} clamped to {clamped}");
    }
    clamped
}

/// An NxNxN grid of cubies, centred on the origin.
///
/// The set of cubies is fixed at construction. Exactly one cubie occupies
/// each grid coordinate at all times.
#[derive(Clone, Debug)]
pub struct CubeLattice {
    size: u32,
    spacing: f32,
    cubies: Vec<Cubie>,
    /// Flattened grid coordinate -> index into `cubies`.
    occupancy: Vec<usize>,
}

impl CubeLattice {
    /// Builds a solved lattice. `size` is clamped with [`clamp_size`].
    #[must_use]
    pub fn new(size: u32, spacing: f32) -> Self {
        let size = clamp_size(size);
        let n = size as i32;
        let mut cubies = Vec::with_capacity((size * size * size) as usize);
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    let id = CubieId(cubies.len() as u32);
                    cubies.push(Cubie::new(id, IVec3::new(x, y, z), size));
                }
            }
        }
        // Construction order is the flattening order, so slot i sits at index i.
        let occupancy = (0..cubies.len()).collect();
        Self {
            size,
            spacing,
            cubies,
            occupancy,
        }
    }

    /// Edge length in cubies.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Distance between slot centres in world units.
    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Grid coordinate of the lattice centre on each axis, `(size-1)/2`.
    #[must_use]
    pub fn center(&self) -> f32 {
        (self.size - 1) as f32 / 2.0
    }

    /// All cubies in id order.
    #[must_use]
    pub fn cubies(&self) -> &[Cubie] {
        &self.cubies
    }

    /// Looks up a cubie by id.
    #[must_use]
    pub fn cubie(&self, id: CubieId) -> Option<&Cubie> {
        self.cubies.get(id.0 as usize)
    }

    /// The cubie currently occupying `p`.
    #[must_use]
    pub fn cubie_at(&self, p: IVec3) -> Option<&Cubie> {
        self.flat_index(p).map(|i| &self.cubies[self.occupancy[i]])
    }

    /// Whether `p` is a valid grid coordinate.
    #[must_use]
    pub fn contains(&self, p: IVec3) -> bool {
        let n = self.size as i32;
        p.cmpge(IVec3::ZERO).all() && p.cmplt(IVec3::splat(n)).all()
    }

    /// World-space centre of the slot at grid coordinate `p`.
    #[must_use]
    pub fn slot_position(&self, p: IVec3) -> Vec3 {
        (p.as_vec3() - Vec3::splat(self.center())) * self.spacing
    }

    /// Cubies belonging to the layer selected by `axis` and `layer`.
    pub fn layer_members(
        &self,
        axis: SignedAxis,
        layer: LayerSelect,
    ) -> impl Iterator<Item = &Cubie> + '_ {
        self.cubies
            .iter()
            .filter(move |c| layer_contains(axis, layer, self.size, c.grid_position()))
    }

    fn flat_index(&self, p: IVec3) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let n = self.size as usize;
        Some((p.x as usize * n + p.y as usize) * n + p.z as usize)
    }

    /// Commits a completed turn: moves every cubie of the layer to its
    /// rotated grid coordinate and left-multiplies its orientation.
    ///
    /// All new positions are computed and validated before anything is
    /// written, so on error the lattice is unchanged. Returns the number of
    /// cubies moved.
    ///
    /// # Errors
    ///
    /// - [`TurnError::NotQuarterTurn`] if `angle_deg` is not a multiple of 90°.
    /// - [`TurnError::OffLattice`] or [`TurnError::Collision`] if the rotated
    ///   layer would not tile the lattice exactly.
    pub fn commit_turn(
        &mut self,
        axis: SignedAxis,
        layer: LayerSelect,
        angle_deg: f32,
    ) -> Result<usize, TurnError> {
        let rotation = QuarterRotation::from_axis_angle(axis, angle_deg)?;
        // Doubling keeps centred coordinates integral for even sizes too.
        let span = IVec3::splat(self.size as i32 - 1);

        let mut moves = Vec::new();
        for (slot, cubie) in self.cubies.iter().enumerate() {
            let from = cubie.grid_position();
            if !layer_contains(axis, layer, self.size, from) {
                continue;
            }
            let rotated = rotation.apply(from * 2 - span) + span;
            let to = rotated / 2;
            if rotated % 2 != IVec3::ZERO || !self.contains(to) {
                return Err(TurnError::OffLattice {
                    id: cubie.id(),
                    from,
                    to: rotated - span,
                });
            }
            moves.push((slot, to));
        }

        let mut positions: Vec<IVec3> = self.cubies.iter().map(Cubie::grid_position).collect();
        for &(slot, to) in &moves {
            positions[slot] = to;
        }
        let mut occupancy = vec![EMPTY; self.cubies.len()];
        for (slot, &p) in positions.iter().enumerate() {
            let Some(i) = self.flat_index(p) else {
                return Err(TurnError::OffLattice {
                    id: self.cubies[slot].id(),
                    from: self.cubies[slot].grid_position(),
                    to: p,
                });
            };
            if occupancy[i] != EMPTY {
                return Err(TurnError::Collision { position: p });
            }
            occupancy[i] = slot;
        }

        let matrix = rotation.to_mat3();
        for &(slot, to) in &moves {
            self.cubies[slot].apply_turn(to, matrix);
        }
        self.occupancy = occupancy;

        debug!(
            "Committed {:.0}° turn about {:?} on layer {:?}: {} cubies moved",
            angle_deg,
            axis,
            layer,
            moves.len()
        );
        Ok(moves.len())
    }

    /// Whether every outer face shows a single colour.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        FACE_TABLE.iter().all(|rule| {
            let mut shown = self
                .cubies
                .iter()
                .filter(|c| rule.on_shell(c.grid_position(), self.size))
                .map(|c| c.world_sticker(rule.face));
            match shown.next() {
                Some(Some(first)) => shown.all(|s| s == Some(first)),
                _ => false,
            }
        })
    }

    /// Restores the solved initial state, keeping ids.
    pub fn reset(&mut self) {
        *self = Self::new(self.size, self.spacing);
    }

    /// Escape hatch: applies an ad-hoc rotation/translation to one cubie,
    /// bypassing the turn engine.
    ///
    /// The grid position and occupancy are not touched, so the cubie is drawn
    /// away from its slot until [`resync_cubie`](Self::resync_cubie) is
    /// called. A rotation that is not a quarter turn leaves the cubie's
    /// stickers misaligned with the lattice. Returns `false` for an unknown id.
    pub fn desync_cubie(&mut self, id: CubieId, delta: Mat4) -> bool {
        match self.cubies.get_mut(id.0 as usize) {
            Some(cubie) => {
                warn!("Cubie {} desynced from the lattice", id);
                cubie.apply_desync(delta);
                true
            }
            None => false,
        }
    }

    /// Removes any translation applied by [`desync_cubie`](Self::desync_cubie).
    pub fn resync_cubie(&mut self, id: CubieId) -> bool {
        match self.cubies.get_mut(id.0 as usize) {
            Some(cubie) => {
                cubie.clear_desync();
                true
            }
            None => false,
        }
    }
}
