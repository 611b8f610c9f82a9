//! Picked and hovered cubie state.

use glam::Mat4;
use tracing::debug;

use crate::cubie::CubieId;
use crate::lattice::CubeLattice;

/// Which cubie the user has picked, and which one the cursor is over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    picked: Option<CubieId>,
    hovered: Option<CubieId>,
}

impl Selection {
    /// Records the result of a pick. `None` clears the selection.
    pub fn pick(&mut self, id: Option<CubieId>) {
        if self.picked != id {
            debug!("Selection changed: {:?} -> {:?}", self.picked, id);
        }
        self.picked = id;
    }

    /// Records the cubie under the cursor.
    pub fn hover(&mut self, id: Option<CubieId>) {
        self.hovered = id;
    }

    /// The picked cubie.
    #[must_use]
    pub fn picked(&self) -> Option<CubieId> {
        self.picked
    }

    /// The hovered cubie.
    #[must_use]
    pub fn hovered(&self) -> Option<CubieId> {
        self.hovered
    }

    /// The cubie drawn highlighted: the picked one, else the hovered one.
    #[must_use]
    pub fn highlighted(&self) -> Option<CubieId> {
        self.picked.or(self.hovered)
    }

    /// Whether `id` is drawn highlighted.
    #[must_use]
    pub fn is_highlighted(&self, id: CubieId) -> bool {
        self.highlighted() == Some(id)
    }

    /// Clears both picked and hovered state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Applies the desync escape hatch to the picked cubie.
    ///
    /// Returns `false` when nothing is picked.
    pub fn desync_picked(&self, lattice: &mut CubeLattice, delta: Mat4) -> bool {
        self.picked
            .is_some_and(|id| lattice.desync_cubie(id, delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::DEFAULT_SPACING;
    use glam::Vec3;

    #[test]
    fn test_picked_overrides_hovered() {
        let mut sel = Selection::default();
        sel.hover(Some(CubieId(3)));
        assert_eq!(sel.highlighted(), Some(CubieId(3)));
        sel.pick(Some(CubieId(5)));
        assert_eq!(sel.highlighted(), Some(CubieId(5)));
        assert!(sel.is_highlighted(CubieId(5)));
        assert!(!sel.is_highlighted(CubieId(3)));
    }

    #[test]
    fn test_clear_resets() {
        let mut sel = Selection::default();
        sel.pick(Some(CubieId(1)));
        sel.hover(Some(CubieId(2)));
        sel.clear();
        assert_eq!(sel, Selection::default());
    }

    #[test]
    fn test_desync_requires_pick() {
        let mut lattice = CubeLattice::new(2, DEFAULT_SPACING);
        let mut sel = Selection::default();
        let delta = Mat4::from_translation(Vec3::Y);
        assert!(!sel.desync_picked(&mut lattice, delta));

        sel.pick(Some(CubieId(0)));
        assert!(sel.desync_picked(&mut lattice, delta));
        assert!(lattice.cubie(CubieId(0)).unwrap().is_desynced());
    }
}
