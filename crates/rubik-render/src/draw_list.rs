//! Per-frame cubie instances for the external renderer.
//!
//! The renderer draws one unit cube mesh per instance. Face colours are in
//! the cubie's local frame (indexed like `Face`); the model matrix carries
//! the orientation that turns them to their world directions.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use tracing::{trace, warn};

use rubik_cube::{CubeLattice, CubieId, INTERIOR_RGBA, Selection, TurnEngine};

use crate::picking::id_to_color;

/// Scale of the cubie mesh relative to a unit cube.
const CUBIE_SCALE: f32 = 1.0;

/// One cubie as drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubieInstance {
    pub id: CubieId,
    pub model: Mat4,
    pub face_colors: [[f32; 4]; 6],
    pub highlighted: bool,
}

/// GPU layout of [`CubieInstance`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub face_colors: [[f32; 4]; 6],
    /// 1.0 when highlighted, else 0.0.
    pub highlight: f32,
    pub _pad: [f32; 3],
}

impl From<&CubieInstance> for InstanceRaw {
    fn from(instance: &CubieInstance) -> Self {
        Self {
            model: instance.model.to_cols_array_2d(),
            face_colors: instance.face_colors,
            highlight: if instance.highlighted { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }
}

/// Everything needed to draw the cube for one frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub instances: Vec<CubieInstance>,
}

impl DrawList {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, id: CubieId) -> Option<&CubieInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    /// Instance data ready for a vertex buffer.
    pub fn to_raw(&self) -> Vec<InstanceRaw> {
        self.instances.iter().map(InstanceRaw::from).collect()
    }
}

/// Builds the draw list: one instance per cubie, with the turning layer
/// rotated by the engine's current animation angle.
pub fn build_draw_list(
    lattice: &CubeLattice,
    engine: &TurnEngine,
    selection: &Selection,
) -> DrawList {
    let instances: Vec<CubieInstance> = lattice
        .cubies()
        .iter()
        .map(|cubie| {
            let mut face_colors = [INTERIOR_RGBA; 6];
            for (slot, sticker) in face_colors.iter_mut().zip(cubie.stickers()) {
                if let Some(color) = sticker {
                    *slot = color.rgba();
                }
            }
            CubieInstance {
                id: cubie.id(),
                model: engine.cubie_transform(lattice, cubie, CUBIE_SCALE),
                face_colors,
                highlighted: selection.is_highlighted(cubie.id()),
            }
        })
        .collect();
    trace!(count = instances.len(), "Built draw list");
    DrawList { instances }
}

/// One cubie in the picking pass: same transform, flat id colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PickInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Builds the id-coloured variant of the draw list for the picking pass.
/// Cubies whose id cannot be encoded are left out.
pub fn build_picking_list(lattice: &CubeLattice, engine: &TurnEngine) -> Vec<PickInstance> {
    lattice
        .cubies()
        .iter()
        .filter_map(|cubie| {
            let Some(code) = id_to_color(cubie.id()) else {
                warn!("Cubie {} is not pickable", cubie.id());
                return None;
            };
            Some(PickInstance {
                model: engine
                    .cubie_transform(lattice, cubie, CUBIE_SCALE)
                    .to_cols_array_2d(),
                color: code.map(|c| f32::from(c) / 255.0),
            })
        })
        .collect()
}
