//! Colour-coded picking.
//!
//! Every cubie is drawn in a flat colour derived from its id; reading back
//! the pixel under the cursor recovers the id. Black is the background, so
//! ids are shifted by one before encoding.

use rubik_cube::CubieId;

/// Largest id that fits in the 24-bit RGB code.
pub const MAX_PICKABLE_ID: u32 = 0x00FF_FFFE;

/// RGBA8 code for `id`, or `None` if the id does not fit in 24 bits.
pub fn id_to_color(id: CubieId) -> Option<[u8; 4]> {
    if id.0 > MAX_PICKABLE_ID {
        return None;
    }
    let [r, g, b, _] = (id.0 + 1).to_le_bytes();
    Some([r, g, b, 0xFF])
}

/// Inverse of [`id_to_color`]. Alpha is ignored; black decodes to `None`.
pub fn color_to_id(color: [u8; 4]) -> Option<CubieId> {
    let [r, g, b, _] = color;
    u32::from_le_bytes([r, g, b, 0])
        .checked_sub(1)
        .map(CubieId)
}

/// Something that has rendered the id pass and can read one pixel of it.
pub trait PickSource {
    /// The id-pass colour at pixel `(x, y)`, or `None` outside the target.
    fn read_pixel(&mut self, x: u32, y: u32) -> Option<[u8; 4]>;
}

/// The cubie under pixel `(x, y)`, if any.
pub fn pick(source: &mut (impl PickSource + ?Sized), x: u32, y: u32) -> Option<CubieId> {
    source.read_pixel(x, y).and_then(color_to_id)
}

/// An id pass held in memory, for headless use and tests.
#[derive(Debug, Clone)]
pub struct CpuPickBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl CpuPickBuffer {
    /// A buffer cleared to the background colour.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 0xFF]; width as usize * height as usize],
        }
    }

    /// Paints the rectangle `[x0, x1) x [y0, y1)` with `id`'s code, clipped
    /// to the buffer.
    pub fn fill_rect(&mut self, id: CubieId, x0: u32, y0: u32, x1: u32, y1: u32) {
        let Some(color) = id_to_color(id) else {
            return;
        };
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.pixels[(y * self.width + x) as usize] = color;
            }
        }
    }
}

impl PickSource for CpuPickBuffer {
    fn read_pixel(&mut self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}
