//! Seeded random scramble generation.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::face::{Axis, Face};
use crate::notation::Move;

/// Generates `length` random moves for a lattice of edge length `size`.
///
/// The same seed always yields the same sequence. Consecutive moves never
/// share an axis, so no move trivially cancels or merges with the previous
/// one. Depths are drawn from the outer half of the lattice; deeper layers
/// are reachable from the opposite face.
#[must_use]
pub fn scramble(size: u32, length: usize, seed: u64) -> Vec<Move> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let max_depth = (size.max(1) / 2).max(1);
    let mut moves = Vec::with_capacity(length);
    let mut last_axis: Option<Axis> = None;

    while moves.len() < length {
        let face = Face::ALL[rng.gen_range(0..Face::ALL.len())];
        let axis = face.signed_axis().axis;
        if last_axis == Some(axis) {
            continue;
        }
        let depth = rng.gen_range(1..=max_depth);
        let quarter_turns = [1, -1, 2][rng.gen_range(0..3)];
        moves.push(Move {
            face,
            depth,
            quarter_turns,
        });
        last_axis = Some(axis);
    }
    moves
}
