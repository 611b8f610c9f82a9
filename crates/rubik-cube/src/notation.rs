//! Standard face-turn notation (`R U' F2 2L ...`).
//!
//! A move names the face whose layer turns, an optional 1-based depth
//! prefix counted inward from that face, and a suffix: none for a clockwise
//! quarter turn as seen looking at the face, `'` for counter-clockwise, `2`
//! for a half turn.

use std::fmt;

use crate::error::NotationError;
use crate::face::{Face, Sign};
use crate::turn::{LayerSelect, TurnSpec};

/// One parsed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// The face the turning layer is counted from.
    pub face: Face,
    /// Layer depth from `face`, starting at 1 for the outer layer.
    pub depth: u32,
    /// Clockwise quarter turns seen from `face`: 1, -1, 2, or -2.
    pub quarter_turns: i8,
}

impl Move {
    /// A clockwise quarter turn of the outer layer of `face`.
    #[must_use]
    pub fn new(face: Face) -> Self {
        Self {
            face,
            depth: 1,
            quarter_turns: 1,
        }
    }

    /// The move that undoes this one.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            quarter_turns: -self.quarter_turns,
            ..self
        }
    }

    /// Converts to a turn on a lattice of edge length `size`.
    ///
    /// Clockwise seen from the face is a negative right-handed rotation about
    /// the face's outward normal.
    ///
    /// # Errors
    ///
    /// Returns [`NotationError::DepthOutOfRange`] if the depth exceeds `size`.
    pub fn to_turn(self, size: u32) -> Result<TurnSpec, NotationError> {
        let size = size.max(1);
        if self.depth == 0 || self.depth > size {
            return Err(NotationError::DepthOutOfRange {
                depth: self.depth,
                size,
            });
        }
        let axis = self.face.signed_axis();
        let layer = if self.depth == 1 {
            LayerSelect::Outer
        } else {
            match axis.sign {
                Sign::Positive => LayerSelect::Index(size - self.depth),
                Sign::Negative => LayerSelect::Index(self.depth - 1),
            }
        };
        Ok(TurnSpec {
            axis,
            layer,
            angle_deg: -90.0 * f32::from(self.quarter_turns),
        })
    }
}

fn face_letter(face: Face) -> char {
    match face {
        Face::PosX => 'R',
        Face::NegX => 'L',
        Face::PosY => 'U',
        Face::NegY => 'D',
        Face::PosZ => 'F',
        Face::NegZ => 'B',
    }
}

fn letter_face(c: char) -> Option<Face> {
    Some(match c {
        'R' => Face::PosX,
        'L' => Face::NegX,
        'U' => Face::PosY,
        'D' => Face::NegY,
        'F' => Face::PosZ,
        'B' => Face::NegZ,
        _ => return None,
    })
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.depth > 1 {
            write!(f, "{}", self.depth)?;
        }
        write!(f, "{}", face_letter(self.face))?;
        match self.quarter_turns {
            1 => Ok(()),
            -1 => write!(f, "'"),
            2 => write!(f, "2"),
            _ => write!(f, "2'"),
        }
    }
}

impl std::str::FromStr for Move {
    type Err = NotationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let digits_end = token
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(token.len(), |(i, _)| i);
        let (digits, rest) = token.split_at(digits_end);

        let depth = if digits.is_empty() {
            1
        } else {
            match digits.parse::<u32>() {
                Ok(d) if d > 0 => d,
                _ => return Err(NotationError::InvalidDepth(token.to_string())),
            }
        };

        let mut chars = rest.chars();
        let letter = chars
            .next()
            .ok_or_else(|| NotationError::MissingFace(token.to_string()))?;
        let face = letter_face(letter).ok_or(NotationError::UnknownFace(letter))?;

        let quarter_turns = match chars.as_str() {
            "" => 1,
            "'" => -1,
            "2" => 2,
            "2'" => -2,
            suffix => {
                return Err(NotationError::InvalidSuffix {
                    token: token.to_string(),
                    suffix: suffix.to_string(),
                });
            }
        };

        Ok(Self {
            face,
            depth,
            quarter_turns,
        })
    }
}

/// Parses a whitespace-separated move sequence.
///
/// # Errors
///
/// Returns the first [`NotationError`] encountered.
pub fn parse_moves(input: &str) -> Result<Vec<Move>, NotationError> {
    input.split_whitespace().map(str::parse).collect()
}

/// Formats a move sequence, space separated.
#[must_use]
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The sequence that undoes `moves`.
#[must_use]
pub fn invert_moves(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|m| m.inverse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{Axis, SignedAxis};
    use crate::lattice::{CubeLattice, DEFAULT_SPACING};

    #[test]
    fn test_parse_basic_moves() {
        let moves = parse_moves("R U' F2 B2'").unwrap();
        assert_eq!(moves.len(), 4);
        assert_eq!(moves[0], Move::new(Face::PosX));
        assert_eq!(moves[1].face, Face::PosY);
        assert_eq!(moves[1].quarter_turns, -1);
        assert_eq!(moves[2].quarter_turns, 2);
        assert_eq!(moves[3].quarter_turns, -2);
    }

    #[test]
    fn test_parse_depth_prefix() {
        let m: Move = "2L'".parse().unwrap();
        assert_eq!(m.face, Face::NegX);
        assert_eq!(m.depth, 2);
        assert_eq!(m.quarter_turns, -1);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_moves("X"), Err(NotationError::UnknownFace('X')));
        assert_eq!(
            parse_moves("0R"),
            Err(NotationError::InvalidDepth("0R".to_string()))
        );
        assert_eq!(
            parse_moves("3"),
            Err(NotationError::MissingFace("3".to_string()))
        );
        assert!(matches!(
            parse_moves("R3"),
            Err(NotationError::InvalidSuffix { .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let text = "R U' F2 3D B2' L";
        let moves = parse_moves(text).unwrap();
        assert_eq!(format_moves(&moves), text);
    }

    #[test]
    fn test_to_turn_layers() {
        let r = Move::new(Face::PosX).to_turn(3).unwrap();
        assert_eq!(r.axis, SignedAxis::new(Axis::X, Sign::Positive));
        assert_eq!(r.layer, LayerSelect::Outer);
        assert!((r.angle_deg + 90.0).abs() < 1e-6);

        let inner_r: Move = "2R".parse().unwrap();
        assert_eq!(inner_r.to_turn(4).unwrap().layer, LayerSelect::Index(2));
        let inner_l: Move = "2L".parse().unwrap();
        assert_eq!(inner_l.to_turn(4).unwrap().layer, LayerSelect::Index(1));

        assert_eq!(
            inner_r.to_turn(1),
            Err(NotationError::DepthOutOfRange { depth: 2, size: 1 })
        );
    }

    #[test]
    fn test_sequence_then_inverse_is_solved() {
        let mut lattice = CubeLattice::new(3, DEFAULT_SPACING);
        let moves = parse_moves("R U R' U' F2 2D L'").unwrap();
        for m in moves.iter().chain(&invert_moves(&moves)) {
            let turn = m.to_turn(lattice.size()).unwrap();
            lattice
                .commit_turn(turn.axis, turn.layer, turn.angle_deg)
                .unwrap();
        }
        assert!(lattice.is_solved());
    }

    #[test]
    fn test_sexy_move_has_order_six() {
        let mut lattice = CubeLattice::new(3, DEFAULT_SPACING);
        let moves = parse_moves("R U R' U'").unwrap();
        for i in 0..6 {
            for m in &moves {
                let turn = m.to_turn(3).unwrap();
                lattice
                    .commit_turn(turn.axis, turn.layer, turn.angle_deg)
                    .unwrap();
            }
            assert_eq!(lattice.is_solved(), i == 5, "after {} repetitions", i + 1);
        }
    }

    #[test]
    fn test_clockwise_u_moves_front_to_left() {
        // Looking down on U, a clockwise turn carries the front face's top row
        // to the left face.
        let mut lattice = CubeLattice::new(3, DEFAULT_SPACING);
        let front_top = lattice
            .cubie_at(glam::IVec3::new(1, 2, 2))
            .unwrap()
            .id();
        let turn = Move::new(Face::PosY).to_turn(3).unwrap();
        lattice
            .commit_turn(turn.axis, turn.layer, turn.angle_deg)
            .unwrap();
        assert_eq!(
            lattice.cubie(front_top).unwrap().grid_position(),
            glam::IVec3::new(0, 2, 1)
        );
    }
}
