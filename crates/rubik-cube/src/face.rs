//! Principal axes, cube faces, and the face-to-colour table.

use glam::{IVec3, Vec3};

/// One of the three principal axes of the lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The X axis (left/right).
    X,
    /// The Y axis (down/up).
    Y,
    /// The Z axis (back/front).
    Z,
}

impl Axis {
    /// All three axes in canonical order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along the positive direction of this axis.
    #[must_use]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// The component of `v` along this axis.
    #[must_use]
    pub fn component(self, v: IVec3) -> i32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Direction along an axis. Also used as the turn direction multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    /// `+1`
    Positive,
    /// `-1`
    Negative,
}

impl Sign {
    /// `+1` or `-1`.
    #[must_use]
    pub fn signum(self) -> i32 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    /// The opposite sign.
    #[must_use]
    pub fn flip(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// A principal axis together with a direction: one of ±X, ±Y, ±Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignedAxis {
    /// The principal axis.
    pub axis: Axis,
    /// Which way along the axis.
    pub sign: Sign,
}

impl SignedAxis {
    /// Creates a signed axis.
    #[must_use]
    pub const fn new(axis: Axis, sign: Sign) -> Self {
        Self { axis, sign }
    }

    /// Interprets `v` as a principal direction.
    ///
    /// Returns `None` for the zero vector or for any vector with more than one
    /// non-zero component.
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Option<Self> {
        let mut found = None;
        for axis in Axis::ALL {
            let c = v.dot(axis.unit());
            if c.abs() <= f32::EPSILON {
                continue;
            }
            if found.is_some() {
                return None;
            }
            let sign = if c > 0.0 { Sign::Positive } else { Sign::Negative };
            found = Some(Self::new(axis, sign));
        }
        found
    }

    /// Unit vector pointing along this signed axis.
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        self.axis.unit() * self.sign.signum() as f32
    }

    /// The lattice face whose outward normal is this direction.
    #[must_use]
    pub fn face(self) -> Face {
        match (self.axis, self.sign) {
            (Axis::X, Sign::Positive) => Face::PosX,
            (Axis::X, Sign::Negative) => Face::NegX,
            (Axis::Y, Sign::Positive) => Face::PosY,
            (Axis::Y, Sign::Negative) => Face::NegY,
            (Axis::Z, Sign::Positive) => Face::PosZ,
            (Axis::Z, Sign::Negative) => Face::NegZ,
        }
    }

    /// The grid coordinate of the outer shell layer on this side of a
    /// lattice with edge length `size`.
    #[must_use]
    pub fn outer_coordinate(self, size: u32) -> i32 {
        match self.sign {
            Sign::Positive => size.max(1) as i32 - 1,
            Sign::Negative => 0,
        }
    }
}

/// A face direction of a cubie or of the whole lattice.
///
/// The discriminant doubles as the index into a cubie's sticker array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Face {
    /// +X, right.
    PosX = 0,
    /// −X, left.
    NegX = 1,
    /// +Y, up.
    PosY = 2,
    /// −Y, down.
    NegY = 3,
    /// +Z, front.
    PosZ = 4,
    /// −Z, back.
    NegZ = 5,
}

impl Face {
    /// All six faces in sticker-index order.
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Index into a sticker array.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The rule row describing this face.
    #[must_use]
    pub fn rule(self) -> &'static FaceRule {
        &FACE_TABLE[self.index()]
    }

    /// Outward direction of this face.
    #[must_use]
    pub fn signed_axis(self) -> SignedAxis {
        self.rule().direction
    }

    /// Outward unit normal.
    #[must_use]
    pub fn normal(self) -> Vec3 {
        self.signed_axis().to_vec3()
    }

    /// The face on the other side of the cubie.
    #[must_use]
    pub fn opposite(self) -> Face {
        let dir = self.signed_axis();
        SignedAxis::new(dir.axis, dir.sign.flip()).face()
    }

    /// The face whose normal is closest to `v`.
    ///
    /// Returns `None` for a zero-length vector.
    #[must_use]
    pub fn nearest(v: Vec3) -> Option<Face> {
        if v.length_squared() <= f32::EPSILON {
            return None;
        }
        Face::ALL
            .into_iter()
            .max_by(|a, b| a.normal().dot(v).total_cmp(&b.normal().dot(v)))
    }
}

/// Colour painted on one outward-facing side of a cubie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StickerColor {
    /// Up face.
    White,
    /// Down face.
    Yellow,
    /// Back face.
    Green,
    /// Front face.
    Blue,
    /// Right face.
    Red,
    /// Left face.
    Orange,
}

impl StickerColor {
    /// Linear RGBA colour used when drawing this sticker.
    #[must_use]
    pub fn rgba(self) -> [f32; 4] {
        match self {
            StickerColor::White => [1.0, 1.0, 1.0, 1.0],
            StickerColor::Yellow => [1.0, 1.0, 0.0, 1.0],
            StickerColor::Green => [0.0, 1.0, 0.0, 1.0],
            StickerColor::Blue => [0.0, 0.0, 1.0, 1.0],
            StickerColor::Red => [1.0, 0.0, 0.0, 1.0],
            StickerColor::Orange => [1.0, 0.64, 0.0, 1.0],
        }
    }
}

/// A sticker slot: `None` marks an interior face.
pub type Sticker = Option<StickerColor>;

/// Colour of bare plastic on interior faces.
pub const INTERIOR_RGBA: [f32; 4] = [0.05, 0.05, 0.05, 1.0];

/// One row of the face table: a face, its outward direction, and the colour
/// it carries when it lies on the outer shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRule {
    /// The face this row describes.
    pub face: Face,
    /// Outward direction of the face.
    pub direction: SignedAxis,
    /// Colour assigned to shell stickers on this face.
    pub color: StickerColor,
}

impl FaceRule {
    /// Whether a cubie at `p` lies on the outer shell for this face.
    #[must_use]
    pub fn on_shell(&self, p: IVec3, size: u32) -> bool {
        self.direction.axis.component(p) == self.direction.outer_coordinate(size)
    }
}

/// The six face rules, indexed by [`Face::index`].
pub static FACE_TABLE: [FaceRule; 6] = [
    FaceRule {
        face: Face::PosX,
        direction: SignedAxis::new(Axis::X, Sign::Positive),
        color: StickerColor::Red,
    },
    FaceRule {
        face: Face::NegX,
        direction: SignedAxis::new(Axis::X, Sign::Negative),
        color: StickerColor::Orange,
    },
    FaceRule {
        face: Face::PosY,
        direction: SignedAxis::new(Axis::Y, Sign::Positive),
        color: StickerColor::White,
    },
    FaceRule {
        face: Face::NegY,
        direction: SignedAxis::new(Axis::Y, Sign::Negative),
        color: StickerColor::Yellow,
    },
    FaceRule {
        face: Face::PosZ,
        direction: SignedAxis::new(Axis::Z, Sign::Positive),
        color: StickerColor::Blue,
    },
    FaceRule {
        face: Face::NegZ,
        direction: SignedAxis::new(Axis::Z, Sign::Negative),
        color: StickerColor::Green,
    },
];
