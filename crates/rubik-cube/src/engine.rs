//! The turn engine: starts, animates, and commits layer turns.
//!
//! At most one turn is active. While it runs, [`TurnEngine::cubie_transform`]
//! overlays the partial rotation on the turning layer without touching the
//! lattice; when [`TurnEngine::advance`] reaches the target angle the turn is
//! committed exactly once through [`CubeLattice::commit_turn`].

use std::collections::BTreeSet;

use glam::{Mat4, Vec3};
use tracing::{debug, info};

use crate::cubie::{Cubie, CubieId};
use crate::error::TurnError;
use crate::face::{Sign, SignedAxis};
use crate::lattice::CubeLattice;
use crate::turn::{LayerSelect, Turn, TurnSpec, layer_contains};

/// Default animation speed: a quarter turn takes half a second.
pub const DEFAULT_TURN_SPEED_DEG_S: f32 = 180.0;

/// Tolerance when checking that a requested magnitude is a quarter-turn
/// multiple.
const QUARTER_TOLERANCE_DEG: f32 = 1e-3;

/// Why a turn request was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Another turn is still animating.
    Busy,
    /// The axis vector was zero.
    ZeroAxis,
    /// The axis vector had more than one non-zero component.
    NonPrincipalAxis,
    /// The magnitude was zero or not a multiple of 90°.
    NotQuarterTurn,
}

/// Outcome of a turn request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRequest {
    /// The turn is now animating.
    Started,
    /// The request was a no-op.
    Rejected(RejectReason),
}

impl TurnRequest {
    /// Whether the request started a turn.
    #[must_use]
    pub fn is_started(self) -> bool {
        self == TurnRequest::Started
    }
}

/// Per-frame result of [`TurnEngine::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnProgress {
    /// Whether a turn is still animating after this step.
    pub active: bool,
    /// Signed display angle of the active turn (0 when idle).
    pub signed_angle_deg: f32,
    /// Whether this step committed a turn to the lattice.
    pub committed: bool,
}

impl TurnProgress {
    const IDLE: Self = Self {
        active: false,
        signed_angle_deg: 0.0,
        committed: false,
    };
}

/// Animates and commits layer turns on a [`CubeLattice`].
#[derive(Clone, Debug)]
pub struct TurnEngine {
    speed_deg_per_s: f32,
    active: Option<Turn>,
    committed_turns: u64,
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_SPEED_DEG_S)
    }
}

impl TurnEngine {
    /// Creates an idle engine animating at `speed_deg_per_s`.
    #[must_use]
    pub fn new(speed_deg_per_s: f32) -> Self {
        Self {
            speed_deg_per_s: speed_deg_per_s.max(0.0),
            active: None,
            committed_turns: 0,
        }
    }

    /// Animation speed in degrees per second.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed_deg_per_s
    }

    /// Changes the animation speed. Negative values are treated as zero.
    pub fn set_speed(&mut self, speed_deg_per_s: f32) {
        self.speed_deg_per_s = speed_deg_per_s.max(0.0);
    }

    /// Whether a turn is animating.
    #[must_use]
    pub fn is_turning(&self) -> bool {
        self.active.is_some()
    }

    /// The animating turn, if any.
    #[must_use]
    pub fn active_turn(&self) -> Option<&Turn> {
        self.active.as_ref()
    }

    /// Number of turns committed since creation.
    #[must_use]
    pub fn committed_turns(&self) -> u64 {
        self.committed_turns
    }

    /// Requests a turn from raw input parameters.
    ///
    /// `axis` must point along exactly one principal axis; `magnitude_deg` must
    /// be a positive multiple of 90°. The signed target angle is
    /// `direction × magnitude_deg`. Invalid requests and requests made while a
    /// turn is active are no-ops.
    pub fn start_turn(
        &mut self,
        axis: Vec3,
        layer: LayerSelect,
        magnitude_deg: f32,
        direction: Sign,
    ) -> TurnRequest {
        let signed_axis = match SignedAxis::from_vec3(axis) {
            Some(a) => a,
            None if axis.length_squared() <= f32::EPSILON => {
                return self.reject(RejectReason::ZeroAxis);
            }
            None => return self.reject(RejectReason::NonPrincipalAxis),
        };
        self.start(TurnSpec {
            axis: signed_axis,
            layer,
            angle_deg: magnitude_deg.abs() * direction.signum() as f32,
        })
    }

    /// Requests a fully-specified turn. Same rejection rules as
    /// [`start_turn`](Self::start_turn).
    pub fn start(&mut self, spec: TurnSpec) -> TurnRequest {
        if self.active.is_some() {
            return self.reject(RejectReason::Busy);
        }
        let quarters = spec.angle_deg / 90.0;
        if spec.angle_deg.abs() < QUARTER_TOLERANCE_DEG
            || (quarters - quarters.round()).abs() * 90.0 > QUARTER_TOLERANCE_DEG
        {
            return self.reject(RejectReason::NotQuarterTurn);
        }
        debug!(
            "Starting {:.0}° turn about {:?} on layer {:?}",
            spec.angle_deg, spec.axis, spec.layer
        );
        self.active = Some(Turn::new(spec));
        TurnRequest::Started
    }

    fn reject(&self, reason: RejectReason) -> TurnRequest {
        debug!("Turn request ignored: {:?}", reason);
        TurnRequest::Rejected(reason)
    }

    /// Advances the active turn by `speed × dt_seconds` and commits it once
    /// the target angle is reached.
    ///
    /// # Errors
    ///
    /// Propagates a [`TurnError`] from the commit. The turn is discarded and
    /// the lattice is left as it was before the turn.
    pub fn advance(
        &mut self,
        lattice: &mut CubeLattice,
        dt_seconds: f32,
    ) -> Result<TurnProgress, TurnError> {
        let Some(turn) = self.active.as_mut() else {
            return Ok(TurnProgress::IDLE);
        };
        turn.step(self.speed_deg_per_s * dt_seconds.max(0.0));
        if !turn.is_complete() {
            return Ok(TurnProgress {
                active: true,
                signed_angle_deg: turn.signed_angle_deg(),
                committed: false,
            });
        }

        let spec = turn.spec();
        self.active = None;
        let moved = lattice.commit_turn(spec.axis, spec.layer, spec.angle_deg)?;
        self.committed_turns += 1;
        info!(
            turn = self.committed_turns,
            moved,
            "Turn committed: {:.0}° about {:?}",
            spec.angle_deg,
            spec.axis
        );
        Ok(TurnProgress {
            active: false,
            signed_angle_deg: spec.angle_deg,
            committed: true,
        })
    }

    /// Rotation overlay for the turning layer at the current progress.
    #[must_use]
    pub fn animation_rotation(&self) -> Mat4 {
        self.active
            .as_ref()
            .map_or(Mat4::IDENTITY, |turn| Mat4::from_mat3(turn.rotation()))
    }

    /// Whether `cubie` is drawn with the animation overlay this frame.
    #[must_use]
    pub fn is_animating(&self, lattice: &CubeLattice, cubie: &Cubie) -> bool {
        self.active
            .as_ref()
            .is_some_and(|turn| turn.contains(cubie.grid_position(), lattice.size()))
    }

    /// Model matrix of `cubie` for this frame, including the animation
    /// overlay when it belongs to the turning layer.
    #[must_use]
    pub fn cubie_transform(&self, lattice: &CubeLattice, cubie: &Cubie, scale: f32) -> Mat4 {
        let anim = if self.is_animating(lattice, cubie) {
            self.animation_rotation()
        } else {
            Mat4::IDENTITY
        };
        cubie.model_matrix(lattice.slot_position(cubie.grid_position()), anim, scale)
    }

    /// Ids of the cubies in the active turn's layer (empty when idle).
    #[must_use]
    pub fn affected_cubies(&self, lattice: &CubeLattice) -> BTreeSet<CubieId> {
        match &self.active {
            Some(turn) => layer_membership(lattice, turn.axis(), turn.layer()),
            None => BTreeSet::new(),
        }
    }
}

/// Ids of the cubies in the layer selected by `axis` and `layer`.
#[must_use]
pub fn layer_membership(
    lattice: &CubeLattice,
    axis: SignedAxis,
    layer: LayerSelect,
) -> BTreeSet<CubieId> {
    lattice
        .cubies()
        .iter()
        .filter(|c| layer_contains(axis, layer, lattice.size(), c.grid_position()))
        .map(Cubie::id)
        .collect()
}
