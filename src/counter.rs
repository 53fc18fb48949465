use crate::{
    config::Sensitivity,
    exercise::{ExerciseKind, Input, Measurement, Status},
    gate::GatedKeypoints,
    pose::Pose,
};
use tracing::{debug, info, instrument, trace};

/// What happened to the session on one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOutcome {
    /// The estimator found no body.
    NoPose,
    /// A required keypoint was missing; state untouched.
    Abstained,
    Held,
    Transitioned,
    RepCompleted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub outcome: FrameOutcome,
    /// `None` when there was no pose.
    pub keypoints: Option<GatedKeypoints>,
    pub measurements: Vec<Measurement>,
}

/// All per-session state. Never mutated in place: every frame produces the
/// next value.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    kind: ExerciseKind,
    status: Status,
    rep_count: u32,
    reference: Option<GatedKeypoints>,
    sensitivity: Sensitivity,
}

impl SessionState {
    pub fn new(kind: ExerciseKind, sensitivity: Sensitivity) -> Self {
        Self {
            kind,
            status: Status::Ready,
            rep_count: 0,
            reference: None,
            sensitivity,
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn reference(&self) -> Option<&GatedKeypoints> {
        self.reference.as_ref()
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Back to `Ready` with no reps and no reference, keeping kind and
    /// sensitivity.
    pub fn reset(&self) -> Self {
        debug!(message = "session reset", kind = %self.kind);
        Self::new(self.kind, self.sensitivity)
    }

    /// Switching to a different exercise starts a fresh session.
    pub fn with_kind(&self, kind: ExerciseKind) -> Self {
        if kind == self.kind {
            self.clone()
        } else {
            info!(message = "exercise changed", from = %self.kind, to = %kind);
            Self::new(kind, self.sensitivity)
        }
    }

    pub fn with_sensitivity(&self, sensitivity: Sensitivity) -> Self {
        if sensitivity != self.sensitivity {
            debug!(message = "sensitivity changed", from = %self.sensitivity, to = %sensitivity);
        }
        Self {
            sensitivity,
            ..self.clone()
        }
    }

    /// Apply a strategy's `(status, rep_completed)` result.
    pub fn apply(&self, status: Status, rep_completed: bool) -> Self {
        Self {
            status,
            rep_count: self.rep_count + u32::from(rep_completed),
            ..self.clone()
        }
    }

    /// Process one frame: gate, capture the reference, evaluate, apply.
    #[instrument(name = "SessionState::step", skip(self, pose), fields(kind = %self.kind), level = "trace")]
    pub fn step(&self, pose: Option<&Pose>) -> (Self, FrameReport) {
        let pose = match pose.filter(|pose| !pose.is_empty()) {
            Some(pose) => pose,
            None => {
                trace!(message = "no pose");
                return (
                    self.clone(),
                    FrameReport {
                        outcome: FrameOutcome::NoPose,
                        keypoints: None,
                        measurements: Vec::new(),
                    },
                );
            }
        };

        let keypoints = GatedKeypoints::gate(pose);
        let reference = match self.reference {
            None if !keypoints.is_empty() => {
                debug!(message = "captured reference keypoints", count = keypoints.len());
                Some(keypoints)
            }
            reference => reference,
        };

        let evaluation = self.kind.evaluate(
            &Input {
                keypoints: &keypoints,
                reference: reference.as_ref(),
            },
            self.status,
            self.sensitivity,
        );
        let (status, rep_completed) = evaluation.outcome();

        let outcome = if evaluation.abstained {
            trace!(message = "strategy abstained");
            FrameOutcome::Abstained
        } else if rep_completed {
            FrameOutcome::RepCompleted
        } else if status != self.status {
            FrameOutcome::Transitioned
        } else {
            FrameOutcome::Held
        };

        let next = Self {
            reference,
            ..self.apply(status, rep_completed)
        };
        match outcome {
            FrameOutcome::RepCompleted => info!(
                message = "rep completed",
                kind = %next.kind,
                reps = next.rep_count
            ),
            FrameOutcome::Transitioned => debug!(
                message = "status changed",
                from = ?self.status,
                to = ?next.status
            ),
            _ => {}
        }

        (
            next,
            FrameReport {
                outcome,
                keypoints: Some(keypoints),
                measurements: evaluation.measurements,
            },
        )
    }
}
