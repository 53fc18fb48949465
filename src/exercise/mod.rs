use crate::{config::Sensitivity, error::Error, gate::GatedKeypoints, pose::KeypointKind};
use std::{fmt, str::FromStr};

mod bicep_curl;
mod jumping_jack;
mod lateral_raise;
mod lunge;
mod push_up;
mod shoulder_press;
mod squat;

/// The motion extreme most recently recognized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Nothing observed yet this session.
    Ready,
    Up,
    Down,
}

impl Default for Status {
    fn default() -> Self {
        Self::Ready
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn shoulder(self) -> KeypointKind {
        match self {
            Self::Left => KeypointKind::LeftShoulder,
            Self::Right => KeypointKind::RightShoulder,
        }
    }

    pub fn elbow(self) -> KeypointKind {
        match self {
            Self::Left => KeypointKind::LeftElbow,
            Self::Right => KeypointKind::RightElbow,
        }
    }

    pub fn wrist(self) -> KeypointKind {
        match self {
            Self::Left => KeypointKind::LeftWrist,
            Self::Right => KeypointKind::RightWrist,
        }
    }

    pub fn hip(self) -> KeypointKind {
        match self {
            Self::Left => KeypointKind::LeftHip,
            Self::Right => KeypointKind::RightHip,
        }
    }

    pub fn knee(self) -> KeypointKind {
        match self {
            Self::Left => KeypointKind::LeftKnee,
            Self::Right => KeypointKind::RightKnee,
        }
    }

    pub fn ankle(self) -> KeypointKind {
        match self {
            Self::Left => KeypointKind::LeftAnkle,
            Self::Right => KeypointKind::RightAnkle,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Knee,
    Elbow,
    Shoulder,
}

/// A value a strategy derived while evaluating a frame, kept for overlays.
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Measurement {
    Angle { joint: Joint, side: Side, degrees: f32 },
    Ratio { label: &'static str, value: f32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transition {
    pub status: Status,
    pub rep_completed: bool,
}

impl Transition {
    fn to(status: Status) -> Self {
        Self {
            status,
            rep_completed: false,
        }
    }

    fn completing(status: Status) -> Self {
        Self {
            status,
            rep_completed: true,
        }
    }
}

/// What a strategy concluded about one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Required keypoints were missing or the geometry was undefined.
    Abstain,
    /// Observed, but no status change.
    Hold,
    Move(Transition),
}

/// Everything a strategy may read for one frame.
#[derive(Debug, Copy, Clone)]
pub struct Input<'a> {
    pub keypoints: &'a GatedKeypoints,
    /// The first gated pose of the session, if captured.
    pub reference: Option<&'a GatedKeypoints>,
}

pub(crate) trait Detector {
    fn evaluate(
        &self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict;
}

/// Normal polarity: Down is reached first, the rep completes on the way back Up.
///
/// When the two bands overlap, leaving the current extreme wins.
pub(crate) fn descend(value: f32, status: Status, down_below: f32, up_above: f32) -> Verdict {
    let down = value < down_below;
    let up = value > up_above;
    match status {
        Status::Down if up => Verdict::Move(Transition::completing(Status::Up)),
        Status::Up if down => Verdict::Move(Transition::to(Status::Down)),
        Status::Ready if down => Verdict::Move(Transition::to(Status::Down)),
        Status::Ready if up => Verdict::Move(Transition::to(Status::Up)),
        _ => Verdict::Hold,
    }
}

/// Reversed polarity: Up is reached first, the rep completes on the way back Down.
///
/// When the two bands overlap, leaving the current extreme wins.
pub(crate) fn ascend(value: f32, status: Status, up_above: f32, down_below: f32) -> Verdict {
    let up = value > up_above;
    let down = value < down_below;
    match status {
        Status::Up if down => Verdict::Move(Transition::completing(Status::Down)),
        Status::Down if up => Verdict::Move(Transition::to(Status::Up)),
        Status::Ready if up => Verdict::Move(Transition::to(Status::Up)),
        Status::Ready if down => Verdict::Move(Transition::to(Status::Down)),
        _ => Verdict::Hold,
    }
}

/// Left side first. The first side to move wins and the other is not checked.
pub(crate) fn either_side<F>(mut evaluate_side: F) -> Verdict
where
    F: FnMut(Side) -> Verdict,
{
    let mut observed = false;
    for side in Side::BOTH.iter().copied() {
        match evaluate_side(side) {
            Verdict::Move(transition) => return Verdict::Move(transition),
            Verdict::Hold => observed = true,
            Verdict::Abstain => {}
        }
    }
    if observed {
        Verdict::Hold
    } else {
        Verdict::Abstain
    }
}

/// The supported movements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    Squat,
    PushUp,
    BicepCurl,
    LateralRaise,
    ShoulderPress,
    JumpingJack,
    Lunge,
}

impl Default for ExerciseKind {
    fn default() -> Self {
        Self::Squat
    }
}

/// Result of running the active strategy on one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: Status,
    pub rep_completed: bool,
    pub abstained: bool,
    pub measurements: Vec<Measurement>,
}

impl Evaluation {
    pub fn outcome(&self) -> (Status, bool) {
        (self.status, self.rep_completed)
    }
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 7] = [
        Self::Squat,
        Self::PushUp,
        Self::BicepCurl,
        Self::LateralRaise,
        Self::ShoulderPress,
        Self::JumpingJack,
        Self::Lunge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::PushUp => "push-up",
            Self::BicepCurl => "bicep-curl",
            Self::LateralRaise => "lateral-raise",
            Self::ShoulderPress => "shoulder-press",
            Self::JumpingJack => "jumping-jack",
            Self::Lunge => "lunge",
        }
    }

    fn verdict(
        self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict {
        match self {
            Self::Squat => squat::Squat.evaluate(input, status, sensitivity, measurements),
            Self::PushUp => push_up::PushUp.evaluate(input, status, sensitivity, measurements),
            Self::BicepCurl => {
                bicep_curl::BicepCurl.evaluate(input, status, sensitivity, measurements)
            }
            Self::LateralRaise => {
                lateral_raise::LateralRaise.evaluate(input, status, sensitivity, measurements)
            }
            Self::ShoulderPress => {
                shoulder_press::ShoulderPress.evaluate(input, status, sensitivity, measurements)
            }
            Self::JumpingJack => {
                jumping_jack::JumpingJack.evaluate(input, status, sensitivity, measurements)
            }
            Self::Lunge => lunge::Lunge.evaluate(input, status, sensitivity, measurements),
        }
    }

    /// Run this exercise's strategy on one frame's gated keypoints.
    pub fn evaluate(
        self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
    ) -> Evaluation {
        let mut measurements = Vec::new();
        match self.verdict(input, status, sensitivity, &mut measurements) {
            Verdict::Abstain => Evaluation {
                status,
                rep_completed: false,
                abstained: true,
                measurements,
            },
            Verdict::Hold => Evaluation {
                status,
                rep_completed: false,
                abstained: false,
                measurements,
            },
            Verdict::Move(Transition {
                status,
                rep_completed,
            }) => Evaluation {
                status,
                rep_completed,
                abstained: false,
                measurements,
            },
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    /// Accepts `push-up`, `push_up`, `pushup` and `PushUp`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect::<String>();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().replace('-', "") == normalized)
            .ok_or_else(|| Error::UnknownExercise(s.to_owned()))
    }
}
