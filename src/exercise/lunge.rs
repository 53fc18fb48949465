use super::{Detector, Input, Joint, Measurement, Side, Status, Transition, Verdict};
use crate::{config::Sensitivity, geometry};

const BENT_BASE: f32 = 100.0;
const STRAIGHT_BASE: f32 = 150.0;

/// Both knee angles: Down needs one knee bent while the other stays straight,
/// Up needs the more bent knee to straighten again.
pub(crate) struct Lunge;

impl Lunge {
    fn thresholds(sensitivity: Sensitivity) -> (f32, f32) {
        let s = sensitivity.as_f32();
        (BENT_BASE + s, STRAIGHT_BASE - s)
    }
}

impl Detector for Lunge {
    fn evaluate(
        &self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict {
        let (left, right) = (Side::Left, Side::Right);
        let [left_hip, left_knee, left_ankle, right_hip, right_knee, right_ankle] =
            match input.keypoints.require([
                left.hip(),
                left.knee(),
                left.ankle(),
                right.hip(),
                right.knee(),
                right.ankle(),
            ]) {
                Some(points) => points,
                None => return Verdict::Abstain,
            };
        let (left_degrees, right_degrees) = match (
            geometry::angle(left_hip, left_knee, left_ankle),
            geometry::angle(right_hip, right_knee, right_ankle),
        ) {
            (Some(l), Some(r)) => (l, r),
            _ => return Verdict::Abstain,
        };
        measurements.push(Measurement::Angle {
            joint: Joint::Knee,
            side: left,
            degrees: left_degrees,
        });
        measurements.push(Measurement::Angle {
            joint: Joint::Knee,
            side: right,
            degrees: right_degrees,
        });

        let bent_knee = left_degrees.min(right_degrees);
        let straight_knee = left_degrees.max(right_degrees);
        let (bent, straight) = Self::thresholds(sensitivity);

        if bent_knee < bent && straight_knee > straight {
            if status == Status::Down {
                Verdict::Hold
            } else {
                Verdict::Move(Transition::to(Status::Down))
            }
        } else if bent_knee > straight {
            match status {
                Status::Down => Verdict::Move(Transition::completing(Status::Up)),
                Status::Ready => Verdict::Move(Transition::to(Status::Up)),
                Status::Up => Verdict::Hold,
            }
        } else {
            Verdict::Hold
        }
    }
}
