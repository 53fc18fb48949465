use super::{descend, Detector, Input, Joint, Measurement, Side, Status, Verdict};
use crate::{config::Sensitivity, geometry};

const DOWN_BASE: f32 = 110.0;
const UP_BASE: f32 = 160.0;

/// Knee angle on the left leg.
pub(crate) struct Squat;

impl Squat {
    fn thresholds(sensitivity: Sensitivity) -> (f32, f32) {
        let s = sensitivity.as_f32();
        (DOWN_BASE + s, UP_BASE - s)
    }
}

impl Detector for Squat {
    fn evaluate(
        &self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict {
        let side = Side::Left;
        let [hip, knee, ankle] = match input.keypoints.require([side.hip(), side.knee(), side.ankle()]) {
            Some(points) => points,
            None => return Verdict::Abstain,
        };
        let degrees = match geometry::angle(hip, knee, ankle) {
            Some(degrees) => degrees,
            None => return Verdict::Abstain,
        };
        measurements.push(Measurement::Angle {
            joint: Joint::Knee,
            side,
            degrees,
        });

        let (down, up) = Self::thresholds(sensitivity);
        descend(degrees, status, down, up)
    }
}
