use super::{descend, Detector, Input, Joint, Measurement, Side, Status, Verdict};
use crate::{config::Sensitivity, geometry};

const DOWN_BASE: f32 = 90.0;
const UP_BASE: f32 = 160.0;

/// Elbow angle on the left arm.
pub(crate) struct PushUp;

impl PushUp {
    fn thresholds(sensitivity: Sensitivity) -> (f32, f32) {
        let s = sensitivity.as_f32();
        (DOWN_BASE + s, UP_BASE - s)
    }
}

impl Detector for PushUp {
    fn evaluate(
        &self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict {
        let side = Side::Left;
        let [shoulder, elbow, wrist] =
            match input.keypoints.require([side.shoulder(), side.elbow(), side.wrist()]) {
                Some(points) => points,
                None => return Verdict::Abstain,
            };
        let degrees = match geometry::angle(shoulder, elbow, wrist) {
            Some(degrees) => degrees,
            None => return Verdict::Abstain,
        };
        measurements.push(Measurement::Angle {
            joint: Joint::Elbow,
            side,
            degrees,
        });

        let (down, up) = Self::thresholds(sensitivity);
        descend(degrees, status, down, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        exercise::{testing::*, ExerciseKind},
        gate::GatedKeypoints,
        pose::KeypointKind::*,
    };

    fn frame(degrees: f32) -> GatedKeypoints {
        let (shoulder, elbow, wrist) = joint(degrees);
        gated(&[
            (LeftShoulder, shoulder.0, shoulder.1),
            (LeftElbow, elbow.0, elbow.1),
            (LeftWrist, wrist.0, wrist.1),
        ])
    }

    #[test]
    fn thresholds_at_mid_sensitivity() {
        assert_eq!(PushUp::thresholds(sensitivity(15)), (105.0, 145.0));
    }

    #[test]
    fn counts_each_press() {
        let angles = [170.0, 80.0, 75.0, 165.0, 172.0, 85.0, 160.0];
        let frames = angles.iter().map(|&a| frame(a)).collect::<Vec<_>>();
        let (status, reps, _) = run(ExerciseKind::PushUp, sensitivity(15), &frames);
        assert_eq!(reps, 2);
        assert_eq!(status, Status::Up);
    }

    #[test]
    fn shallow_dip_is_not_a_rep() {
        let angles = [170.0, 110.0, 170.0];
        let frames = angles.iter().map(|&a| frame(a)).collect::<Vec<_>>();
        let (_, reps, _) = run(ExerciseKind::PushUp, sensitivity(5), &frames);
        assert_eq!(reps, 0);
        let (_, reps, _) = run(ExerciseKind::PushUp, sensitivity(25), &frames);
        assert_eq!(reps, 1);
    }

    #[test]
    fn records_elbow_angle() {
        let keypoints = frame(90.0);
        let input = Input {
            keypoints: &keypoints,
            reference: None,
        };
        let mut measurements = Vec::new();
        PushUp.evaluate(&input, Status::Ready, sensitivity(15), &mut measurements);
        match measurements.as_slice() {
            [Measurement::Angle {
                joint: Joint::Elbow,
                side: Side::Left,
                degrees,
            }] => assert!((degrees - 90.0).abs() < 0.01),
            other => panic!("unexpected measurements: {:?}", other),
        }
    }
}
