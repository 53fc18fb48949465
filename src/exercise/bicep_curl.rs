use super::{descend, either_side, Detector, Input, Joint, Measurement, Status, Verdict};
use crate::{config::Sensitivity, geometry};

const CURLED_BASE: f32 = 70.0;
const EXTENDED_BASE: f32 = 120.0;

/// Elbow angle, left arm then right arm.
pub(crate) struct BicepCurl;

impl BicepCurl {
    /// Both bounds move away from the neutral band as sensitivity grows.
    fn thresholds(sensitivity: Sensitivity) -> (f32, f32) {
        let s = sensitivity.as_f32();
        (CURLED_BASE - s, EXTENDED_BASE + s)
    }
}

impl Detector for BicepCurl {
    fn evaluate(
        &self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict {
        let (curled, extended) = Self::thresholds(sensitivity);
        either_side(|side| {
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
            descend(degrees, status, curled, extended)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        exercise::{testing::*, ExerciseKind, Side},
        gate::GatedKeypoints,
        pose::KeypointKind,
    };

    fn arm(side: Side, degrees: f32) -> Vec<(KeypointKind, f32, f32)> {
        let (shoulder, elbow, wrist) = joint(degrees);
        vec![
            (side.shoulder(), shoulder.0, shoulder.1),
            (side.elbow(), elbow.0, elbow.1),
            (side.wrist(), wrist.0, wrist.1),
        ]
    }

    fn both(left: f32, right: f32) -> GatedKeypoints {
        let mut entries = arm(Side::Left, left);
        entries.extend(arm(Side::Right, right));
        gated(&entries)
    }

    #[test]
    fn thresholds_at_mid_sensitivity() {
        assert_eq!(BicepCurl::thresholds(sensitivity(15)), (55.0, 135.0));
    }

    #[test]
    fn left_arm_cycle() {
        let frames = vec![
            gated(&arm(Side::Left, 170.0)),
            gated(&arm(Side::Left, 40.0)),
            gated(&arm(Side::Left, 30.0)),
            gated(&arm(Side::Left, 160.0)),
        ];
        let (status, reps, _) = run(ExerciseKind::BicepCurl, sensitivity(15), &frames);
        assert_eq!(reps, 1);
        assert_eq!(status, Status::Up);
    }

    #[test]
    fn right_arm_counts_when_left_missing() {
        let frames = vec![
            gated(&arm(Side::Right, 170.0)),
            gated(&arm(Side::Right, 40.0)),
            gated(&arm(Side::Right, 160.0)),
        ];
        let (_, reps, _) = run(ExerciseKind::BicepCurl, sensitivity(15), &frames);
        assert_eq!(reps, 1);
    }

    #[test]
    fn right_arm_counts_when_left_holds() {
        let frames = vec![both(90.0, 170.0), both(90.0, 40.0), both(90.0, 160.0)];
        let (_, reps, history) = run(ExerciseKind::BicepCurl, sensitivity(15), &frames);
        assert_eq!(reps, 1);
        assert_eq!(history, vec![Status::Up, Status::Down, Status::Up]);
    }

    #[test]
    fn left_transition_skips_right() {
        let keypoints = both(40.0, 170.0);
        let input = Input {
            keypoints: &keypoints,
            reference: None,
        };
        let mut measurements = Vec::new();
        let verdict = BicepCurl.evaluate(&input, Status::Up, sensitivity(15), &mut measurements);
        assert!(matches!(verdict, Verdict::Move(t) if t.status == Status::Down));
        assert_eq!(measurements.len(), 1);
    }

    #[test]
    fn no_arm_abstains() {
        let keypoints = gated(&[(KeypointKind::LeftShoulder, 0.5, 0.5)]);
        let input = Input {
            keypoints: &keypoints,
            reference: None,
        };
        assert_eq!(
            BicepCurl.evaluate(&input, Status::Down, sensitivity(15), &mut Vec::new()),
            Verdict::Abstain
        );
    }
}
