use super::{ascend, either_side, Detector, Input, Joint, Measurement, Status, Verdict};
use crate::{config::Sensitivity, geometry};

const UP_BASE: f32 = 80.0;
const DOWN_BASE: f32 = 30.0;

/// Shoulder abduction: the angle at the shoulder between hip and elbow.
/// Up is reached first and the rep completes on the way back down.
pub(crate) struct LateralRaise;

impl LateralRaise {
    fn thresholds(sensitivity: Sensitivity) -> (f32, f32) {
        let s = sensitivity.as_f32();
        (UP_BASE - s, DOWN_BASE + s)
    }
}

impl Detector for LateralRaise {
    fn evaluate(
        &self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict {
        let (up, down) = Self::thresholds(sensitivity);
        either_side(|side| {
            let [hip, shoulder, elbow] =
                match input.keypoints.require([side.hip(), side.shoulder(), side.elbow()]) {
                    Some(points) => points,
                    None => return Verdict::Abstain,
                };
            let degrees = match geometry::angle(hip, shoulder, elbow) {
                Some(degrees) => degrees,
                None => return Verdict::Abstain,
            };
            measurements.push(Measurement::Angle {
                joint: Joint::Shoulder,
                side,
                degrees,
            });
            ascend(degrees, status, up, down)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        exercise::{testing::*, ExerciseKind, Side},
        gate::GatedKeypoints,
    };

    fn frame(side: Side, degrees: f32) -> GatedKeypoints {
        let (hip, shoulder, elbow) = joint(degrees);
        gated(&[
            (side.hip(), hip.0, hip.1),
            (side.shoulder(), shoulder.0, shoulder.1),
            (side.elbow(), elbow.0, elbow.1),
        ])
    }

    #[test]
    fn thresholds_at_mid_sensitivity() {
        assert_eq!(LateralRaise::thresholds(sensitivity(15)), (65.0, 45.0));
    }

    #[test]
    fn reversed_polarity_cycle() {
        let frames = [20.0, 45.0, 85.0, 40.0, 25.0]
            .iter()
            .map(|&a| frame(Side::Left, a))
            .collect::<Vec<_>>();
        let (status, reps, history) = run(ExerciseKind::LateralRaise, sensitivity(15), &frames);
        assert_eq!(reps, 1);
        assert_eq!(status, Status::Down);
        // first Up is observed at 85 degrees; 40 is already under the 45 degree
        // down threshold, so the rep completes there and 25 only holds Down
        assert_eq!(
            history,
            vec![
                Status::Down,
                Status::Down,
                Status::Up,
                Status::Down,
                Status::Down
            ]
        );
    }

    #[test]
    fn lowered_arms_never_count() {
        let frames = [20.0, 10.0, 30.0, 15.0]
            .iter()
            .map(|&a| frame(Side::Right, a))
            .collect::<Vec<_>>();
        let (status, reps, _) = run(ExerciseKind::LateralRaise, sensitivity(15), &frames);
        assert_eq!(reps, 0);
        assert_eq!(status, Status::Down);
    }

    #[test]
    fn held_raise_counts_once() {
        let frames = [20.0, 90.0, 88.0, 92.0, 70.0, 30.0, 20.0]
            .iter()
            .map(|&a| frame(Side::Left, a))
            .collect::<Vec<_>>();
        let (_, reps, _) = run(ExerciseKind::LateralRaise, sensitivity(15), &frames);
        assert_eq!(reps, 1);
    }

    #[test]
    fn higher_sensitivity_never_counts_fewer() {
        let angles = [20.0, 60.0, 50.0, 70.0, 40.0, 58.0, 52.0, 90.0, 20.0];
        let frames = angles
            .iter()
            .map(|&a| frame(Side::Left, a))
            .collect::<Vec<_>>();
        let mut previous = 0;
        for s in Sensitivity::MIN..=Sensitivity::MAX {
            let (_, reps, _) = run(ExerciseKind::LateralRaise, sensitivity(s), &frames);
            assert!(reps >= previous, "sensitivity {} counted {} < {}", s, reps, previous);
            previous = reps;
        }
    }
}
