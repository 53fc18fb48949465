use super::{ascend, Detector, Input, Measurement, Status, Verdict};
use crate::{config::Sensitivity, gate::GatedKeypoints, geometry, pose::KeypointKind::*};

const EXTENDED_BASE: f32 = 1.5;
const CLOSED_BASE: f32 = 0.8;
const STEP: f32 = 0.02;

/// Hip widths below this cannot normalize a spread.
const MIN_HIP_WIDTH: f32 = 1e-3;

/// Ankle spread over hip width. Up (extended) is reached first and the rep
/// completes on the return to Down (closed).
pub(crate) struct JumpingJack;

impl JumpingJack {
    fn thresholds(sensitivity: Sensitivity) -> (f32, f32) {
        let s = sensitivity.as_f32();
        (EXTENDED_BASE - STEP * s, CLOSED_BASE + STEP * s)
    }

    fn hip_width(keypoints: &GatedKeypoints) -> Option<f32> {
        let [left, right] = keypoints.require([LeftHip, RightHip])?;
        Some(geometry::distance(left, right)).filter(|width| *width >= MIN_HIP_WIDTH)
    }
}

impl Detector for JumpingJack {
    fn evaluate(
        &self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict {
        let [left_shoulder, right_shoulder, left_ankle, right_ankle] = match input
            .keypoints
            .require([LeftShoulder, RightShoulder, LeftAnkle, RightAnkle])
        {
            Some(points) => points,
            None => return Verdict::Abstain,
        };
        if !(input.keypoints.contains(LeftHip) && input.keypoints.contains(RightHip)) {
            return Verdict::Abstain;
        }
        // a sideways-on body collapses the hips; fall back to the session baseline
        let hip_width = match Self::hip_width(input.keypoints)
            .or_else(|| input.reference.and_then(Self::hip_width))
        {
            Some(width) => width,
            None => return Verdict::Abstain,
        };

        let ankle_ratio = geometry::distance(left_ankle, right_ankle) / hip_width;
        let shoulder_ratio = geometry::distance(left_shoulder, right_shoulder) / hip_width;
        measurements.push(Measurement::Ratio {
            label: "ankle_spread",
            value: ankle_ratio,
        });
        measurements.push(Measurement::Ratio {
            label: "shoulder_spread",
            value: shoulder_ratio,
        });

        let (extended, closed) = Self::thresholds(sensitivity);
        ascend(ankle_ratio, status, extended, closed)
    }
}
