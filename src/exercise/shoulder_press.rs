use super::{either_side, Detector, Input, Measurement, Side, Status, Transition, Verdict};
use crate::{config::Sensitivity, geometry};

/// Required lift between stacked joints, as a fraction of upper-arm length.
const OFFSET_BASE: f32 = 0.30;
const OFFSET_PER_STEP: f32 = 0.01;

/// Positional: Up while wrist is above elbow and elbow above shoulder.
/// The rep completes when an extended arm comes back down.
pub(crate) struct ShoulderPress;

impl ShoulderPress {
    fn offset_fraction(sensitivity: Sensitivity) -> f32 {
        OFFSET_BASE - OFFSET_PER_STEP * sensitivity.as_f32()
    }

    fn label(side: Side) -> &'static str {
        match side {
            Side::Left => "left_press_height",
            Side::Right => "right_press_height",
        }
    }
}

impl Detector for ShoulderPress {
    fn evaluate(
        &self,
        input: &Input<'_>,
        status: Status,
        sensitivity: Sensitivity,
        measurements: &mut Vec<Measurement>,
    ) -> Verdict {
        let fraction = Self::offset_fraction(sensitivity);
        either_side(|side| {
            let [shoulder, elbow, wrist] =
                match input.keypoints.require([side.shoulder(), side.elbow(), side.wrist()]) {
                    Some(points) => points,
                    None => return Verdict::Abstain,
                };
            let upper_arm = geometry::distance(shoulder, elbow);
            if upper_arm <= f32::EPSILON {
                return Verdict::Abstain;
            }
            measurements.push(Measurement::Ratio {
                label: Self::label(side),
                value: (shoulder.y() - wrist.y()) / upper_arm,
            });

            let margin = upper_arm * fraction;
            let extended = geometry::is_above(wrist, elbow, margin)
                && geometry::is_above(elbow, shoulder, margin);
            match (extended, status) {
                (true, Status::Up) | (false, Status::Down) => Verdict::Hold,
                (true, _) => Verdict::Move(Transition::to(Status::Up)),
                (false, Status::Up) => Verdict::Move(Transition::completing(Status::Down)),
                (false, Status::Ready) => Verdict::Move(Transition::to(Status::Down)),
            }
        })
    }
}
