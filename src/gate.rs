use crate::{
    point::Point,
    pose::{Keypoint, KeypointKind, Pose, NUM_KEYPOINTS},
};

/// Keypoints scoring below this are treated as absent for the frame.
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;

/// One frame's keypoints that cleared the confidence gate, indexed by kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatedKeypoints {
    keypoints: [Option<Keypoint>; NUM_KEYPOINTS],
}

impl Default for GatedKeypoints {
    fn default() -> Self {
        Self {
            keypoints: [None; NUM_KEYPOINTS],
        }
    }
}

impl GatedKeypoints {
    /// Keep every keypoint with a known kind whose score is at least
    /// [`CONFIDENCE_THRESHOLD`]. A later keypoint of the same kind replaces an
    /// earlier one.
    pub fn gate(pose: &Pose) -> Self {
        let mut gated = Self::default();
        pose.keypoints
            .iter()
            .filter(|kp| kp.score >= CONFIDENCE_THRESHOLD)
            .filter_map(|kp| {
                let kind = kp.kind?;
                let index = kind.idx().ok()?;
                Some((index, *kp))
            })
            .for_each(|(index, kp)| gated.keypoints[index] = Some(kp));
        gated
    }

    pub fn get(&self, kind: KeypointKind) -> Option<&Keypoint> {
        let index = kind.idx().ok()?;
        self.keypoints[index].as_ref()
    }

    pub fn contains(&self, kind: KeypointKind) -> bool {
        self.get(kind).is_some()
    }

    /// Positions of `kinds`, in the order given, or `None` if any is missing.
    pub fn require<const N: usize>(&self, kinds: [KeypointKind; N]) -> Option<[Point; N]> {
        let mut points = [Point::default(); N];
        for (slot, kind) in points.iter_mut().zip(kinds.iter()) {
            *slot = self.get(*kind)?.point;
        }
        Some(points)
    }

    pub fn len(&self) -> usize {
        self.keypoints.iter().filter(|kp| kp.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> + '_ {
        self.keypoints.iter().flatten()
    }
}

impl serde::Serialize for GatedKeypoints {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use KeypointKind::*;

    fn pose(entries: &[(KeypointKind, f32)]) -> Pose {
        Pose::new(
            entries
                .iter()
                .map(|&(kind, score)| Keypoint::new(kind, 0.5, 0.5, score).unwrap())
                .collect(),
        )
    }

    #[test]
    fn threshold_is_inclusive() {
        let gated = GatedKeypoints::gate(&pose(&[(LeftHip, 0.3), (LeftKnee, 0.29)]));
        assert!(gated.contains(LeftHip));
        assert!(!gated.contains(LeftKnee));
        assert_eq!(gated.len(), 1);
    }

    #[test]
    fn low_confidence_is_absent() {
        let gated = GatedKeypoints::gate(&pose(&[(LeftHip, 0.2)]));
        assert!(gated.is_empty());
        assert!(gated.require([LeftHip]).is_none());
    }

    #[test]
    fn nan_score_is_absent() {
        let gated = GatedKeypoints::gate(&pose(&[(Nose, f32::NAN)]));
        assert!(gated.is_empty());
    }

    #[test]
    fn unknown_kind_is_dropped() {
        let kp = Keypoint::named("left_heel", 0.1, 0.1, 0.99).unwrap();
        let gated = GatedKeypoints::gate(&Pose::new(vec![kp]));
        assert!(gated.is_empty());
    }

    #[test]
    fn require_preserves_order() {
        let p = Pose::new(vec![
            Keypoint::new(LeftAnkle, 0.3, 0.9, 0.9).unwrap(),
            Keypoint::new(LeftHip, 0.1, 0.2, 0.9).unwrap(),
        ]);
        let gated = GatedKeypoints::gate(&p);
        let [hip, ankle] = gated.require([LeftHip, LeftAnkle]).unwrap();
        assert_eq!(hip, Point::new(0.1, 0.2).unwrap());
        assert_eq!(ankle, Point::new(0.3, 0.9).unwrap());
        assert!(gated.require([LeftHip, LeftKnee]).is_none());
    }
}
