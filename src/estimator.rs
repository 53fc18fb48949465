use crate::pose::Pose;
use async_trait::async_trait;

/// Supplies the frame to analyze next. `None` means the source is exhausted.
pub trait FrameSource: Send {
    type Frame: Send;

    fn current_frame(&mut self) -> Option<Self::Frame>;
}

/// The pose model. Latency is model-dependent and unbounded.
#[async_trait]
pub trait PoseEstimator: Send {
    type Frame: Send;

    /// `None` when no body was found in the frame.
    async fn estimate(&mut self, frame: Self::Frame) -> Option<Pose>;
}
