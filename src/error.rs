use crate::pose::KeypointKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sensitivity must be within 5..=25, got {0}")]
    InvalidSensitivity(u8),

    #[error("failed to parse sensitivity from {0:?}")]
    ParseSensitivity(String, #[source] std::num::ParseIntError),

    #[error("unknown exercise: {0:?}")]
    UnknownExercise(String),

    #[error("unknown keypoint name: {0:?}")]
    UnknownKeypoint(String),

    #[error("failed to construct NotNan from f32: {1}")]
    ConstructNotNan(#[source] ordered_float::FloatIsNan, f32),

    #[error("failed to convert keypoint variant to usize: {0:?}")]
    KeypointVariantToUSize(KeypointKind),

    #[error("failed to load pose estimator")]
    LoadEstimator(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to open recording: {1:?}")]
    OpenRecording(#[source] std::io::Error, std::path::PathBuf),

    #[error("failed to read line {1} of recording")]
    ReadRecording(#[source] std::io::Error, usize),

    #[error("failed to parse line {1} of recording")]
    ParseRecording(#[source] serde_json::Error, usize),

    #[error("session task failed")]
    SessionTask(#[source] tokio::task::JoinError),
}
