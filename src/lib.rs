//! Count exercise repetitions from a stream of pose keypoints.

pub mod config;
pub mod counter;
pub mod error;
pub mod estimator;
pub mod exercise;
pub mod gate;
pub mod geometry;
pub mod point;
pub mod pose;
pub mod replay;
pub mod session;

pub use crate::{
    config::{Sensitivity, Settings},
    counter::{FrameOutcome, FrameReport, SessionState},
    error::Error,
    estimator::{FrameSource, PoseEstimator},
    exercise::{ExerciseKind, Measurement, Status},
    gate::GatedKeypoints,
    pose::{Keypoint, KeypointKind, Pose},
    session::{Session, Snapshot},
};
