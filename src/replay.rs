//! Drive a session from a recorded keypoint stream.
//!
//! A recording is JSON lines, one per frame: `null` or `[]` when no body was
//! found, otherwise an array of `{"name", "x", "y", "score"}` objects.

use crate::{
    error::Error,
    estimator::{FrameSource, PoseEstimator},
    pose::{Keypoint, Pose},
};
use async_trait::async_trait;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RecordedKeypoint {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(alias = "confidence")]
    pub score: f32,
}

type RecordedFrame = Option<Vec<RecordedKeypoint>>;

#[derive(Debug, Clone, Default)]
pub struct Recording {
    frames: Arc<[RecordedFrame]>,
}

impl Recording {
    pub fn open<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::OpenRecording(e, PathBuf::from(path)))?;
        let recording = Self::from_reader(BufReader::new(file))?;
        debug!(message = "loaded recording", ?path, frames = recording.len());
        Ok(recording)
    }

    /// Blank lines are skipped; every other line must parse.
    pub fn from_reader<R>(reader: R) -> Result<Self, Error>
    where
        R: BufRead,
    {
        let mut frames = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line_number = i + 1;
            let line = line.map_err(|e| Error::ReadRecording(e, line_number))?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str::<RecordedFrame>(&line)
                .map_err(|e| Error::ParseRecording(e, line_number))?;
            frames.push(frame);
        }
        Ok(Self {
            frames: frames.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// A source yielding every frame index of this recording once, in order.
    pub fn frames(&self) -> FrameCounter {
        FrameCounter {
            next: 0,
            len: self.len(),
        }
    }
}

/// Frame indices `0..len`, standing in for a camera.
#[derive(Debug, Clone)]
pub struct FrameCounter {
    next: usize,
    len: usize,
}

impl FrameSource for FrameCounter {
    type Frame = usize;

    fn current_frame(&mut self) -> Option<Self::Frame> {
        if self.next < self.len {
            self.next += 1;
            Some(self.next - 1)
        } else {
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("recording contains no frames")]
pub struct EmptyRecording;

/// Looks poses up in a recording, optionally after a simulated model latency.
#[derive(Debug, Clone)]
pub struct ReplayEstimator {
    recording: Recording,
    latency: Duration,
}

impl ReplayEstimator {
    pub fn new(recording: Recording, latency: Duration) -> Result<Self, EmptyRecording> {
        if recording.is_empty() {
            return Err(EmptyRecording);
        }
        Ok(Self { recording, latency })
    }
}

#[async_trait]
impl PoseEstimator for ReplayEstimator {
    type Frame = usize;

    async fn estimate(&mut self, frame: Self::Frame) -> Option<Pose> {
        if self.latency > Duration::from_millis(0) {
            tokio::time::sleep(self.latency).await;
        }
        let recorded = self.recording.frames.get(frame)?.as_ref()?;
        let keypoints = recorded
            .iter()
            .filter_map(|kp| match Keypoint::named(&kp.name, kp.x, kp.y, kp.score) {
                Ok(keypoint) => Some(keypoint),
                Err(error) => {
                    warn!(message = "dropping keypoint", frame, name = %kp.name, %error);
                    None
                }
            })
            .collect::<Vec<_>>();
        if keypoints.is_empty() {
            None
        } else {
            Some(Pose::new(keypoints))
        }
    }
}
