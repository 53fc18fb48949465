//! The frame loop: one task per session, pulling a frame per tick and
//! awaiting the estimator inline so at most one estimate is ever in flight.

use crate::{
    config::{Sensitivity, Settings},
    counter::{FrameOutcome, FrameReport, SessionState},
    error::Error,
    estimator::{FrameSource, PoseEstimator},
    exercise::{ExerciseKind, Measurement, Status},
    gate::GatedKeypoints,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, instrument, warn};

/// Shortest frame interval the loop will run at.
pub const MIN_CADENCE: Duration = Duration::from_millis(1);

/// Keypoints and derived values for one frame, published only in debug mode.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DebugFrame {
    pub keypoints: GatedKeypoints,
    pub measurements: Vec<Measurement>,
}

/// The latest state of a session, as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Snapshot {
    pub kind: ExerciseKind,
    pub sensitivity: Sensitivity,
    pub status: Status,
    pub rep_count: u32,
    /// Frames processed so far, including those without a pose.
    pub frames: u64,
    /// `None` until the first frame is processed.
    pub outcome: Option<FrameOutcome>,
    pub debug: Option<DebugFrame>,
}

impl Snapshot {
    fn idle(state: &SessionState) -> Self {
        Self {
            kind: state.kind(),
            sensitivity: state.sensitivity(),
            status: state.status(),
            rep_count: state.rep_count(),
            frames: 0,
            outcome: None,
            debug: None,
        }
    }

    fn after_frame(state: &SessionState, frames: u64, report: FrameReport, debug: bool) -> Self {
        let FrameReport {
            outcome,
            keypoints,
            measurements,
        } = report;
        Self {
            frames,
            outcome: Some(outcome),
            debug: keypoints
                .filter(|_| debug)
                .map(|keypoints| DebugFrame {
                    keypoints,
                    measurements,
                }),
            ..Self::idle(state)
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Control {
    settings: Settings,
    /// Bumped on every explicit reset request.
    reset_epoch: u64,
}

/// Clears the run flag when dropped, so a dropped handle stops its loop.
struct StopOnDrop(Arc<AtomicBool>);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a running session. Dropping it stops the loop before its next
/// frame.
pub struct Session {
    control: watch::Sender<Control>,
    snapshots: watch::Receiver<Snapshot>,
    running: StopOnDrop,
    task: JoinHandle<SessionState>,
}

impl Session {
    /// Load the estimator and start the loop. Fails without starting if the
    /// estimator cannot be loaded.
    pub fn start<S, E, L, LE>(
        source: S,
        load: L,
        settings: Settings,
        cadence: Duration,
    ) -> Result<Self, Error>
    where
        S: FrameSource + 'static,
        E: PoseEstimator<Frame = S::Frame> + 'static,
        L: FnOnce() -> Result<E, LE>,
        LE: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let estimator = load().map_err(|e| Error::LoadEstimator(e.into()))?;
        Ok(Self::spawn(source, estimator, settings, cadence))
    }

    /// Start the loop with an already-loaded estimator. A cadence shorter
    /// than [`MIN_CADENCE`] is raised to it.
    pub fn spawn<S, E>(source: S, estimator: E, settings: Settings, cadence: Duration) -> Self
    where
        S: FrameSource + 'static,
        E: PoseEstimator<Frame = S::Frame> + 'static,
    {
        let cadence = if cadence < MIN_CADENCE {
            warn!(message = "cadence too short, clamping", ?cadence, min = ?MIN_CADENCE);
            MIN_CADENCE
        } else {
            cadence
        };
        let initial = SessionState::new(settings.kind, settings.sensitivity);
        let (control, control_rx) = watch::channel(Control {
            settings,
            reset_epoch: 0,
        });
        let (snapshots_tx, snapshots) = watch::channel(Snapshot::idle(&initial));
        let running = Arc::new(AtomicBool::new(true));

        info!(
            message = "starting session",
            kind = %settings.kind,
            sensitivity = %settings.sensitivity,
            debug = settings.debug
        );
        let task = tokio::spawn(run(
            source,
            estimator,
            initial,
            control_rx,
            snapshots_tx,
            running.clone(),
            cadence,
        ));

        Self {
            control,
            snapshots,
            running: StopOnDrop(running),
            task,
        }
    }

    /// Takes effect at the start of the next frame and resets the session if
    /// the exercise differs.
    pub fn select_exercise(&self, kind: ExerciseKind) {
        self.control.send_modify(|control| control.settings.kind = kind);
    }

    pub fn set_sensitivity(&self, value: u8) -> Result<(), Error> {
        let sensitivity = Sensitivity::new(value)?;
        self.control
            .send_modify(|control| control.settings.sensitivity = sensitivity);
        Ok(())
    }

    pub fn set_debug(&self, debug: bool) {
        self.control.send_modify(|control| control.settings.debug = debug);
    }

    pub fn reset(&self) {
        self.control
            .send_modify(|control| control.reset_epoch = control.reset_epoch.wrapping_add(1));
    }

    pub fn settings(&self) -> Settings {
        self.control.borrow().settings
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified after every processed frame.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// The cooperative run flag. Storing `false` stops the loop before its
    /// next frame.
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.0.clone()
    }

    /// Signal the loop to stop and wait for it. An estimate still in flight
    /// is allowed to finish and then discarded.
    pub async fn stop(self) -> Result<SessionState, Error> {
        self.running.0.store(false, Ordering::SeqCst);
        self.join().await
    }

    /// Wait for the loop to end on its own (source exhausted or stopped).
    pub async fn join(self) -> Result<SessionState, Error> {
        // the guard must outlive the await, or the loop would stop itself
        let Self { running, task, .. } = self;
        let state = task.await.map_err(Error::SessionTask);
        drop(running);
        state
    }
}

#[instrument(name = "session::run", skip_all, level = "debug")]
async fn run<S, E>(
    mut source: S,
    mut estimator: E,
    mut state: SessionState,
    control: watch::Receiver<Control>,
    snapshots: watch::Sender<Snapshot>,
    running: Arc<AtomicBool>,
    cadence: Duration,
) -> SessionState
where
    S: FrameSource,
    E: PoseEstimator<Frame = S::Frame>,
{
    let mut ticks = interval(cadence);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut reset_epoch = control.borrow().reset_epoch;
    let mut frames = 0_u64;

    loop {
        ticks.tick().await;
        if !running.load(Ordering::SeqCst) {
            debug!(message = "stop requested");
            break;
        }

        // read once so a frame never mixes old and new settings
        let Control {
            settings,
            reset_epoch: requested_epoch,
        } = *control.borrow();
        state = state
            .with_kind(settings.kind)
            .with_sensitivity(settings.sensitivity);
        if requested_epoch != reset_epoch {
            reset_epoch = requested_epoch;
            state = state.reset();
        }

        let frame = match source.current_frame() {
            Some(frame) => frame,
            None => {
                debug!(message = "frame source exhausted", frames);
                break;
            }
        };
        let pose = estimator.estimate(frame).await;
        if !running.load(Ordering::SeqCst) {
            debug!(message = "discarding estimate resolved after stop");
            break;
        }

        let (next, report) = state.step(pose.as_ref());
        state = next;
        frames += 1;
        snapshots.send_replace(Snapshot::after_frame(&state, frames, report, settings.debug));
    }

    info!(
        message = "session finished",
        kind = %state.kind(),
        reps = state.rep_count(),
        frames
    );
    state
}
