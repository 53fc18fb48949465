use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use repcount::{
    config::{Sensitivity, Settings},
    exercise::ExerciseKind,
    replay::{Recording, ReplayEstimator},
    session::Session,
};
use std::{path::PathBuf, sync::atomic::Ordering, time::Duration};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;

#[derive(structopt::StructOpt)]
struct Opt {
    /// JSON-lines keypoint recording, one frame per line.
    recording: PathBuf,

    /// squat, push-up, bicep-curl, lateral-raise, shoulder-press, jumping-jack or lunge.
    #[structopt(short, long, default_value = "squat")]
    exercise: ExerciseKind,

    /// Threshold offset in degrees, 5 through 25.
    #[structopt(short, long, default_value = "15")]
    sensitivity: Sensitivity,

    /// Frames per second to pull from the recording.
    #[structopt(short, long, default_value = "30")]
    fps: u32,

    /// Simulated estimator latency per frame.
    #[structopt(long, default_value = "0")]
    latency_ms: u64,

    /// Print every snapshot as JSON, including gated keypoints.
    #[structopt(short, long)]
    debug: bool,

    #[structopt(short, long, default_value = "info", env = "RUST_LOG")]
    log_level: tracing_subscriber::filter::EnvFilter,

    #[structopt(long)]
    show_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::from_args();

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(opt.log_level),
    )?;

    let recording = Recording::open(&opt.recording).context("failed loading recording")?;
    let latency = Duration::from_millis(opt.latency_ms);
    let cadence = Duration::from_secs(1) / opt.fps.max(1);
    let settings = Settings::new(opt.exercise, opt.sensitivity).with_debug(opt.debug);

    info!(
        message = "starting replay",
        exercise = %opt.exercise,
        sensitivity = %opt.sensitivity,
        frames = recording.len()
    );

    let source = recording.frames();
    let session = Session::start(
        source,
        move || ReplayEstimator::new(recording, latency),
        settings,
        cadence,
    )
    .context("failed starting session")?;

    let running = session.running();
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .context("failed setting Ctrl-C handler")?;

    let progress = if opt.show_progress {
        Some(
            ProgressBar::new_spinner().with_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                    .template("{prefix:.bold.dim} {spinner} {wide_msg}"),
            ),
        )
    } else {
        None
    };

    let mut updates = session.subscribe();
    let debug = opt.debug;
    let reporter = {
        let progress = progress.clone();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow().clone();
                if let Some(progress) = progress.as_ref() {
                    progress.set_message(format!(
                        "{}: {} reps ({:?}), frame {}",
                        snapshot.kind, snapshot.rep_count, snapshot.status, snapshot.frames
                    ));
                    progress.inc(1);
                }
                if debug {
                    println!("{}", serde_json::to_string(&snapshot)?);
                }
            }
            Ok::<_, serde_json::Error>(())
        })
    };

    let state = session.join().await.context("session failed")?;
    reporter
        .await
        .context("snapshot reporter panicked")?
        .context("failed serializing snapshot")?;

    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    println!(
        "{}: {} reps, final status {:?}",
        state.kind(),
        state.rep_count(),
        state.status()
    );
    Ok(())
}
