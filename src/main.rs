//! Application entry point: `rep-coach [replay.jsonl]`.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create a current-thread [`tokio`] runtime.
//! 4. Open the pose source (CLI argument, else `session.replay_file`).
//! 5. Build the feedback emitter (log display + optional speech command).
//! 6. Run the [`SessionRunner`] until the stream ends or Ctrl-C.
//! 7. Persist the finished workout through the configured store.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rep_coach::{
    config::AppConfig,
    feedback::{CommandSpeaker, FeedbackEmitter, LogTextSink, SilentSpeaker, SpeechSink},
    pose::ReplayEstimator,
    session::{new_shared_state, SessionCommand, SessionRunner, StopFlag, WorkoutSession},
    store,
};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting rep-coach v{}", env!("CARGO_PKG_VERSION"));

    // 2. Config
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Could not load config ({e}), using defaults");
        AppConfig::default()
    });

    // 3. Runtime.  Speech runs on detached blocking tasks, so shutdown must
    //    not wait for them.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = rt.block_on(run(config));
    rt.shutdown_timeout(Duration::from_millis(500));
    result
}

async fn run(config: AppConfig) -> Result<()> {
    // 4. Pose source
    let replay_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.session.replay_file.clone());

    let Some(replay_path) = replay_path else {
        log::error!("No pose source: pass a replay file or set session.replay_file");
        eprintln!("usage: rep-coach <replay.jsonl>");
        return Ok(());
    };

    let state = new_shared_state(config.session.exercise);

    let estimator = match ReplayEstimator::open(&replay_path).await {
        Ok(estimator) => estimator,
        Err(e) => {
            log::error!("Pose estimator unavailable: {e}");
            eprintln!("Exercise tracking unavailable: {e}");
            return Ok(());
        }
    };

    // 5. Feedback
    let speech: Arc<dyn SpeechSink> = if config.feedback.speech_command.is_empty() {
        Arc::new(SilentSpeaker)
    } else {
        Arc::new(CommandSpeaker::from_config(&config.feedback))
    };
    let emitter = FeedbackEmitter::new(
        Arc::new(LogTextSink),
        speech,
        config.feedback.voice_enabled,
    );

    // 6. Session
    let stop = StopFlag::new();
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Ctrl-C received, stopping");
                stop.stop();
            }
        });
    }

    let (_commands_tx, commands_rx) = mpsc::channel::<SessionCommand>(8);
    let session = WorkoutSession::new(config.session.exercise, config.analysis.clone());
    let runner = SessionRunner::new(Arc::clone(&state), session, Box::new(estimator), emitter)
        .with_tick_interval(Duration::from_millis(config.session.tick_interval_ms));

    let finished = runner.run(commands_rx, stop).await;

    let status = state.lock().unwrap().status;
    println!(
        "{}: {} reps of {} ({} frames)",
        status.label(),
        finished.rep_state().rep_count,
        finished.exercise(),
        finished.frame_log().len()
    );

    // 7. Persist
    let Some(workout_store) = store::from_config(&config.store) else {
        log::info!("Workout storage disabled");
        return Ok(());
    };
    match workout_store.save(&finished.into_record()).await {
        Ok(id) => log::info!("Workout saved: {id}"),
        Err(e) => log::error!("Could not save workout: {e}"),
    }

    Ok(())
}
