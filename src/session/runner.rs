//! Session runner: the cooperative, self-paced tick loop.
//!
//! # Tick
//!
//! ```text
//! stop? ──yes──▶ end
//!   │no
//!   ▼
//! drain SessionCommands (select exercise / reset / voice toggle)
//!   ▼
//! estimator.estimate().await            ← the only suspension point
//!   ▼
//! stop? ──yes──▶ discard result, end
//!   │no
//!   ├─ Ok([])            → nothing detected, skip
//!   ├─ Ok([first, ..])   → WorkoutSession::process_frame → emitter → SharedState
//!   ├─ Err(Inference)    → warn, skip
//!   ├─ Err(StreamEnded)  → end
//!   └─ Err(Unavailable)  → status Unavailable, end
//!   ▼
//! pace (sleep or yield) → next tick
//! ```
//!
//! The next estimate is only requested after the previous frame has been
//! fully processed, so a slow estimator throttles the loop by itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::analysis::ExerciseKind;
use crate::feedback::FeedbackEmitter;
use crate::pose::{EstimatorError, PoseEstimator};

use super::state::{SessionStatus, SharedState};
use super::workout::{FrameOutcome, WorkoutSession};

// ---------------------------------------------------------------------------
// SessionCommand
// ---------------------------------------------------------------------------

/// Requests from the UI, applied at the start of the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SelectExercise(ExerciseKind),
    Reset,
    SetVoiceFeedback(bool),
}

// ---------------------------------------------------------------------------
// StopFlag
// ---------------------------------------------------------------------------

/// Cloneable stop switch checked before and after every estimate.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// SessionRunner
// ---------------------------------------------------------------------------

/// Drives one [`WorkoutSession`] from a [`PoseEstimator`].
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rep_coach::analysis::ExerciseKind;
/// use rep_coach::config::AnalysisConfig;
/// use rep_coach::feedback::{FeedbackEmitter, LogTextSink, SilentSpeaker};
/// use rep_coach::pose::ReplayEstimator;
/// use rep_coach::session::{new_shared_state, SessionRunner, StopFlag, WorkoutSession};
///
/// # async fn example() {
/// let state = new_shared_state(ExerciseKind::Pushups);
/// let session = WorkoutSession::new(ExerciseKind::Pushups, AnalysisConfig::default());
/// let estimator = ReplayEstimator::open("pushups.jsonl").await.unwrap();
/// let emitter = FeedbackEmitter::new(Arc::new(LogTextSink), Arc::new(SilentSpeaker), false);
///
/// let (_commands_tx, commands_rx) = tokio::sync::mpsc::channel(8);
/// let runner = SessionRunner::new(state, session, Box::new(estimator), emitter);
/// let finished = runner.run(commands_rx, StopFlag::new()).await;
/// println!("{} reps", finished.rep_state().rep_count);
/// # }
/// ```
pub struct SessionRunner {
    state: SharedState,
    session: WorkoutSession,
    estimator: Box<dyn PoseEstimator>,
    emitter: FeedbackEmitter,
    tick_interval: Duration,
}

impl SessionRunner {
    pub fn new(
        state: SharedState,
        session: WorkoutSession,
        estimator: Box<dyn PoseEstimator>,
        emitter: FeedbackEmitter,
    ) -> Self {
        Self {
            state,
            session,
            estimator,
            emitter,
            tick_interval: Duration::ZERO,
        }
    }

    /// Minimum time between ticks.  Zero (the default) only yields.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Tick until stopped, the stream ends, or the estimator becomes
    /// unavailable.  Returns the session so the caller can persist it.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        stop: StopFlag,
    ) -> WorkoutSession {
        self.set_status(SessionStatus::Running);
        log::info!("session: started ({})", self.session.exercise());

        let final_status = loop {
            if stop.is_stopped() {
                log::info!("session: stop requested");
                break SessionStatus::Stopped;
            }

            self.drain_commands(&mut commands);

            let estimate = self.estimator.estimate().await;

            if stop.is_stopped() {
                log::debug!("session: stopped during estimate, result discarded");
                break SessionStatus::Stopped;
            }

            match estimate {
                Ok(poses) => match self.session.process_poses(poses) {
                    Some(outcome) => self.handle_outcome(&outcome),
                    None => log::trace!("session: no pose this tick"),
                },
                Err(EstimatorError::Inference(msg)) => {
                    log::warn!("session: estimate failed, skipping tick: {msg}");
                }
                Err(EstimatorError::StreamEnded) => {
                    log::info!("session: pose stream ended");
                    break SessionStatus::Stopped;
                }
                Err(e @ EstimatorError::Unavailable(_)) => {
                    self.set_unavailable(e.to_string());
                    break SessionStatus::Unavailable;
                }
            }

            if self.tick_interval.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.tick_interval).await;
            }
        };

        if final_status == SessionStatus::Stopped {
            self.set_status(SessionStatus::Stopped);
        }

        let reps = self.session.rep_state().rep_count;
        log::info!(
            "session: finished with {reps} reps over {} frames",
            self.session.frame_log().len()
        );
        self.session
    }

    // -----------------------------------------------------------------------
    // Tick helpers
    // -----------------------------------------------------------------------

    fn drain_commands(&mut self, commands: &mut mpsc::Receiver<SessionCommand>) {
        while let Ok(command) = commands.try_recv() {
            log::debug!("session: command {command:?}");
            match command {
                SessionCommand::SelectExercise(kind) => self.session.select_exercise(kind),
                SessionCommand::Reset => self.session.reset_session(),
                SessionCommand::SetVoiceFeedback(enabled) => {
                    self.emitter.set_voice_enabled(enabled);
                    continue;
                }
            }
            self.publish_session();
        }
    }

    fn handle_outcome(&self, outcome: &FrameOutcome) {
        self.emitter.emit(&outcome.events);

        let mut st = self.state.lock().unwrap();
        st.rep_state = outcome.rep_state;
        st.posture = outcome.posture_state;
        st.frames_processed += 1;
        if let Some(last) = outcome.events.last() {
            st.last_feedback = Some(last.clone());
        }
    }

    fn publish_session(&self) {
        let mut st = self.state.lock().unwrap();
        st.exercise = self.session.exercise();
        st.rep_state = self.session.rep_state();
        st.posture = self.session.posture_state();
        st.last_feedback = None;
    }

    fn set_status(&self, status: SessionStatus) {
        let mut st = self.state.lock().unwrap();
        st.status = status;
    }

    fn set_unavailable(&self, message: String) {
        let mut st = self.state.lock().unwrap();
        st.status = SessionStatus::Unavailable;
        st.error_message = Some(message.clone());
        log::error!("session: {message}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
