//! One workout session: owns the analysis state and the frame/feedback logs.
//!
//! [`WorkoutSession`] is the only place where the pure
//! [`analysis::transition`](crate::analysis::transition) result is stored.
//! Nothing else mutates rep or posture state.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::analysis::{self, ExerciseKind, PostureState, RepState, Snapshot};
use crate::config::AnalysisConfig;
use crate::feedback::FeedbackEvent;
use crate::pose::Frame;
use crate::store::WorkoutRecord;

/// Result of processing one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub rep_state: RepState,
    pub posture_state: PostureState,
    pub events: Vec<FeedbackEvent>,
}

/// A single user's workout.
///
/// ```
/// use rep_coach::analysis::ExerciseKind;
/// use rep_coach::config::AnalysisConfig;
/// use rep_coach::pose::Frame;
/// use rep_coach::session::WorkoutSession;
///
/// let mut session = WorkoutSession::new(ExerciseKind::Pushups, AnalysisConfig::default());
/// let outcome = session.process_frame(Frame::from_fn(0, |_| (0.0, 0.0, 0.0)));
/// assert_eq!(outcome.rep_state.rep_count, 0);
/// assert_eq!(session.frame_log().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    config: AnalysisConfig,
    exercise: ExerciseKind,
    snapshot: Snapshot,
    started_at_ms: u64,
    frames: Vec<Frame>,
    feedback: Vec<String>,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl WorkoutSession {
    pub fn new(exercise: ExerciseKind, config: AnalysisConfig) -> Self {
        Self {
            config,
            exercise,
            snapshot: Snapshot::default(),
            started_at_ms: now_ms(),
            frames: Vec::new(),
            feedback: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Frame processing
    // -----------------------------------------------------------------------

    /// Run one frame through the analysis core and log it.
    pub fn process_frame(&mut self, frame: Frame) -> FrameOutcome {
        let (snapshot, events) =
            analysis::transition(&self.snapshot, &frame, self.exercise, &self.config);
        self.snapshot = snapshot;

        self.frames.push(frame);
        self.feedback.extend(events.iter().map(|event| event.message.clone()));

        FrameOutcome {
            rep_state: snapshot.reps,
            posture_state: snapshot.posture,
            events,
        }
    }

    /// Process the first of `poses`.  Returns `None` (and changes nothing)
    /// when no pose was detected.
    pub fn process_poses(&mut self, poses: Vec<Frame>) -> Option<FrameOutcome> {
        let frame = poses.into_iter().next()?;
        Some(self.process_frame(frame))
    }

    // -----------------------------------------------------------------------
    // Session control
    // -----------------------------------------------------------------------

    /// Return rep, posture and remembered angles to their initial values.
    ///
    /// The frame and feedback logs are append-only and survive a reset.
    pub fn reset_session(&mut self) {
        log::info!(
            "session: reset ({} reps of {} discarded)",
            self.snapshot.reps.rep_count,
            self.exercise
        );
        self.snapshot = Snapshot::default();
    }

    /// Switch exercise.  Always resets the session, even for the current kind.
    pub fn select_exercise(&mut self, exercise: ExerciseKind) {
        log::info!("session: exercise {} → {}", self.exercise, exercise);
        self.exercise = exercise;
        self.reset_session();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    pub fn rep_state(&self) -> RepState {
        self.snapshot.reps
    }

    pub fn posture_state(&self) -> PostureState {
        self.snapshot.posture
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn frame_log(&self) -> &[Frame] {
        &self.frames
    }

    pub fn feedback_log(&self) -> &[String] {
        &self.feedback
    }

    /// Consume the session into a persistable record.
    pub fn into_record(self) -> WorkoutRecord {
        WorkoutRecord {
            exercise: self.exercise,
            rep_count: self.snapshot.reps.rep_count,
            started_at_ms: self.started_at_ms,
            poses: self.frames,
            feedback: self.feedback,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
