//! Session status and the state shared with the UI layer.
//!
//! [`CoachState`] is the single source of truth for anything a display needs:
//! status, current exercise, rep/posture state and the latest feedback.
//! The runner writes it after every processed frame; readers take short
//! locks.

use std::sync::{Arc, Mutex};

use crate::analysis::{ExerciseKind, PostureState, RepState};
use crate::feedback::FeedbackEvent;

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Lifecycle of the tick loop.
///
/// ```text
/// Idle ──run()──▶ Running ──stop flag / stream end──▶ Stopped
///                    └──estimator unavailable──▶ Unavailable
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Not started yet.
    #[default]
    Idle,
    /// Ticking.
    Running,
    /// Ended normally.
    Stopped,
    /// The pose estimator could not be used; the feature is off.
    Unavailable,
}

impl SessionStatus {
    /// Returns `true` while frames are being processed.
    ///
    /// ```
    /// use rep_coach::session::SessionStatus;
    ///
    /// assert!(SessionStatus::Running.is_active());
    /// assert!(!SessionStatus::Idle.is_active());
    /// assert!(!SessionStatus::Unavailable.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Running)
    }

    /// A short label for a status bar.
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Running => "Running",
            SessionStatus::Stopped => "Stopped",
            SessionStatus::Unavailable => "Unavailable",
        }
    }
}

// ---------------------------------------------------------------------------
// CoachState
// ---------------------------------------------------------------------------

/// What the UI reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CoachState {
    pub status: SessionStatus,
    pub exercise: ExerciseKind,
    pub rep_state: RepState,
    pub posture: PostureState,
    /// Most recent feedback event since the last reset or exercise change.
    pub last_feedback: Option<FeedbackEvent>,
    /// Set when `status == SessionStatus::Unavailable`.
    pub error_message: Option<String>,
    /// Frames that reached the analysis core.
    pub frames_processed: u64,
}

impl CoachState {
    pub fn new(exercise: ExerciseKind) -> Self {
        Self {
            status: SessionStatus::Idle,
            exercise,
            rep_state: RepState::default(),
            posture: PostureState::default(),
            last_feedback: None,
            error_message: None,
            frames_processed: 0,
        }
    }
}

impl Default for CoachState {
    fn default() -> Self {
        Self::new(ExerciseKind::default())
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`CoachState`].
///
/// Cheap to clone (`Arc` clone).  Lock for a short critical section; do
/// **not** hold the lock across `.await` points.
pub type SharedState = Arc<Mutex<CoachState>>;

/// Construct a new [`SharedState`] for `exercise`.
pub fn new_shared_state(exercise: ExerciseKind) -> SharedState {
    Arc::new(Mutex::new(CoachState::new(exercise)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
