//! Workout sessions and the tick loop that feeds them.
//!
//! # Architecture
//!
//! ```text
//! SessionCommand (mpsc) ─┐
//!                        ▼
//! SessionRunner::run()  ← async task, one tick at a time
//!        │
//!        ├─ PoseEstimator::estimate().await
//!        ├─ WorkoutSession::process_poses  (analysis::transition)
//!        ├─ FeedbackEmitter::emit
//!        └─ SharedState (Arc<Mutex<CoachState>>) ←── read by the UI
//! ```
//!
//! [`WorkoutSession`] can also be driven directly (no runtime needed) by
//! calling [`WorkoutSession::process_frame`] for each frame.

pub mod runner;
pub mod state;
pub mod workout;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{SessionCommand, SessionRunner, StopFlag};
pub use state::{new_shared_state, CoachState, SessionStatus, SharedState};
pub use workout::{FrameOutcome, WorkoutSession};
