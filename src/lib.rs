//! Camera-driven exercise coaching.
//!
//! Turns a stream of 2D body keypoint frames into repetition counts and form
//! feedback:
//!
//! ```text
//! PoseEstimator ─▶ Frame ─▶ analysis (angles → posture → reps) ─▶ FeedbackEmitter
//!                                  │                                  ├─▶ text display
//!                                  ▼                                  └─▶ speech
//!                           WorkoutSession ─▶ WorkoutRecord ─▶ WorkoutStore
//! ```
//!
//! * [`pose`]: keypoint frames and the estimator seam.
//! * [`analysis`]: pure angle/posture/rep transitions.
//! * [`feedback`]: feedback events and their sinks.
//! * [`session`]: per-user session state and the async tick loop.
//! * [`store`]: workout record persistence.
//! * [`config`]: TOML settings.

pub mod analysis;
pub mod config;
pub mod feedback;
pub mod pose;
pub mod session;
pub mod store;
