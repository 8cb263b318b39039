//! Body keypoint frames and the pose-estimation collaborator seam.
//!
//! ```text
//! camera ──▶ PoseEstimator::estimate() ──▶ Vec<Frame> ──▶ session (first pose only)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use rep_coach::pose::{PoseEstimator, ReplayEstimator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut source = ReplayEstimator::open("pushups.jsonl").await.unwrap();
//!     while let Ok(poses) = source.estimate().await {
//!         println!("{} pose(s) this tick", poses.len());
//!     }
//! }
//! ```

pub mod estimator;
pub mod keypoint;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use estimator::{EstimatorError, PoseEstimator, ReplayEstimator};
pub use keypoint::{BodyPoint, Frame, FrameError, Keypoint, KEYPOINT_COUNT};

#[cfg(test)]
pub use estimator::MockEstimator;
