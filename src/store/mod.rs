//! Workout record persistence.
//!
//! A finished session becomes a [`WorkoutRecord`]: the raw frame log plus the
//! feedback messages, in the JSON shape the workout API expects.  Records go
//! through a [`WorkoutStore`]:
//!
//! * [`JsonFileStore`]: one pretty-printed JSON file per workout.
//! * [`ApiWorkoutStore`]: `POST {base_url}/api/workouts`.

pub mod api;
pub mod file;

pub use api::ApiWorkoutStore;
pub use file::JsonFileStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::ExerciseKind;
use crate::config::{StoreBackend, StoreConfig};
use crate::pose::Frame;

// ---------------------------------------------------------------------------
// WorkoutRecord
// ---------------------------------------------------------------------------

/// Everything persisted about one workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub exercise: ExerciseKind,
    pub rep_count: u32,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_at_ms: u64,
    /// Every processed frame, oldest first.
    pub poses: Vec<Frame>,
    /// Feedback messages in emission order.
    pub feedback: Vec<String>,
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors raised while persisting a workout.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot write workout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode workout: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("workout API request failed: {0}")]
    Request(String),

    #[error("workout API request timed out")]
    Timeout,

    #[error("workout API rejected the record ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else {
            StoreError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// WorkoutStore trait
// ---------------------------------------------------------------------------

/// Persists workout records, returning an identifier for the saved record.
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    async fn save(&self, record: &WorkoutRecord) -> Result<String, StoreError>;
}

/// Build the store selected in `config`, or `None` when persistence is off.
pub fn from_config(config: &StoreConfig) -> Option<Box<dyn WorkoutStore>> {
    match config.backend {
        StoreBackend::File => Some(Box::new(JsonFileStore::new(config.resolved_output_dir()))),
        StoreBackend::Api => Some(Box::new(ApiWorkoutStore::from_config(config))),
        StoreBackend::Disabled => None,
    }
}
