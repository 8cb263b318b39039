//! Pose-estimation collaborator seam.
//!
//! [`PoseEstimator`] is what the session runner awaits once per tick.  The
//! model that actually produces keypoints lives outside this crate; here we
//! only ship [`ReplayEstimator`], which plays back recorded frames from a
//! JSON-lines file, and [`MockEstimator`] for tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

use super::keypoint::Frame;

// ---------------------------------------------------------------------------
// EstimatorError
// ---------------------------------------------------------------------------

/// Errors surfaced by a pose estimator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    /// The model (or its input source) could not be loaded.  Fatal for the
    /// session.
    #[error("pose estimator unavailable: {0}")]
    Unavailable(String),

    /// A single estimation pass failed; the next tick may succeed.
    #[error("pose inference failed: {0}")]
    Inference(String),

    /// A finite source has no more frames.
    #[error("pose stream ended")]
    StreamEnded,
}

// ---------------------------------------------------------------------------
// PoseEstimator trait
// ---------------------------------------------------------------------------

/// Produces zero or more poses for the current camera frame.
///
/// Callers use only the first pose.  An empty vector means nobody was
/// detected this tick.
#[async_trait]
pub trait PoseEstimator: Send {
    async fn estimate(&mut self) -> Result<Vec<Frame>, EstimatorError>;
}

// Compile-time assertion: Box<dyn PoseEstimator> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn PoseEstimator>) {}
};

// ---------------------------------------------------------------------------
// ReplayEstimator
// ---------------------------------------------------------------------------

/// One line of a replay file: a single pose or a list of poses.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Many(Vec<Frame>),
    One(Frame),
}

/// Plays back poses recorded as JSON lines.
///
/// Each non-blank line is either a frame object or an array of frames (`[]`
/// for a tick where nobody was detected).
pub struct ReplayEstimator {
    path: PathBuf,
    lines: Lines<BufReader<tokio::fs::File>>,
    line_no: usize,
}

impl ReplayEstimator {
    /// Open `path` for replay.
    ///
    /// # Errors
    ///
    /// [`EstimatorError::Unavailable`] when the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, EstimatorError> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| EstimatorError::Unavailable(format!("{}: {e}", path.display())))?;

        log::info!("pose: replaying frames from {}", path.display());

        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PoseEstimator for ReplayEstimator {
    async fn estimate(&mut self) -> Result<Vec<Frame>, EstimatorError> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Err(EstimatorError::StreamEnded),
                // Undecodable bytes only spoil the current line.
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    self.line_no += 1;
                    return Err(EstimatorError::Inference(format!(
                        "{} line {}: {e}",
                        self.path.display(),
                        self.line_no
                    )));
                }
                Err(e) => {
                    return Err(EstimatorError::Unavailable(format!(
                        "{}: {e}",
                        self.path.display()
                    )))
                }
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            return match serde_json::from_str::<ReplayLine>(&line) {
                Ok(ReplayLine::Many(frames)) => Ok(frames),
                Ok(ReplayLine::One(frame)) => Ok(vec![frame]),
                Err(e) => Err(EstimatorError::Inference(format!(
                    "{} line {}: {e}",
                    self.path.display(),
                    self.line_no
                ))),
            };
        }
    }
}

// ---------------------------------------------------------------------------
// MockEstimator
// ---------------------------------------------------------------------------

/// Scripted estimator for tests: yields the queued results in order, then
/// [`EstimatorError::StreamEnded`].
#[cfg(test)]
pub struct MockEstimator {
    script: std::collections::VecDeque<Result<Vec<Frame>, EstimatorError>>,
}

#[cfg(test)]
impl MockEstimator {
    pub fn new(script: Vec<Result<Vec<Frame>, EstimatorError>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// One single-pose tick per frame.
    pub fn frames(frames: Vec<Frame>) -> Self {
        Self::new(frames.into_iter().map(|f| Ok(vec![f])).collect())
    }
}

#[cfg(test)]
#[async_trait]
impl PoseEstimator for MockEstimator {
    async fn estimate(&mut self) -> Result<Vec<Frame>, EstimatorError> {
        self.script
            .pop_front()
            .unwrap_or(Err(EstimatorError::StreamEnded))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn frame_json(ts: u64) -> String {
        serde_json::to_string(&Frame::from_fn(ts, |_| (1.0, 2.0, 0.9))).unwrap()
    }

    #[tokio::test]
    async fn open_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ReplayEstimator::open(dir.path().join("nope.jsonl"))
            .await
            .err()
            .expect("should fail");
        assert!(matches!(err, EstimatorError::Unavailable(_)));
    }

    #[tokio::test]
    async fn replays_single_frames_lists_and_empty_ticks() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "{}", frame_json(1)).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "[]").unwrap();
        writeln!(file, "[{},{}]", frame_json(3), frame_json(4)).unwrap();

        let mut replay = ReplayEstimator::open(file.path()).await.expect("open");

        let first = replay.estimate().await.expect("line 1");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].timestamp_ms(), 1);

        // blank line skipped, then an empty tick
        assert!(replay.estimate().await.expect("line 3").is_empty());

        let many = replay.estimate().await.expect("line 4");
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].timestamp_ms(), 4);

        assert_eq!(replay.estimate().await, Err(EstimatorError::StreamEnded));
    }

    #[tokio::test]
    async fn malformed_line_is_transient() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "{{\"keypoints\": []}}").unwrap();
        writeln!(file, "{}", frame_json(9)).unwrap();

        let mut replay = ReplayEstimator::open(file.path()).await.expect("open");
        assert!(matches!(
            replay.estimate().await,
            Err(EstimatorError::Inference(_))
        ));
        assert_eq!(replay.estimate().await.expect("line 2")[0].timestamp_ms(), 9);
    }

    #[tokio::test]
    async fn non_utf8_line_is_transient() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"\xff\xfe garbage\n").unwrap();
        writeln!(file, "{}", frame_json(5)).unwrap();

        let mut replay = ReplayEstimator::open(file.path()).await.expect("open");
        match replay.estimate().await {
            Err(EstimatorError::Inference(msg)) => assert!(msg.contains("line 1"), "got {msg}"),
            other => panic!("expected inference error, got {other:?}"),
        }
        assert_eq!(replay.estimate().await.expect("line 2")[0].timestamp_ms(), 5);
    }

    #[tokio::test]
    async fn mock_runs_out_with_stream_ended() {
        let mut mock = MockEstimator::frames(vec![Frame::from_fn(0, |_| (0.0, 0.0, 0.0))]);
        assert_eq!(mock.estimate().await.unwrap().len(), 1);
        assert_eq!(mock.estimate().await, Err(EstimatorError::StreamEnded));
    }
}
