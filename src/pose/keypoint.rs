//! Keypoint frames, the immutable per-tick input to the analysis core.
//!
//! A [`Frame`] always carries exactly [`KEYPOINT_COUNT`] keypoints laid out in
//! the fixed COCO order of [`BodyPoint`].  Undetected landmarks are still
//! present, just with a score of `0.0`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of keypoints in every frame.
pub const KEYPOINT_COUNT: usize = 17;

// ---------------------------------------------------------------------------
// BodyPoint
// ---------------------------------------------------------------------------

/// Anatomical landmark, discriminant = slot index inside a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl BodyPoint {
    /// All landmarks in slot order.
    pub const ALL: [BodyPoint; KEYPOINT_COUNT] = [
        BodyPoint::Nose,
        BodyPoint::LeftEye,
        BodyPoint::RightEye,
        BodyPoint::LeftEar,
        BodyPoint::RightEar,
        BodyPoint::LeftShoulder,
        BodyPoint::RightShoulder,
        BodyPoint::LeftElbow,
        BodyPoint::RightElbow,
        BodyPoint::LeftWrist,
        BodyPoint::RightWrist,
        BodyPoint::LeftHip,
        BodyPoint::RightHip,
        BodyPoint::LeftKnee,
        BodyPoint::RightKnee,
        BodyPoint::LeftAnkle,
        BodyPoint::RightAnkle,
    ];

    /// Slot index of this landmark inside a [`Frame`].
    ///
    /// ```
    /// use rep_coach::pose::BodyPoint;
    ///
    /// assert_eq!(BodyPoint::Nose.index(), 0);
    /// assert_eq!(BodyPoint::LeftElbow.index(), 7);
    /// assert_eq!(BodyPoint::RightAnkle.index(), 16);
    /// ```
    pub fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Keypoint
// ---------------------------------------------------------------------------

/// A named 2D point in screen coordinates (y grows downward) with the
/// detector's confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: BodyPoint,
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Keypoint {
    pub fn new(name: BodyPoint, x: f32, y: f32, score: f32) -> Self {
        Self { name, x, y, score }
    }

    /// `true` when the detection score is strictly above `min_score`.
    pub fn is_confident(&self, min_score: f32) -> bool {
        self.score > min_score
    }
}

// ---------------------------------------------------------------------------
// FrameError
// ---------------------------------------------------------------------------

/// Reasons a keypoint list cannot form a valid [`Frame`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    /// The list did not have exactly 17 entries.
    #[error("frame must carry exactly {KEYPOINT_COUNT} keypoints, got {0}")]
    WrongKeypointCount(usize),

    /// A slot held a different landmark than the fixed layout requires.
    #[error("keypoint slot {index} must be {expected:?}, found {found:?}")]
    MisplacedKeypoint {
        index: usize,
        expected: BodyPoint,
        found: BodyPoint,
    },

    /// A score was outside `[0, 1]` (or NaN).
    #[error("keypoint slot {index} has score {score} outside [0, 1]")]
    ScoreOutOfRange { index: usize, score: f32 },
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One timestamped, complete set of body keypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame", into = "RawFrame")]
pub struct Frame {
    timestamp_ms: u64,
    keypoints: [Keypoint; KEYPOINT_COUNT],
}

impl Frame {
    /// Build a frame from an arbitrary keypoint list, validating the layout.
    ///
    /// # Errors
    ///
    /// - [`FrameError::WrongKeypointCount`]: the list is not 17 long.
    /// - [`FrameError::MisplacedKeypoint`]: a slot has the wrong landmark.
    /// - [`FrameError::ScoreOutOfRange`]: a score is not in `[0, 1]`.
    pub fn new(timestamp_ms: u64, keypoints: Vec<Keypoint>) -> Result<Self, FrameError> {
        let count = keypoints.len();
        let keypoints: [Keypoint; KEYPOINT_COUNT] = keypoints
            .try_into()
            .map_err(|_| FrameError::WrongKeypointCount(count))?;

        for (index, (kp, expected)) in keypoints.iter().zip(BodyPoint::ALL).enumerate() {
            if kp.name != expected {
                return Err(FrameError::MisplacedKeypoint {
                    index,
                    expected,
                    found: kp.name,
                });
            }
            if !(0.0..=1.0).contains(&kp.score) {
                return Err(FrameError::ScoreOutOfRange {
                    index,
                    score: kp.score,
                });
            }
        }

        Ok(Self {
            timestamp_ms,
            keypoints,
        })
    }

    /// Build a frame by asking `f` for `(x, y, score)` of every landmark.
    ///
    /// The result is valid by construction: scores are clamped to `[0, 1]`
    /// and NaN becomes 0.
    ///
    /// ```
    /// use rep_coach::pose::{BodyPoint, Frame};
    ///
    /// let frame = Frame::from_fn(40, |_| (0.0, 0.0, 0.0));
    /// assert_eq!(frame.keypoints().len(), 17);
    /// assert_eq!(frame.get(BodyPoint::LeftHip).name, BodyPoint::LeftHip);
    /// ```
    pub fn from_fn(timestamp_ms: u64, mut f: impl FnMut(BodyPoint) -> (f32, f32, f32)) -> Self {
        let keypoints = std::array::from_fn(|i| {
            let name = BodyPoint::ALL[i];
            let (x, y, score) = f(name);
            let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
            Keypoint { name, x, y, score }
        });
        Self {
            timestamp_ms,
            keypoints,
        }
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn keypoints(&self) -> &[Keypoint; KEYPOINT_COUNT] {
        &self.keypoints
    }

    /// The keypoint occupying `point`'s slot.
    pub fn get(&self, point: BodyPoint) -> &Keypoint {
        &self.keypoints[point.index()]
    }
}

/// Wire shape of a frame: `{ "timestamp_ms": …, "keypoints": [ … ] }`.
#[derive(Serialize, Deserialize)]
struct RawFrame {
    #[serde(default)]
    timestamp_ms: u64,
    keypoints: Vec<Keypoint>,
}

impl TryFrom<RawFrame> for Frame {
    type Error = FrameError;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        Frame::new(raw.timestamp_ms, raw.keypoints)
    }
}

impl From<Frame> for RawFrame {
    fn from(frame: Frame) -> Self {
        RawFrame {
            timestamp_ms: frame.timestamp_ms,
            keypoints: frame.keypoints.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
