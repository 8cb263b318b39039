//! Joint angles derived from a single frame.
//!
//! Only left-side landmarks are used: shoulder/elbow/wrist for the elbow and
//! shoulder/hip/knee for the back.  When any landmark of a joint is below
//! the confidence threshold the previous angle for that joint is kept.

use crate::config::AnalysisConfig;
use crate::pose::{BodyPoint, Frame, Keypoint};

/// Angles for one frame plus whether they were measured on this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleSample {
    /// Signed elbow flexion in degrees, range (−360, 360).
    pub elbow_angle: f32,
    /// Torso-to-thigh angle in degrees, folded into `[0, 180)`.
    pub back_angle: f32,
    pub confident_elbow: bool,
    pub confident_back: bool,
}

impl AngleSample {
    /// Measure `frame`, falling back to `previous` for any joint whose
    /// landmarks are not confident.
    ///
    /// ```
    /// use rep_coach::analysis::AngleSample;
    /// use rep_coach::config::AnalysisConfig;
    /// use rep_coach::pose::Frame;
    ///
    /// let previous = AngleSample { elbow_angle: 90.0, back_angle: 10.0, ..Default::default() };
    /// let blind = Frame::from_fn(0, |_| (0.0, 0.0, 0.0));
    ///
    /// let sample = AngleSample::extract(&blind, &previous, &AnalysisConfig::default());
    /// assert_eq!(sample.elbow_angle, 90.0);
    /// assert_eq!(sample.back_angle, 10.0);
    /// assert!(!sample.confident_elbow && !sample.confident_back);
    /// ```
    pub fn extract(frame: &Frame, previous: &AngleSample, config: &AnalysisConfig) -> Self {
        let min = config.min_confidence;

        let shoulder = frame.get(BodyPoint::LeftShoulder);
        let elbow = frame.get(BodyPoint::LeftElbow);
        let wrist = frame.get(BodyPoint::LeftWrist);
        let hip = frame.get(BodyPoint::LeftHip);
        let knee = frame.get(BodyPoint::LeftKnee);

        let confident_elbow = [wrist, elbow, shoulder].iter().all(|kp| kp.is_confident(min));
        let confident_back = [knee, hip, shoulder].iter().all(|kp| kp.is_confident(min));

        let elbow_angle = if confident_elbow {
            joint_angle(wrist, elbow, shoulder)
        } else {
            previous.elbow_angle
        };

        let back_angle = if confident_back {
            joint_angle(knee, hip, shoulder).rem_euclid(180.0)
        } else {
            previous.back_angle
        };

        Self {
            elbow_angle,
            back_angle,
            confident_elbow,
            confident_back,
        }
    }
}

/// Signed angle at `vertex` from the `to` ray to the `from` ray, in degrees.
///
/// Computed as the difference of the two `atan2` headings with no
/// normalisation, so the result lies in (−360, 360).
pub fn joint_angle(from: &Keypoint, vertex: &Keypoint, to: &Keypoint) -> f32 {
    let heading_from = (from.y - vertex.y).atan2(from.x - vertex.x);
    let heading_to = (to.y - vertex.y).atan2(to.x - vertex.x);
    (heading_from - heading_to).to_degrees()
}

/// `true` when the nose sits lower on screen than the left elbow
/// (`nose.y > elbow.y`, screen y grows downward).
pub fn elbow_above_nose(frame: &Frame) -> bool {
    frame.get(BodyPoint::Nose).y > frame.get(BodyPoint::LeftElbow).y
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
