//! Pose-stream analysis: angles → posture → repetitions.
//!
//! Everything here is pure.  [`transition`] takes the previous [`Snapshot`]
//! and a frame and returns the next snapshot plus the feedback to emit; the
//! caller (usually [`crate::session::WorkoutSession`]) owns the snapshot.
//!
//! ```text
//! Frame ──▶ AngleSample::extract(frame, previous) ──┬─▶ posture::evaluate ─┐
//!                                                   │                      ▼ is_back_straight
//!                       elbow_above_nose(frame) ────┴──────────────▶ reps::advance
//! ```

pub mod angles;
pub mod exercise;
pub mod posture;
pub mod reps;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use angles::{elbow_above_nose, joint_angle, AngleSample};
pub use exercise::{ExerciseKind, UnknownExercise};
pub use posture::{PostureState, BACK_WARNING};
pub use reps::{advance, Phase, RepInput, RepState, LEAVING_UP_CUE};

use crate::config::AnalysisConfig;
use crate::feedback::FeedbackEvent;
use crate::pose::Frame;

/// Per-session analysis state threaded from frame to frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot {
    /// Last angles, reused when a joint is not confidently detected.
    pub angles: AngleSample,
    pub posture: PostureState,
    pub reps: RepState,
}

/// Advance `snapshot` by one frame.
///
/// Posture feedback (if any) comes first in the returned events, followed by
/// rep-machine cues.
pub fn transition(
    snapshot: &Snapshot,
    frame: &Frame,
    exercise: ExerciseKind,
    config: &AnalysisConfig,
) -> (Snapshot, Vec<FeedbackEvent>) {
    let angles = AngleSample::extract(frame, &snapshot.angles, config);
    let (posture, posture_event) = posture::evaluate(&angles, snapshot.posture, exercise, config);

    let input = RepInput {
        elbow_angle: angles.elbow_angle,
        is_back_straight: posture.is_back_straight,
        elbow_above_nose: elbow_above_nose(frame),
    };
    let (reps, rep_events) = advance(snapshot.reps, &input, config);

    let mut events: Vec<FeedbackEvent> = posture_event.into_iter().collect();
    events.extend(rep_events);

    log::trace!(
        "analysis: t={} elbow={:.1} back={:.1} phase={} reps={}",
        frame.timestamp_ms(),
        angles.elbow_angle,
        angles.back_angle,
        reps.phase.label(),
        reps.rep_count
    );

    (
        Snapshot {
            angles,
            posture,
            reps,
        },
        events,
    )
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::testing::{down_frame, pose, up_frame, PoseShape};
    use super::*;
    use crate::feedback::FeedbackKind;

    fn run(frames: &[Frame]) -> (Snapshot, Vec<FeedbackEvent>) {
        let config = AnalysisConfig::default();
        let mut snapshot = Snapshot::default();
        let mut all = Vec::new();
        for frame in frames {
            let (next, events) = transition(&snapshot, frame, ExerciseKind::Pushups, &config);
            snapshot = next;
            all.extend(events);
        }
        (snapshot, all)
    }

    #[test]
    fn blind_frames_leave_angles_unchanged() {
        let (seeded, _) = run(&[down_frame()]);
        let blind = pose(PoseShape {
            score: 0.0,
            ..PoseShape::new(185.0, 90.0)
        });

        let config = AnalysisConfig::default();
        let mut snapshot = seeded;
        for _ in 0..3 {
            let (next, _) = transition(&snapshot, &blind, ExerciseKind::Pushups, &config);
            assert_eq!(next.angles.elbow_angle, seeded.angles.elbow_angle);
            assert_eq!(next.angles.back_angle, seeded.angles.back_angle);
            snapshot = next;
        }
        assert_eq!(snapshot.reps, seeded.reps);
    }

    #[test]
    fn full_reps_through_frames() {
        let (snapshot, events) = run(&[
            down_frame(),
            up_frame(),
            down_frame(),
            up_frame(),
        ]);
        assert_eq!(snapshot.reps.rep_count, 2);
        assert_eq!(snapshot.reps.phase, Phase::Up);

        let cues: Vec<&str> = events
            .iter()
            .filter(|e| e.kind == FeedbackKind::Info)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(cues, vec!["1", LEAVING_UP_CUE, "2"]);
    }

    #[test]
    fn posture_event_precedes_rep_cue() {
        let (_, events) = run(&[down_frame(), up_frame()]);
        // frame 1: good; frame 2: good then "1"
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].kind, FeedbackKind::Good);
        assert_eq!(events[2], FeedbackEvent::cue("1"));
    }

    #[test]
    fn bent_back_blocks_down_and_warns_once() {
        let bent = pose(PoseShape::new(90.0, 90.0));
        let (snapshot, events) = run(&[up_frame(), bent.clone(), bent.clone(), bent]);
        assert_eq!(snapshot.reps.phase, Phase::Up);
        assert!(!snapshot.posture.is_back_straight);
        let warnings = events
            .iter()
            .filter(|e| e.kind == FeedbackKind::Warning)
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn stale_elbow_keeps_machine_moving() {
        // Arm drops out of view after reaching the down position; a confident
        // up frame later still completes the rep.
        let lost_arm = pose(PoseShape {
            score: 0.1,
            ..PoseShape::new(185.0, 10.0)
        });
        let (snapshot, _) = run(&[down_frame(), lost_arm, up_frame()]);
        assert_eq!(snapshot.reps.rep_count, 1);
    }
}
