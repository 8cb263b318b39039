//! Back-alignment check with an edge-triggered warning.
//!
//! A straight back produces a `Good` event on every frame.  A bent back
//! produces one spoken warning per contiguous bad run; the run ends (and the
//! warning re-arms) on the first straight frame.

use crate::config::AnalysisConfig;
use crate::feedback::FeedbackEvent;

use super::angles::AngleSample;
use super::exercise::ExerciseKind;

/// Message spoken when the back stops being straight.
pub const BACK_WARNING: &str = "Keep your back straight";

/// Posture classification carried between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostureState {
    pub is_back_straight: bool,
    /// A warning has been issued for the current bad run.
    pub warning_already_given: bool,
}

impl Default for PostureState {
    fn default() -> Self {
        Self {
            is_back_straight: true,
            warning_already_given: false,
        }
    }
}

/// `back_angle < straight_back_below || back_angle > straight_back_above`.
pub fn is_straight(back_angle: f32, config: &AnalysisConfig) -> bool {
    back_angle < config.straight_back_below || back_angle > config.straight_back_above
}

/// Classify `sample` and decide whether to say anything.
pub fn evaluate(
    sample: &AngleSample,
    previous: PostureState,
    exercise: ExerciseKind,
    config: &AnalysisConfig,
) -> (PostureState, Option<FeedbackEvent>) {
    if is_straight(sample.back_angle, config) {
        let next = PostureState {
            is_back_straight: true,
            warning_already_given: false,
        };
        return (next, Some(FeedbackEvent::good(exercise.good_posture_message())));
    }

    if previous.warning_already_given {
        let next = PostureState {
            is_back_straight: false,
            warning_already_given: true,
        };
        return (next, None);
    }

    log::info!("posture: back angle {:.1}° out of range", sample.back_angle);
    let next = PostureState {
        is_back_straight: false,
        warning_already_given: true,
    };
    (next, Some(FeedbackEvent::warning(BACK_WARNING)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackKind;

    fn back(angle: f32) -> AngleSample {
        AngleSample {
            back_angle: angle,
            ..Default::default()
        }
    }

    fn run(angles: &[f32]) -> (PostureState, Vec<FeedbackEvent>) {
        let config = AnalysisConfig::default();
        let mut state = PostureState::default();
        let mut events = Vec::new();
        for &a in angles {
            let (next, event) = evaluate(&back(a), state, ExerciseKind::Pushups, &config);
            state = next;
            events.extend(event);
        }
        (state, events)
    }

    fn warnings(events: &[FeedbackEvent]) -> usize {
        events
            .iter()
            .filter(|e| e.kind == FeedbackKind::Warning)
            .count()
    }

    #[test]
    fn straight_predicate_uses_both_ends() {
        let config = AnalysisConfig::default();
        assert!(is_straight(10.0, &config));
        assert!(is_straight(170.0, &config));
        assert!(!is_straight(20.0, &config));
        assert!(!is_straight(160.0, &config));
        assert!(!is_straight(90.0, &config));
    }

    #[test]
    fn bad_run_warns_once() {
        let (state, events) = run(&[90.0; 5]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], FeedbackEvent::warning(BACK_WARNING));
        assert!(events[0].spoken);
        assert!(!state.is_back_straight);
        assert!(state.warning_already_given);
    }

    #[test]
    fn straight_frame_rearms_warning() {
        let (state, events) = run(&[90.0, 90.0, 90.0, 90.0, 90.0, 10.0]);
        assert_eq!(warnings(&events), 1);
        assert!(state.is_back_straight);
        assert!(!state.warning_already_given);

        let (_, events) = run(&[90.0, 90.0, 90.0, 90.0, 90.0, 10.0, 90.0]);
        assert_eq!(warnings(&events), 2);
    }

    #[test]
    fn good_event_on_every_straight_frame() {
        let (_, events) = run(&[10.0, 5.0, 170.0]);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.kind == FeedbackKind::Good && !e.spoken));
    }

    #[test]
    fn good_message_depends_on_exercise() {
        let config = AnalysisConfig::default();
        let (_, pushups) = evaluate(
            &back(10.0),
            PostureState::default(),
            ExerciseKind::Pushups,
            &config,
        );
        let (_, squats) = evaluate(
            &back(10.0),
            PostureState::default(),
            ExerciseKind::Squats,
            &config,
        );
        assert_eq!(
            pushups.unwrap().message,
            ExerciseKind::Pushups.good_posture_message()
        );
        assert_eq!(
            squats.unwrap().message,
            ExerciseKind::Squats.good_posture_message()
        );
    }
}
