//! Repetition state machine.
//!
//! ```text
//!            elbow ∈ up_window                   straight back ∧ elbow above nose
//!          ┌───────────────────┐                 ∧ |elbow| ∈ down_window
//!          ▼                   │               ┌──────────────────────────┐
//! Neutral ───▶ Up ◀────────────┴── Down ◀──────┘                          │
//!              │     (rep_count += 1, speak count)                        │
//!              └──────────────────────────────────────────────────────────┘
//!                                (speak "Up")
//! ```
//!
//! The up check runs first, then the down check.  Both may assign the phase
//! in the same frame, in which case the down check wins.  A rep is counted
//! only on the `Down → Up` edge, so staying in the up window never counts
//! twice.

use crate::config::AnalysisConfig;
use crate::feedback::FeedbackEvent;

/// Cue spoken when leaving the up position for the down position.
pub const LEAVING_UP_CUE: &str = "Up";

/// Position classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Neutral,
    Up,
    Down,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Neutral => "Neutral",
            Phase::Up => "Up",
            Phase::Down => "Down",
        }
    }
}

/// Rep counter state for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepState {
    pub phase: Phase,
    pub rep_count: u32,
}

/// Per-frame inputs to [`advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepInput {
    pub elbow_angle: f32,
    pub is_back_straight: bool,
    pub elbow_above_nose: bool,
}

fn within(value: f32, (low, high): (f32, f32)) -> bool {
    value > low && value < high
}

/// Apply both position checks to `state`.
///
/// ```
/// use rep_coach::analysis::{advance, Phase, RepInput, RepState};
/// use rep_coach::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// let down = RepInput { elbow_angle: 90.0, is_back_straight: true, elbow_above_nose: true };
/// let up = RepInput { elbow_angle: 185.0, ..down };
///
/// let (state, _) = advance(RepState::default(), &down, &config);
/// assert_eq!(state.phase, Phase::Down);
/// let (state, events) = advance(state, &up, &config);
/// assert_eq!(state.rep_count, 1);
/// assert_eq!(events[0].message, "1");
/// ```
pub fn advance(
    state: RepState,
    input: &RepInput,
    config: &AnalysisConfig,
) -> (RepState, Vec<FeedbackEvent>) {
    let mut next = state;
    let mut events = Vec::new();

    if within(input.elbow_angle, config.up_window) {
        if next.phase == Phase::Down {
            next.rep_count += 1;
            log::info!("reps: rep {} completed", next.rep_count);
            events.push(FeedbackEvent::cue(next.rep_count.to_string()));
        }
        next.phase = Phase::Up;
    }

    if input.is_back_straight
        && input.elbow_above_nose
        && within(input.elbow_angle.abs(), config.down_window)
    {
        if next.phase == Phase::Up {
            events.push(FeedbackEvent::cue(LEAVING_UP_CUE));
        }
        next.phase = Phase::Down;
    }

    if next.phase != state.phase {
        log::debug!(
            "reps: {} → {} (elbow {:.1}°)",
            state.phase.label(),
            next.phase.label(),
            input.elbow_angle
        );
    }

    (next, events)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackKind;

    const DOWN: RepInput = RepInput {
        elbow_angle: 90.0,
        is_back_straight: true,
        elbow_above_nose: true,
    };
    const UP: RepInput = RepInput {
        elbow_angle: 185.0,
        is_back_straight: true,
        elbow_above_nose: true,
    };

    fn step(state: RepState, input: RepInput) -> (RepState, Vec<FeedbackEvent>) {
        advance(state, &input, &AnalysisConfig::default())
    }

    #[test]
    fn initial_state_is_neutral_zero() {
        let state = RepState::default();
        assert_eq!(state.phase, Phase::Neutral);
        assert_eq!(state.rep_count, 0);
    }

    #[test]
    fn neutral_to_up_does_not_count() {
        let (state, events) = step(RepState::default(), UP);
        assert_eq!(state.phase, Phase::Up);
        assert_eq!(state.rep_count, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn neutral_to_down_is_silent() {
        let (state, events) = step(RepState::default(), DOWN);
        assert_eq!(state.phase, Phase::Down);
        assert!(events.is_empty());
    }

    #[test]
    fn down_up_down_up_scenario() {
        let (a, _) = step(RepState::default(), DOWN);
        assert_eq!(a, RepState { phase: Phase::Down, rep_count: 0 });

        let (b, events) = step(a, UP);
        assert_eq!(b, RepState { phase: Phase::Up, rep_count: 1 });
        assert_eq!(events, vec![FeedbackEvent::cue("1")]);

        let (c, events) = step(b, DOWN);
        assert_eq!(c, RepState { phase: Phase::Down, rep_count: 1 });
        assert_eq!(events, vec![FeedbackEvent::cue(LEAVING_UP_CUE)]);

        let (d, events) = step(c, UP);
        assert_eq!(d, RepState { phase: Phase::Up, rep_count: 2 });
        assert_eq!(events[0].message, "2");
        assert_eq!(events[0].kind, FeedbackKind::Info);
        assert!(events[0].spoken);
    }

    #[test]
    fn holding_up_counts_once() {
        let (mut state, _) = step(RepState::default(), DOWN);
        let mut cues = 0;
        for _ in 0..10 {
            let (next, events) = step(state, UP);
            state = next;
            cues += events.len();
        }
        assert_eq!(state.rep_count, 1);
        assert_eq!(cues, 1);
    }

    #[test]
    fn down_requires_straight_back() {
        let start = RepState { phase: Phase::Up, rep_count: 3 };
        let (state, events) = step(start, RepInput { is_back_straight: false, ..DOWN });
        assert_eq!(state, start);
        assert!(events.is_empty());
    }

    #[test]
    fn down_requires_elbow_above_nose() {
        let start = RepState { phase: Phase::Up, rep_count: 3 };
        let (state, events) = step(start, RepInput { elbow_above_nose: false, ..DOWN });
        assert_eq!(state, start);
        assert!(events.is_empty());
    }

    #[test]
    fn down_requires_elbow_in_window() {
        let start = RepState { phase: Phase::Up, rep_count: 3 };
        for angle in [45.0, 70.0, 100.0, 130.0] {
            let (state, events) = step(start, RepInput { elbow_angle: angle, ..DOWN });
            assert_eq!(state, start, "angle {angle}");
            assert!(events.is_empty());
        }
    }

    #[test]
    fn down_window_uses_absolute_value() {
        let (state, _) = step(RepState::default(), RepInput { elbow_angle: -85.0, ..DOWN });
        assert_eq!(state.phase, Phase::Down);
    }

    #[test]
    fn up_window_uses_raw_value() {
        let start = RepState { phase: Phase::Down, rep_count: 0 };
        let (state, _) = step(start, RepInput { elbow_angle: -185.0, ..UP });
        assert_eq!(state, start);
        for angle in [170.0, 200.0] {
            let (state, _) = step(start, RepInput { elbow_angle: angle, ..UP });
            assert_eq!(state, start, "angle {angle}");
        }
    }

    #[test]
    fn later_rule_wins_when_both_fire() {
        // Overlapping windows make both checks match the same frame.
        let config = AnalysisConfig {
            up_window: (80.0, 200.0),
            ..AnalysisConfig::default()
        };
        let start = RepState { phase: Phase::Down, rep_count: 0 };
        let (state, events) = advance(start, &DOWN, &config);
        assert_eq!(state, RepState { phase: Phase::Down, rep_count: 1 });
        assert_eq!(
            events,
            vec![FeedbackEvent::cue("1"), FeedbackEvent::cue(LEAVING_UP_CUE)]
        );
    }
}
