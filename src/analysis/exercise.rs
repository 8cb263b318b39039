//! Exercise kinds a session can track.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The exercise the user has selected.
///
/// Every kind runs through the same rep-counting rules; only the wording of
/// the "good posture" message differs (push-ups get a specific one, the rest
/// share a generic one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Pushups,
    Squats,
    Lunges,
    Situps,
    JumpingJacks,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 5] = [
        ExerciseKind::Pushups,
        ExerciseKind::Squats,
        ExerciseKind::Lunges,
        ExerciseKind::Situps,
        ExerciseKind::JumpingJacks,
    ];

    /// Identifier used in config files and stored records.
    pub fn id(self) -> &'static str {
        match self {
            ExerciseKind::Pushups => "pushups",
            ExerciseKind::Squats => "squats",
            ExerciseKind::Lunges => "lunges",
            ExerciseKind::Situps => "situps",
            ExerciseKind::JumpingJacks => "jumping_jacks",
        }
    }

    /// Text shown on every frame where the back is straight.
    pub fn good_posture_message(self) -> &'static str {
        match self {
            ExerciseKind::Pushups => "Good push-up form, back is straight",
            _ => "Good form, keep it up",
        }
    }
}

impl Default for ExerciseKind {
    fn default() -> Self {
        Self::Pushups
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown exercise name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exercise: {0}")]
pub struct UnknownExercise(pub String);

impl FromStr for ExerciseKind {
    type Err = UnknownExercise;

    /// Accepts the [`id`](ExerciseKind::id) form, case-insensitively, with
    /// `-` or `_` separators.
    ///
    /// ```
    /// use rep_coach::analysis::ExerciseKind;
    ///
    /// assert_eq!("Pushups".parse(), Ok(ExerciseKind::Pushups));
    /// assert_eq!("jumping-jacks".parse(), Ok(ExerciseKind::JumpingJacks));
    /// assert!("yoga".parse::<ExerciseKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace('-', "_");
        ExerciseKind::ALL
            .into_iter()
            .find(|kind| kind.id() == normalised)
            .ok_or_else(|| UnknownExercise(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for kind in ExerciseKind::ALL {
            assert_eq!(kind.id().parse::<ExerciseKind>(), Ok(kind));
        }
    }

    #[test]
    fn pushups_have_their_own_message() {
        let generic = ExerciseKind::Squats.good_posture_message();
        assert_ne!(ExerciseKind::Pushups.good_posture_message(), generic);
        for kind in [ExerciseKind::Lunges, ExerciseKind::Situps, ExerciseKind::JumpingJacks] {
            assert_eq!(kind.good_posture_message(), generic);
        }
    }

    #[test]
    fn serde_id_matches_display() {
        let json = serde_json::to_string(&ExerciseKind::JumpingJacks).unwrap();
        assert_eq!(json, format!("\"{}\"", ExerciseKind::JumpingJacks));
    }
}
