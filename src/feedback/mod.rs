//! Feedback events and the sinks that deliver them.
//!
//! The analysis core only *produces* [`FeedbackEvent`] values.  The
//! [`FeedbackEmitter`] forwards them to a text display (always) and a speech
//! engine (spoken events only, while voice feedback is enabled).
//!
//! ```text
//! posture::evaluate ─┐
//!                    ├─▶ Vec<FeedbackEvent> ─▶ FeedbackEmitter ─┬─▶ TextSink
//! reps::advance ─────┘                                          └─▶ SpeechSink (spoken && voice on)
//! ```

pub mod emitter;
pub mod speech;

pub use emitter::{ChannelTextSink, FeedbackEmitter, LogTextSink, SpeechSink, TextSink};
pub use speech::{CommandSpeaker, SilentSpeaker};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FeedbackKind
// ---------------------------------------------------------------------------

/// Tone of a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Good,
    Warning,
    Info,
}

// ---------------------------------------------------------------------------
// FeedbackEvent
// ---------------------------------------------------------------------------

/// A single piece of feedback for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub message: String,
    pub kind: FeedbackKind,
    /// Should also be read aloud.
    pub spoken: bool,
}

impl FeedbackEvent {
    /// Silent encouragement.
    pub fn good(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Good,
            spoken: false,
        }
    }

    /// Spoken form warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Warning,
            spoken: true,
        }
    }

    /// Spoken progress cue (rep counts, position calls).
    pub fn cue(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Info,
            spoken: true,
        }
    }
}
