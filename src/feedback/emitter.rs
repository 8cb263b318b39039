//! Routes feedback events to the text display and the speech engine.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::{FeedbackEvent, FeedbackKind};

// ---------------------------------------------------------------------------
// Sink traits
// ---------------------------------------------------------------------------

/// Receives every feedback event for on-screen display.
pub trait TextSink: Send + Sync {
    fn display(&self, event: &FeedbackEvent);
}

/// Reads a message aloud.
///
/// Implementations must return immediately; playback happens in the
/// background and overlapping utterances may be dropped or cut off.
pub trait SpeechSink: Send + Sync {
    fn speak(&self, text: &str);
}

// Compile-time assertion: both sinks must be usable as trait objects.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TextSink>, _: Box<dyn SpeechSink>) {}
};

// ---------------------------------------------------------------------------
// FeedbackEmitter
// ---------------------------------------------------------------------------

/// Fans events out to the two sinks.
///
/// ```
/// use std::sync::Arc;
/// use rep_coach::feedback::{FeedbackEmitter, FeedbackEvent, LogTextSink, SilentSpeaker};
///
/// let emitter = FeedbackEmitter::new(Arc::new(LogTextSink), Arc::new(SilentSpeaker), true);
/// emitter.emit(&[FeedbackEvent::cue("1")]);
/// ```
#[derive(Clone)]
pub struct FeedbackEmitter {
    text: Arc<dyn TextSink>,
    speech: Arc<dyn SpeechSink>,
    voice_enabled: bool,
}

impl FeedbackEmitter {
    pub fn new(text: Arc<dyn TextSink>, speech: Arc<dyn SpeechSink>, voice_enabled: bool) -> Self {
        Self {
            text,
            speech,
            voice_enabled,
        }
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    /// Session-level voice toggle.
    pub fn set_voice_enabled(&mut self, enabled: bool) {
        if self.voice_enabled != enabled {
            log::info!("feedback: voice {}", if enabled { "on" } else { "off" });
        }
        self.voice_enabled = enabled;
    }

    /// Display every event; speak the spoken ones while voice is on.
    pub fn emit(&self, events: &[FeedbackEvent]) {
        for event in events {
            self.text.display(event);
            if event.spoken && self.voice_enabled {
                self.speech.speak(&event.message);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LogTextSink
// ---------------------------------------------------------------------------

/// Writes feedback to the log.  `Good` events arrive every frame while the
/// form holds, so they go to `debug`.
pub struct LogTextSink;

impl TextSink for LogTextSink {
    fn display(&self, event: &FeedbackEvent) {
        match event.kind {
            FeedbackKind::Good => log::debug!("feedback: {}", event.message),
            FeedbackKind::Warning => log::warn!("feedback: {}", event.message),
            FeedbackKind::Info => log::info!("feedback: {}", event.message),
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelTextSink
// ---------------------------------------------------------------------------

/// Hands events to a UI task over a bounded channel without blocking.
///
/// Events are dropped when the queue is full or the receiver is gone.
pub struct ChannelTextSink {
    tx: mpsc::Sender<FeedbackEvent>,
}

impl ChannelTextSink {
    pub fn new(tx: mpsc::Sender<FeedbackEvent>) -> Self {
        Self { tx }
    }
}

impl TextSink for ChannelTextSink {
    fn display(&self, event: &FeedbackEvent) {
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                log::warn!("feedback: display queue full, dropped {:?}", dropped.message);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!("feedback: display receiver closed");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
