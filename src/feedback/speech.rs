//! Speech sinks.
//!
//! [`CommandSpeaker`] shells out to a text-to-speech program (`espeak`,
//! `say`, …) on tokio's blocking pool and never waits for it, so frame
//! processing is not held up by audio playback.

use std::process::{Command, Stdio};

use crate::config::FeedbackConfig;

use super::emitter::SpeechSink;

// ---------------------------------------------------------------------------
// CommandSpeaker
// ---------------------------------------------------------------------------

/// Runs `program [args…] <message>` for every utterance.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &FeedbackConfig) -> Self {
        Self::new(config.speech_command.clone(), config.speech_args.clone())
    }

    /// The full command line for `text`, program first.
    pub fn command_line(&self, text: &str) -> Vec<String> {
        let mut line = Vec::with_capacity(self.args.len() + 2);
        line.push(self.program.clone());
        line.extend(self.args.iter().cloned());
        line.push(text.to_string());
        line
    }
}

impl SpeechSink for CommandSpeaker {
    fn speak(&self, text: &str) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::warn!("speech: no async runtime, dropping {text:?}");
                return;
            }
        };

        let program = self.program.clone();
        let args = self.args.clone();
        let text = text.to_string();

        // Detached: the JoinHandle is dropped on purpose.
        drop(handle.spawn_blocking(move || {
            let status = Command::new(&program)
                .args(&args)
                .arg(&text)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();

            match status {
                Ok(s) if s.success() => log::trace!("speech: said {text:?}"),
                Ok(s) => log::warn!("speech: {program} exited with {s}"),
                Err(e) => log::warn!("speech: cannot run {program}: {e}"),
            }
        }));
    }
}

// ---------------------------------------------------------------------------
// SilentSpeaker
// ---------------------------------------------------------------------------

/// Discards every utterance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

impl SpeechSink for SilentSpeaker {
    fn speak(&self, _text: &str) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
