//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every section is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::analysis::ExerciseKind;

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Thresholds used by the angle extractor, posture evaluator and rep
/// state machine.  Windows are open intervals `(low, high)` in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// A keypoint must score strictly above this to be used for an angle.
    pub min_confidence: f32,
    /// Back angles below this count as straight.
    pub straight_back_below: f32,
    /// Back angles above this count as straight.
    pub straight_back_above: f32,
    /// Raw elbow angle window for the "up" position.
    pub up_window: (f32, f32),
    /// Absolute elbow angle window for the "down" position.
    pub down_window: (f32, f32),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            straight_back_below: 20.0,
            straight_back_above: 160.0,
            up_window: (170.0, 200.0),
            down_window: (70.0, 100.0),
        }
    }
}

// ---------------------------------------------------------------------------
// FeedbackConfig
// ---------------------------------------------------------------------------

/// Where feedback goes besides the text display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Speak events flagged as spoken.
    pub voice_enabled: bool,
    /// Text-to-speech program; the message is appended as the last argument.
    pub speech_command: String,
    /// Extra arguments placed before the message.
    pub speech_args: Vec<String>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            voice_enabled: true,
            speech_command: "espeak".into(),
            speech_args: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Workout session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Exercise selected when a session starts.
    pub exercise: ExerciseKind,
    /// JSON-lines file of recorded poses to replay.  The command-line
    /// argument takes precedence.
    pub replay_file: Option<PathBuf>,
    /// Minimum milliseconds between ticks.  `0` lets the estimator set the
    /// pace.
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exercise: ExerciseKind::default(),
            replay_file: None,
            tick_interval_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// Selects where finished workout records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// JSON files in a local directory.
    File,
    /// POST to the workout API.
    Api,
    /// Do not persist.
    Disabled,
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::File
    }
}

/// Workout persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory for the file backend.  `None` means [`AppPaths::workouts_dir`].
    pub output_dir: Option<PathBuf>,
    /// Base URL of the workout API (api backend).
    pub base_url: String,
    /// Bearer token for the workout API.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for the API.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            output_dir: None,
            base_url: "http://localhost:5000".into(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    /// Directory the file backend writes into.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().workouts_dir)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use rep_coach::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(config.analysis.min_confidence > 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub feedback: FeedbackConfig,
    pub session: SessionConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
