//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\rep-coach\
//!   macOS:   ~/Library/Application Support/rep-coach/
//!   Linux:   ~/.config/rep-coach/
//!
//! Data dir (saved workouts):
//!   Windows: %LOCALAPPDATA%\rep-coach\
//!   macOS:   ~/Library/Application Support/rep-coach/
//!   Linux:   ~/.local/share/rep-coach/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory the file store writes workout records into.
    pub workouts_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "rep-coach";

    /// Resolves all paths using the `dirs` crate, falling back to the current
    /// directory when the platform has no standard location.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            settings_file: config_dir.join("settings.toml"),
            workouts_dir: data_dir.join("workouts"),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
