// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration, loaded from JSON.

use loom_core::input::Key;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Largest accepted `max_key_code`. Each tracked code costs two table slots.
pub const MAX_KEY_CODE_LIMIT: i32 = 1023;

/// The main window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text.
    pub title: String,
    /// Initial inner width, in logical pixels.
    pub width: u32,
    /// Initial inner height, in logical pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Loom".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// A font file installed into the UI at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Name the font is registered under.
    pub name: String,
    /// Path to a TTF/OTF file.
    pub path: PathBuf,
    /// Registers the font for monospace text instead of proportional text.
    #[serde(default)]
    pub monospace: bool,
    /// Size relative to the UI's default text size.
    #[serde(default = "default_font_scale")]
    pub scale: f32,
}

fn default_font_scale() -> f32 {
    1.0
}

/// Everything a Loom application reads at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoomConfig {
    /// The main window.
    pub window: WindowConfig,
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Straight RGBA color the frame is cleared to.
    pub clear_color: [f32; 4],
    /// Pixel scroll deltas are divided by this to get lines.
    pub scroll_pixels_per_line: f64,
    /// Highest key code the key tables track, between `Key::LAST` and
    /// [`MAX_KEY_CODE_LIMIT`].
    pub max_key_code: i32,
    /// Waits for vertical blank when presenting.
    pub vsync: bool,
    /// Extra UI fonts, highest priority last.
    pub fonts: Vec<FontConfig>,
}

impl Default for LoomConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            log_filter: "info".to_string(),
            clear_color: [0.01, 0.02, 0.03, 1.0],
            scroll_pixels_per_line: 50.0,
            max_key_code: Key::LAST.0,
            vsync: true,
            fonts: Vec::new(),
        }
    }
}

/// Why a configuration could not be loaded.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    Io(std::io::Error),
    /// The JSON is malformed or has wrongly typed fields.
    Parse(serde_json::Error),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Configuration I/O error: {err}"),
            ConfigError::Parse(err) => write!(f, "Malformed configuration: {err}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl LoomConfig {
    /// Parses and validates a JSON configuration. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads `path` if it exists, the defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            log::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Checks the values a running application depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} has a zero dimension",
                self.window.width, self.window.height
            )));
        }
        if !(self.scroll_pixels_per_line > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scroll_pixels_per_line must be positive, got {}",
                self.scroll_pixels_per_line
            )));
        }
        if !(Key::LAST.0..=MAX_KEY_CODE_LIMIT).contains(&self.max_key_code) {
            return Err(ConfigError::Invalid(format!(
                "max_key_code must be within {}..={MAX_KEY_CODE_LIMIT}, got {}",
                Key::LAST.0,
                self.max_key_code
            )));
        }
        if let Some(font) = self.fonts.iter().find(|f| !(f.scale > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "font '{}' has a non-positive scale {}",
                font.name, font.scale
            )));
        }
        Ok(())
    }
}
