//! TOML-based application configuration.
//!
//! Stores:
//! - Session and break lengths, and the frame loop's minimum interval
//! - Clock-face geometry and colours
//! - An optional override of the transition allow-list
//!
//! Configuration is stored at `~/.config/pomoface/config.toml`
//! (`~/.config/pomoface-dev/` when `POMOFACE_ENV=dev`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::clock::MINUTE;
use crate::draw::Color;
use crate::error::{ConfigError, Result};
use crate::sam::TransitionTable;

/// Timer lengths and pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_session_minutes")]
    pub session_minutes: f64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: f64,
    /// Minimum time between executed frames; 0 runs on every refresh.
    #[serde(default)]
    pub frame_interval_ms: f64,
    /// Roll ended phases into the next one without user input.
    #[serde(default = "default_true")]
    pub auto_cycle: bool,
}

/// Clock-face geometry and colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_center")]
    pub center_x: f64,
    #[serde(default = "default_center")]
    pub center_y: f64,
    /// Radius of the outermost (hours) ring.
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_session_color")]
    pub session_color: Color,
    #[serde(default = "default_break_color")]
    pub break_color: Color,
    #[serde(default = "default_timer_color")]
    pub timer_color: Color,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_cursor_off_color")]
    pub cursor_off_color: Color,
    /// Hours-ring alpha added per whole hour remaining.
    #[serde(default = "default_opacity_step")]
    pub opacity_step: f64,
    /// Angular width of the blinking cursor, in radians.
    #[serde(default = "default_cursor_wedge")]
    pub cursor_wedge: f64,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Allow-list override; the built-in table is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<TransitionTable>,
}

// Default functions
fn default_session_minutes() -> f64 {
    25.0
}
fn default_break_minutes() -> f64 {
    5.0
}
fn default_true() -> bool {
    true
}
fn default_center() -> f64 {
    150.0
}
fn default_radius() -> f64 {
    120.0
}
fn default_line_width() -> f64 {
    12.0
}
fn default_session_color() -> Color {
    Color::rgb(220, 68, 55)
}
fn default_break_color() -> Color {
    Color::rgb(59, 130, 246)
}
fn default_timer_color() -> Color {
    Color::rgb(120, 120, 120)
}
fn default_background_color() -> Color {
    Color::rgb(235, 235, 235)
}
fn default_cursor_off_color() -> Color {
    Color::rgb(255, 255, 255)
}
fn default_opacity_step() -> f64 {
    0.25
}
fn default_cursor_wedge() -> f64 {
    0.08
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            session_minutes: default_session_minutes(),
            break_minutes: default_break_minutes(),
            frame_interval_ms: 0.0,
            auto_cycle: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            center_x: default_center(),
            center_y: default_center(),
            radius: default_radius(),
            line_width: default_line_width(),
            session_color: default_session_color(),
            break_color: default_break_color(),
            timer_color: default_timer_color(),
            background_color: default_background_color(),
            cursor_off_color: default_cursor_off_color(),
            opacity_step: default_opacity_step(),
            cursor_wedge: default_cursor_wedge(),
        }
    }
}

impl TimerConfig {
    pub fn session_ms(&self) -> f64 {
        self.session_minutes * MINUTE
    }

    pub fn break_ms(&self) -> f64 {
        self.break_minutes * MINUTE
    }
}

/// Returns `~/.config/pomoface[-dev]/` based on POMOFACE_ENV, creating it.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("POMOFACE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomoface-dev")
    } else {
        base_dir.join("pomoface")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(n) if !n.is_f64() => serde_json::Value::from(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<f64>()
                            .map_err(|e| invalid(e.to_string()))?;
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot use '{value}' as a number")))?
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, without saving.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The effective allow-list.
    pub fn transition_table(&self) -> TransitionTable {
        self.transitions.clone().unwrap_or_default()
    }
}
