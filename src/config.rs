//! Configuration for the probe tool

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ToolColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl ToolColor {
    pub const WHITE: ToolColor = ToolColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const GREEN_YELLOW: ToolColor = ToolColor {
        r: 173.0 / 255.0,
        g: 1.0,
        b: 47.0 / 255.0,
    };

    /// Convert to 8-bit RGBA (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }

    /// CSS `rgb()` notation, as most canvas hosts expect
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba_u8();
        format!("rgb({r}, {g}, {b})")
    }
}

/// Probe tool configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Draw the handle marker
    pub draw_handles: bool,
    /// Draw the handle with `line_dash`
    pub render_dashed: bool,
    /// Handle radius in canvas units, `None` leaves it to the renderer
    pub handle_radius: Option<f64>,
    /// Dash pattern used when `render_dashed` is set
    pub line_dash: Vec<f64>,
    /// Maximum canvas distance for a click to hit a handle (exclusive)
    pub hit_radius: f64,
    /// Minimum time between two recomputes of the same point while dragging
    pub throttle_ms: u64,
    /// Image-space offset of the text anchor from the handle
    pub text_offset: f64,
    /// Color of inactive measurements
    pub tool_color: ToolColor,
    /// Color of the active measurement
    pub active_color: ToolColor,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            draw_handles: true,
            render_dashed: false,
            handle_radius: None,
            line_dash: vec![4.0, 4.0],
            hit_radius: 5.0,
            throttle_ms: 110,
            text_offset: 3.0,
            tool_color: ToolColor::WHITE,
            active_color: ToolColor::GREEN_YELLOW,
        }
    }
}

impl ProbeConfig {
    const APP_DIR: &'static str = "pointprobe";
    const FILE_NAME: &'static str = "config.json";

    /// Default location under the user's config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using default probe config");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("No config directory available, probe config not saved");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversions() {
        assert_eq!(ToolColor::WHITE.to_rgba_u8(), [255, 255, 255, 255]);
        assert_eq!(ToolColor::GREEN_YELLOW.to_css(), "rgb(173, 255, 47)");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = ProbeConfig {
            render_dashed: true,
            handle_radius: Some(6.0),
            throttle_ms: 250,
            ..ProbeConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(ProbeConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "hit_radius": 8.0 }"#).unwrap();

        let config = ProbeConfig::load_from(&path).unwrap();
        assert_eq!(config.hit_radius, 8.0);
        assert_eq!(config.throttle_ms, 110);
        assert!(config.draw_handles);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ProbeConfig::load_from(&path).is_err());
    }
}
