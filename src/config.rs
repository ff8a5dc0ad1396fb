//! Viewer configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives the stock
//! viewer. A complete file looks like:
//!
//! ```toml
//! [window]
//! title = "Pedestal Fan"
//! width = 1024
//! height = 768
//!
//! [model]
//! preset = "deluxe"      # or "classic"
//!
//! [animation]
//! oscillation_enabled = true
//! oscillation_speed = 2.0
//! max_oscillation_angle = 30.0
//! blade_rotation_enabled = true
//! blade_speed = 200.0
//!
//! [camera]
//! distance = 8.0
//! height = 2.0
//! azimuth = 45.0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::animation::AnimationParams;
use crate::app::AppConfig;
use crate::controls::Controls;
use crate::fan::FanPreset;
use crate::orbit_camera::CameraState;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Pedestal Fan".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub preset: FanPreset,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub distance: f32,
    pub height: f32,
    /// Degrees around the vertical axis.
    pub azimuth: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let camera = CameraState::default();
        Self {
            distance: camera.distance,
            height: camera.height,
            azimuth: camera.azimuth_deg,
        }
    }
}

impl CameraSettings {
    /// Builds the orbit state, clamping distance to the zoom range of the controls.
    pub fn to_state(self) -> CameraState {
        let controls = Controls::default();
        let distance = self
            .distance
            .clamp(controls.min_distance, controls.max_distance);
        if distance != self.distance {
            log::warn!(
                "camera distance {} is outside {}..={}, using {distance}",
                self.distance,
                controls.min_distance,
                controls.max_distance
            );
        }
        CameraState::new()
            .distance(distance)
            .height(self.height)
            .azimuth(self.azimuth)
    }
}

/// Top-level viewer configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    pub model: ModelSettings,
    pub animation: AnimationParams,
    pub camera: CameraSettings,
}

impl ViewerConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !(self.camera.distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "camera distance must be positive, got {}",
                self.camera.distance
            )));
        }
        if !(self.animation.oscillation_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "oscillation speed must be positive, got {}",
                self.animation.oscillation_speed
            )));
        }
        if !(self.animation.max_oscillation_angle >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "oscillation amplitude must be non-negative, got {}",
                self.animation.max_oscillation_angle
            )));
        }
        Ok(())
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig::new()
            .title(&self.window.title)
            .size(self.window.width, self.window.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ViewerConfig::from_toml("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.animation, AnimationParams::default());
        assert_eq!(config.camera.to_state(), CameraState::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml(
            r#"
            [model]
            preset = "classic"

            [animation]
            blade_speed = 360.0
            oscillation_enabled = false

            [camera]
            azimuth = 400.0
            "#,
        )
        .unwrap();

        assert_eq!(config.model.preset, FanPreset::Classic);
        assert_eq!(config.animation.blade_speed, 360.0);
        assert!(!config.animation.oscillation_enabled);
        assert_eq!(config.animation.oscillation_speed, 2.0);
        assert_eq!(config.window, WindowSettings::default());

        let camera = config.camera.to_state();
        assert!((camera.azimuth_deg - 40.0).abs() < 1e-4);
        assert_eq!(camera.distance, 8.0);
    }

    #[test]
    fn camera_distance_is_clamped_to_zoom_range() {
        let far = ViewerConfig::from_toml("[camera]\ndistance = 200.0").unwrap();
        assert_eq!(far.camera.to_state().distance, 15.0);

        let near = ViewerConfig::from_toml("[camera]\ndistance = 0.5").unwrap();
        assert_eq!(near.camera.to_state().distance, 3.0);
    }

    #[test]
    fn window_settings_feed_app_config() {
        let config = ViewerConfig::from_toml("[window]\ntitle = \"Fan\"\nwidth = 640\nheight = 480")
            .unwrap();
        let app = config.app_config();
        assert_eq!(app.title, "Fan");
        assert_eq!((app.width, app.height), (640, 480));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ViewerConfig::from_toml("[window]\nwidth = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_toml("[camera]\ndistance = -2.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_toml("[animation]\noscillation_speed = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            ViewerConfig::from_toml("[model]\npreset = \"tower\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ViewerConfig::from_toml("[window\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ViewerConfig::load(Path::new("/nonexistent/fanrig.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fanrig.toml"));
    }
}
