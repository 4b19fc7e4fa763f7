use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ── Defaults ────────────────────────────────────────────────────────────────

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 10.0;
pub const WHEEL_SENSITIVITY: f32 = 0.001;
pub const ZOOM_STEP: f32 = 0.5;
pub const SLIDER_STEP: f64 = 0.1;

/// Surface size used when an asset is missing or fails to decode.
pub const PLACEHOLDER_SIZE: (f32, f32) = (800.0, 600.0);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Viewer settings. Every field may be omitted from the JSON file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub wheel_sensitivity: f32,
    pub zoom_step: f32,
    pub assets_dir: PathBuf,
    pub window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            wheel_sensitivity: WHEEL_SENSITIVITY,
            zoom_step: ZOOM_STEP,
            assets_dir: PathBuf::from("assets"),
            window_size: [1280.0, 800.0],
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if self.min_scale >= self.max_scale {
            return Err(ConfigError::Invalid(format!(
                "min_scale ({}) must be below max_scale ({})",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.min_scale..=self.max_scale).contains(&1.0) {
            return Err(ConfigError::Invalid(
                "scale range must include 1.0 so the view can be reset".into(),
            ));
        }
        if !(self.wheel_sensitivity > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "wheel_sensitivity must be positive, got {}",
                self.wheel_sensitivity
            )));
        }
        if !(self.zoom_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be positive, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.max_scale, 10.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            ViewerConfig::from_json(r#"{ "wheel_sensitivity": 0.002, "assets_dir": "/tmp/img" }"#)
                .unwrap();
        assert_eq!(config.wheel_sensitivity, 0.002);
        assert_eq!(config.assets_dir, PathBuf::from("/tmp/img"));
        assert_eq!(config.zoom_step, ZOOM_STEP);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = ViewerConfig::from_json(r#"{ "min_scale": 4.0, "max_scale": 2.0 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(ViewerConfig::from_json(r#"{ "min_scale": 0.0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "wheel_sensitivity": -1.0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "zoom_step": 0.0 }"#).is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ViewerConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ViewerConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
