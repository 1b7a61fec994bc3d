// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON under `<config_dir>/depth-replay/config.json`. Every field
//! has a default, so partial files are accepted.

use crate::constants::{frame, overlay, smoothing, threshold};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the configuration file inside the application config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Width of every recorded frame in samples
    pub width: u32,
    /// Height of every recorded frame in samples
    pub height: u32,
    /// Fixed lower bound of the depth window
    pub threshold_begin: u16,
    /// Initial upper bound of the depth window
    pub threshold_end: u16,
    /// Amount the `+`/`-` keys move the upper bound
    pub threshold_step: i32,
    /// Amount the Left/Right keys nudge the smoothing factor
    pub smoothing_step: f32,
    /// Half-extent of joint markers drawn on the depth image
    pub point_size: u32,
    /// Where snapshots are written (defaults to the picture directory)
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: frame::DEFAULT_WIDTH,
            height: frame::DEFAULT_HEIGHT,
            threshold_begin: threshold::DEFAULT_BEGIN,
            threshold_end: threshold::MAX_END,
            threshold_step: threshold::DEFAULT_STEP,
            smoothing_step: smoothing::DEFAULT_STEP,
            point_size: overlay::DEFAULT_POINT_SIZE,
            snapshot_dir: None,
        }
    }
}

impl Config {
    /// Default location of the configuration file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load an explicit file, else the default file if present, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> AppResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check that the values describe a usable session
    pub fn validate(&self) -> AppResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Config(format!(
                "frame dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        let min_end = self.threshold_begin.saturating_add(threshold::MIN_SPAN);
        if self.threshold_end < min_end || self.threshold_end > threshold::MAX_END {
            return Err(AppError::Config(format!(
                "threshold_end {} outside [{}, {}]",
                self.threshold_end,
                min_end,
                threshold::MAX_END
            )));
        }

        if self.point_size == 0 {
            return Err(AppError::Config("point_size must be positive".into()));
        }

        if self.threshold_step <= 0 {
            return Err(AppError::Config(format!(
                "threshold_step must be positive, got {}",
                self.threshold_step
            )));
        }

        // NaN fails the range check too
        if !(self.smoothing_step > 0.0 && self.smoothing_step <= 1.0) {
            return Err(AppError::Config(format!(
                "smoothing_step {} outside (0, 1]",
                self.smoothing_step
            )));
        }

        Ok(())
    }
}

/// Parse the reduction factor given on the command line
pub fn parse_reduction_factor(arg: &str) -> AppResult<u32> {
    let value: i64 = arg.trim().parse().map_err(|_| {
        AppError::Config(format!("reduction factor '{}' is not a number", arg))
    })?;

    if value <= 0 {
        return Err(AppError::Config(format!(
            "reduction factor must be positive, got {}",
            value
        )));
    }

    u32::try_from(value)
        .map_err(|_| AppError::Config(format!("reduction factor {} is too large", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reduction_factor() {
        assert_eq!(parse_reduction_factor("16").unwrap(), 16);
        assert_eq!(parse_reduction_factor(" 2 ").unwrap(), 2);
        assert!(matches!(
            parse_reduction_factor("0"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            parse_reduction_factor("-4"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            parse_reduction_factor("sixteen"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_validate_threshold_span() {
        let config = Config {
            threshold_end: 700,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            threshold_end: 800,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "width": 320 }"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 480);
        assert_eq!(config.threshold_end, 8000);
    }

    #[test]
    fn test_validate_rejects_non_positive_steps() {
        for threshold_step in [0, -100, i32::MIN] {
            let config = Config {
                threshold_step,
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(AppError::Config(_))));
        }
        for smoothing_step in [0.0, -0.05, 1.5, f32::NAN] {
            let config = Config {
                smoothing_step,
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(AppError::Config(_))));
        }
        let config = Config {
            threshold_step: 1,
            smoothing_step: 1.0,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
