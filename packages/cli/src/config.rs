//! Dashboard configuration file.

use std::path::Path;

use parking_map_dataset::{DatasetConfig, LoadError};
use parking_map_sync::ContainerSize;
use serde::{Deserialize, Serialize};

/// Slider container size of each view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Main view slider.
    pub main: ContainerSize,
    /// Fullscreen view slider.
    pub fullscreen: ContainerSize,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            main: ContainerSize {
                width: 960.0,
                height: 250.0,
            },
            fullscreen: ContainerSize {
                width: 1400.0,
                height: 300.0,
            },
        }
    }
}

/// Everything the CLI reads from its TOML file.
///
/// ```toml
/// data_dir = "assets/data"
///
/// [slider.main]
/// width = 960
/// height = 250
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset file locations.
    #[serde(flatten)]
    pub dataset: DatasetConfig,
    /// Slider sizes.
    pub slider: SliderConfig,
}

impl DashboardConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or is not valid
    /// TOML for this structure.
    pub fn load(path: Option<&Path>) -> Result<Self, LoadError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        log::debug!("Reading config {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(toml::from_str(&text)?)
    }
}
