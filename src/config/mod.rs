//! Configuration management for Karte

mod keys;

pub use keys::{ReservedKeys, key_name};

use crate::host::TileSource;
use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Execute and navigate-up keys of the keyboard menu
    #[serde(default)]
    pub keys: ReservedKeys,

    /// Pixel distance below which points are clustered
    #[serde(default = "default_cluster_distance")]
    pub cluster_distance: u32,

    /// Relative step of the image scale actions
    #[serde(default = "default_image_scale_step")]
    pub image_scale_step: f64,

    /// Background tile sources offered under `v t`
    #[serde(default = "default_tile_sources")]
    pub tile_sources: Vec<TileSource>,

    /// Directory exported files are written to
    #[serde(default = "paths::default_export_dir")]
    pub export_dir: PathBuf,

    /// File name prefix of exported files
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,

    /// Whether one-shot actions also report a navigation change
    #[serde(default = "default_notify_on_one_shot")]
    pub notify_on_one_shot: bool,

    /// Command string replayed at startup
    #[serde(default)]
    pub autopilot: Option<String>,
}

const fn default_cluster_distance() -> u32 {
    40
}

const fn default_image_scale_step() -> f64 {
    0.1
}

fn default_tile_sources() -> Vec<TileSource> {
    vec![
        TileSource::new(
            "OpenStreetMap",
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        ),
        TileSource::new(
            "ArcGIS World Topo",
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}",
        ),
    ]
}

fn default_export_prefix() -> String {
    "TheKarte".to_string()
}

const fn default_notify_on_one_shot() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keys: ReservedKeys::default(),
            cluster_distance: default_cluster_distance(),
            image_scale_step: default_image_scale_step(),
            tile_sources: default_tile_sources(),
            export_dir: paths::default_export_dir(),
            export_prefix: default_export_prefix(),
            notify_on_one_shot: default_notify_on_one_shot(),
            autopilot: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing the config file fails
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created or the file cannot be written
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn default_path() -> PathBuf {
        paths::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("karte")
            .join("config.json")
    }
}
