use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub mod defaults;

use defaults::*;

use crate::errors::{AvatarError, AvatarResult};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AvatarConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
}

/// In-memory cache sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Capacity of the request→content LRU
    #[serde(default = "default_request_cache_capacity")]
    pub request_cache_capacity: usize,
    /// Capacity of the content→image memory LRU
    #[serde(default = "default_image_cache_capacity")]
    pub image_cache_capacity: usize,
    /// Largest bitmap side (pixels) kept in memory
    #[serde(default = "default_max_memory_side")]
    pub max_memory_side: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_blob_directory")]
    pub blob_directory: PathBuf,
    #[serde(default = "default_ledger_file")]
    pub ledger_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Avatar diameter in points, before the display scale is applied
    #[serde(default = "default_diameter_points")]
    pub diameter_points: f32,
    #[serde(default = "default_display_scale")]
    pub display_scale: f32,
    #[serde(default = "default_theme")]
    pub default_theme: String,
}

fn default_request_cache_capacity() -> usize { DEFAULT_REQUEST_CACHE_CAPACITY }
fn default_image_cache_capacity() -> usize { DEFAULT_IMAGE_CACHE_CAPACITY }
fn default_max_memory_side() -> u32 { DEFAULT_MAX_MEMORY_SIDE }
fn default_blob_directory() -> PathBuf { PathBuf::from(DEFAULT_BLOB_DIRECTORY) }
fn default_ledger_file() -> PathBuf { PathBuf::from(DEFAULT_LEDGER_FILE) }
fn default_diameter_points() -> f32 { DEFAULT_DIAMETER_POINTS }
fn default_display_scale() -> f32 { DEFAULT_DISPLAY_SCALE }
fn default_theme() -> String { DEFAULT_THEME.to_string() }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            request_cache_capacity: default_request_cache_capacity(),
            image_cache_capacity: default_image_cache_capacity(),
            max_memory_side: default_max_memory_side(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            blob_directory: default_blob_directory(),
            ledger_file: default_ledger_file(),
        }
    }
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            diameter_points: default_diameter_points(),
            display_scale: default_display_scale(),
            default_theme: default_theme(),
        }
    }
}

impl AvatarConfig {
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> Result<Self> {
        let config_file = config_file.as_ref();
        if config_file.exists() {
            let contents = std::fs::read_to_string(config_file)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            if let Some(parent) = config_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file.display());
            Ok(default_config)
        }
    }

    pub fn validate(&self) -> AvatarResult<()> {
        if self.cache.request_cache_capacity == 0 {
            return Err(AvatarError::configuration(
                "cache.request_cache_capacity must be greater than zero",
            ));
        }
        if self.cache.image_cache_capacity == 0 {
            return Err(AvatarError::configuration(
                "cache.image_cache_capacity must be greater than zero",
            ));
        }
        if self.rendering.display_scale.is_nan() || self.rendering.display_scale <= 0.0 {
            return Err(AvatarError::configuration(
                "rendering.display_scale must be greater than zero",
            ));
        }
        if self.rendering.diameter_points.is_nan() || self.rendering.diameter_points <= 0.0 {
            return Err(AvatarError::configuration(
                "rendering.diameter_points must be greater than zero",
            ));
        }
        Ok(())
    }
}
