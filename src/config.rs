//! Configuration management for crabshot
//!
//! Defaults live in code. A TOML file and `CRABSHOT__<SECTION>__<KEY>`
//! environment variables are layered on top of them, in that order.

use crate::errors::CameraError;
use crate::selection::{RatioSelector, ResolutionSelector};
use crate::types::{AspectRatio, CameraFacing, CaptureOptions, FlashMode, ResolutionAxis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrabshotConfig {
    pub camera: CameraConfig,
    pub capture: CaptureConfig,
    pub storage: StorageConfig,
}

/// Ratio/resolution selection and device mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Ratio used when the device reports none, e.g. "4:3"
    pub default_ratio: String,
    /// Ratio the selector aims for [width, height]
    pub target_ratio: [u32; 2],
    /// Picture height the resolution selector aims for
    pub target_height: u32,
    pub resolution_axis: ResolutionAxis,
    pub default_facing: CameraFacing,
    /// Native device index used for the back camera
    pub back_device: u32,
    /// Native device index used for the front camera
    pub front_device: u32,
}

/// Shutter behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub skip_processing: bool,
    /// Encoder quality (0.0-1.0)
    pub quality: f32,
    /// Upper bound on a single capture call in milliseconds
    pub timeout_ms: u64,
    pub default_flash: FlashMode,
}

/// Where pending and confirmed photos go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory the device writes pending (unconfirmed) captures to
    pub capture_directory: String,
    /// Directory confirmed photos are filed into
    pub output_directory: String,
    /// Auto-organize confirmed photos by date
    pub auto_organize_by_date: bool,
    /// chrono format string for the date sub-directory
    pub date_format: String,
}

impl Default for CrabshotConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                default_ratio: "4:3".to_string(),
                target_ratio: [4, 3],
                target_height: 1920,
                resolution_axis: ResolutionAxis::Height,
                default_facing: CameraFacing::Back,
                back_device: 0,
                front_device: 1,
            },
            capture: CaptureConfig {
                skip_processing: true,
                quality: 1.0,
                timeout_ms: 10_000,
                default_flash: FlashMode::Off,
            },
            storage: StorageConfig {
                capture_directory: std::env::temp_dir()
                    .join("crabshot")
                    .to_string_lossy()
                    .into_owned(),
                output_directory: "./captures".to_string(),
                auto_organize_by_date: true,
                date_format: "%Y-%m-%d".to_string(),
            },
        }
    }
}

impl CrabshotConfig {
    /// Load configuration from a TOML file, with environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
        }

        let defaults = ::config::Config::try_from(&Self::default())
            .map_err(|e| CameraError::ConfigError(format!("Failed to seed defaults: {}", e)))?;

        let layered = ::config::Config::builder()
            .add_source(defaults)
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix("CRABSHOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CameraError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: CrabshotConfig = layered
            .try_deserialize()
            .map_err(|e| CameraError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate().map_err(CameraError::ConfigError)?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CameraError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CameraError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| CameraError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| CameraError::ConfigError(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("crabshot.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        self.camera
            .default_ratio
            .parse::<AspectRatio>()
            .map_err(|e| format!("Invalid default ratio: {}", e))?;
        if self.camera.target_ratio[0] == 0 || self.camera.target_ratio[1] == 0 {
            return Err("Invalid target ratio".to_string());
        }
        if self.camera.target_height == 0 {
            return Err("Target height must be positive".to_string());
        }
        if self.camera.back_device == self.camera.front_device {
            return Err("Back and front cameras must use different devices".to_string());
        }

        if !(0.0..=1.0).contains(&self.capture.quality) {
            return Err("Capture quality must be between 0.0 and 1.0".to_string());
        }
        if self.capture.timeout_ms == 0 || self.capture.timeout_ms > 120_000 {
            return Err("Capture timeout must be 1-120000 ms".to_string());
        }

        if self.storage.output_directory.is_empty() {
            return Err("Output directory cannot be empty".to_string());
        }
        if self.storage.capture_directory.is_empty() {
            return Err("Capture directory cannot be empty".to_string());
        }
        if self.storage.date_format.is_empty() {
            return Err("Date format cannot be empty".to_string());
        }

        Ok(())
    }

    pub fn default_ratio(&self) -> AspectRatio {
        self.camera.default_ratio.parse().unwrap_or_default()
    }

    pub fn ratio_selector(&self) -> RatioSelector {
        RatioSelector::new(self.camera.target_ratio[0], self.camera.target_ratio[1])
    }

    pub fn resolution_selector(&self) -> ResolutionSelector {
        ResolutionSelector::new(self.camera.target_height, self.camera.resolution_axis)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture.timeout_ms)
    }

    /// Capture options before a resolution has been selected
    pub fn base_capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            skip_processing: self.capture.skip_processing,
            quality: self.capture.quality,
            flash: self.capture.default_flash,
            resolution: None,
        }
    }
}
