//! Core data types shared by the selectors, the camera screen and the device layer.

use crate::errors::CameraError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

/// Platform the crate was compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Android,
    Ios,
    Windows,
    MacOS,
    Linux,
    Unknown,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Unknown => "unknown",
        }
    }
}

/// Aspect ratio as reported by the device, e.g. `"4:3"`.
///
/// The label is kept verbatim so the value handed back to the camera backend is
/// exactly the string it reported. Equality compares labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
    pub label: String,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            label: format!("{}:{}", width, height),
        }
    }

    /// Numeric value `width / height`
    pub fn value(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }
}

impl PartialEq for AspectRatio {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for AspectRatio {}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

impl FromStr for AspectRatio {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CameraError::InvalidRatioFormat(s.to_string());
        let (w, h) = s.split_once(':').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if height == 0 {
            return Err(invalid());
        }
        Ok(Self {
            width,
            height,
            label: s.to_string(),
        })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Which dimension the resolution selector measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionAxis {
    /// The second field of `"WxH"`
    #[default]
    Height,
    /// The longer side, i.e. the portrait height of a landscape-reported sensor size
    LongEdge,
}

/// Photo resolution in pixels, e.g. `"2560x1920"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn measure(&self, axis: ResolutionAxis) -> u32 {
        match axis {
            ResolutionAxis::Height => self.height,
            ResolutionAxis::LongEdge => self.width.max(self.height),
        }
    }
}

impl FromStr for Resolution {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CameraError::InvalidResolutionFormat(s.to_string());
        let (w, h) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which physical camera is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    #[default]
    Back,
    Front,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraFacing::Back => "back",
            CameraFacing::Front => "front",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashMode {
    #[default]
    Off,
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }
}

/// Options recognized by a device capture call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Return the sensor output as-is, skipping orientation and EXIF processing
    pub skip_processing: bool,
    /// Encoder quality, 0.0-1.0
    pub quality: f32,
    pub flash: FlashMode,
    /// Requested picture size; `None` lets the device choose
    pub resolution: Option<Resolution>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            skip_processing: true,
            quality: 1.0,
            flash: FlashMode::Off,
            resolution: None,
        }
    }
}

impl CaptureOptions {
    pub fn with_resolution(mut self, resolution: Option<Resolution>) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_flash(mut self, flash: FlashMode) -> Self {
        self.flash = flash;
        self
    }

    /// Quality mapped onto the 1-100 JPEG scale
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
    }
}

/// Reference to a captured image held by the camera screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPhoto {
    pub id: Uuid,
    pub uri: PathBuf,
    pub width: u32,
    pub height: u32,
    pub facing: CameraFacing,
    pub captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    pub fn new(uri: impl Into<PathBuf>, width: u32, height: u32, facing: CameraFacing) -> Self {
        Self {
            id: Uuid::new_v4(),
            uri: uri.into(),
            width,
            height,
            facing,
            captured_at: Utc::now(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

/// Which overlay the camera screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    #[default]
    Previewing,
    Reviewing,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Previewing => write!(f, "previewing"),
            CaptureState::Reviewing => write!(f, "reviewing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_parse_keeps_label() {
        let ratio: AspectRatio = " 4:3".parse().unwrap();
        assert_eq!(ratio.width, 4);
        assert_eq!(ratio.height, 3);
        assert_eq!(ratio.as_str(), " 4:3");
    }

    #[test]
    fn ratio_rejects_zero_height() {
        assert!(matches!(
            "4:0".parse::<AspectRatio>(),
            Err(CameraError::InvalidRatioFormat(_))
        ));
        assert!("43".parse::<AspectRatio>().is_err());
        assert!("a:b".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn resolution_measure_axes() {
        let res: Resolution = "1920x1440".parse().unwrap();
        assert_eq!(res.measure(ResolutionAxis::Height), 1440);
        assert_eq!(res.measure(ResolutionAxis::LongEdge), 1920);
        assert_eq!(res.to_string(), "1920x1440");
    }

    #[test]
    fn jpeg_quality_is_clamped() {
        let mut options = CaptureOptions::default();
        assert_eq!(options.jpeg_quality(), 100);
        options.quality = 0.0;
        assert_eq!(options.jpeg_quality(), 1);
        options.quality = 7.0;
        assert_eq!(options.jpeg_quality(), 100);
    }
}
