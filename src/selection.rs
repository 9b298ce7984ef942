//! Ratio and picture-size selection from device-reported capability lists
//!
//! Phone sensors are usually 4:3, so the ratio selector aims for the reported
//! ratio closest to that. The resolution selector aims for a portrait height of
//! 1920px (a 1080x1920 story frame): the smallest size that still reaches it,
//! which keeps photo files small without upscaling.

use crate::errors::CameraError;
use crate::types::{AspectRatio, Resolution, ResolutionAxis};

pub const TARGET_RATIO: (u32, u32) = (4, 3);
pub const TARGET_HEIGHT: u32 = 1920;

/// Picks the supported ratio closest to a target ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSelector {
    target: f64,
}

impl Default for RatioSelector {
    fn default() -> Self {
        Self::new(TARGET_RATIO.0, TARGET_RATIO.1)
    }
}

impl RatioSelector {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: width as f64 / height.max(1) as f64,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Fails on the first malformed ratio string.
    ///
    /// Ties go to the earliest candidate: a later ratio replaces the current best
    /// only on a strictly smaller difference.
    pub fn select<S: AsRef<str>>(&self, available: &[S]) -> Result<Option<AspectRatio>, CameraError> {
        let mut best: Option<(AspectRatio, f64)> = None;
        for candidate in available {
            let ratio: AspectRatio = candidate.as_ref().parse()?;
            self.consider(&mut best, ratio);
        }
        Ok(best.map(|(ratio, _)| ratio))
    }

    /// Like [`select`](Self::select) but skips malformed entries.
    pub fn select_lenient<S: AsRef<str>>(&self, available: &[S]) -> Option<AspectRatio> {
        let mut best: Option<(AspectRatio, f64)> = None;
        for candidate in available {
            match candidate.as_ref().parse::<AspectRatio>() {
                Ok(ratio) => self.consider(&mut best, ratio),
                Err(e) => log::warn!("Skipping ratio candidate: {}", e),
            }
        }
        best.map(|(ratio, _)| ratio)
    }

    fn consider(&self, best: &mut Option<(AspectRatio, f64)>, ratio: AspectRatio) {
        let diff = (ratio.value() - self.target).abs();
        match best {
            Some((_, best_diff)) if diff >= *best_diff => {}
            _ => *best = Some((ratio, diff)),
        }
    }
}

/// Picks the smallest picture size reaching a target height, else the largest one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionSelector {
    target_height: u32,
    axis: ResolutionAxis,
}

impl Default for ResolutionSelector {
    fn default() -> Self {
        Self::new(TARGET_HEIGHT, ResolutionAxis::Height)
    }
}

impl ResolutionSelector {
    pub fn new(target_height: u32, axis: ResolutionAxis) -> Self {
        Self {
            target_height,
            axis,
        }
    }

    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    pub fn axis(&self) -> ResolutionAxis {
        self.axis
    }

    pub fn select<S: AsRef<str>>(&self, available: &[S]) -> Result<Option<Resolution>, CameraError> {
        let parsed = available
            .iter()
            .map(|s| s.as_ref().parse::<Resolution>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.pick(&parsed))
    }

    pub fn select_lenient<S: AsRef<str>>(&self, available: &[S]) -> Option<Resolution> {
        let parsed: Vec<Resolution> = available
            .iter()
            .filter_map(|s| match s.as_ref().parse::<Resolution>() {
                Ok(res) => Some(res),
                Err(e) => {
                    log::warn!("Skipping resolution candidate: {}", e);
                    None
                }
            })
            .collect();
        self.pick(&parsed)
    }

    /// Selection over already-parsed sizes. Ties keep the earliest entry.
    pub fn pick(&self, available: &[Resolution]) -> Option<Resolution> {
        let mut at_or_above: Option<Resolution> = None;
        let mut largest: Option<Resolution> = None;

        for &res in available {
            let measured = res.measure(self.axis);
            if measured >= self.target_height
                && at_or_above.map_or(true, |best| measured < best.measure(self.axis))
            {
                at_or_above = Some(res);
            }
            if largest.map_or(true, |best| measured > best.measure(self.axis)) {
                largest = Some(res);
            }
        }

        at_or_above.or(largest)
    }
}

/// Ratio closest to 4:3, or `None` for an empty list
pub fn select_ratio<S: AsRef<str>>(available: &[S]) -> Result<Option<AspectRatio>, CameraError> {
    RatioSelector::default().select(available)
}

/// Smallest resolution with height >= 1920, else the tallest, or `None` for an empty list
pub fn select_resolution<S: AsRef<str>>(
    available: &[S],
) -> Result<Option<Resolution>, CameraError> {
    ResolutionSelector::default().select(available)
}
