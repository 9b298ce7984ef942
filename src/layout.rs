//! Preview and review-overlay geometry for a portrait screen.

use crate::types::AspectRatio;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewLayout {
    pub preview_width: f64,
    pub preview_height: f64,
    /// Offset of the review overlay from the top of the screen. Negative when the
    /// preview is taller than the screen.
    pub overlay_top: f64,
}

impl PreviewLayout {
    /// The sensor ratio is landscape (`4:3`), so on a portrait screen the preview
    /// is as wide as the screen and `width * 4/3` tall.
    pub fn compute(screen_width: f64, screen_height: f64, ratio: &AspectRatio) -> Self {
        let preview_width = screen_width;
        let preview_height = screen_width * ratio.value();
        Self {
            preview_width,
            preview_height,
            overlay_top: screen_height / 2.0 - preview_height / 2.0,
        }
    }

    pub fn fits(&self, screen_height: f64) -> bool {
        self.preview_height <= screen_height
    }
}
