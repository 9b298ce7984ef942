use crate::config::CrabshotConfig;
use crate::device::CameraDevice;
use crate::errors::CameraError;
use crate::permissions::{check_permission_detailed, PermissionInfo};
use crate::photo::write_pending_jpeg;
use crate::types::{AspectRatio, CameraFacing, CaptureOptions, CapturedPhoto, FlashMode};
use image::RgbImage;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{
        CameraFormat as NativeFormat, CameraIndex, FrameFormat, RequestedFormat,
        RequestedFormatType, Resolution as NativeResolution,
    },
    Camera,
};
use std::path::PathBuf;

/// Frames dropped after opening the stream so auto exposure can settle
const WARMUP_FRAMES: usize = 3;

/// Camera backed by the platform capture API through nokhwa.
///
/// The device is opened per call rather than held, which keeps this type
/// `Send` and releases the camera while the screen is reviewing a photo.
pub struct NativeCamera {
    back_index: u32,
    front_index: u32,
    facing: CameraFacing,
    capture_dir: PathBuf,
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn reduced(width: u32, height: u32) -> (u32, u32) {
    let divisor = gcd(width, height).max(1);
    (width / divisor, height / divisor)
}

impl NativeCamera {
    pub fn new(config: &CrabshotConfig) -> Self {
        Self {
            back_index: config.camera.back_device,
            front_index: config.camera.front_device,
            facing: config.camera.default_facing,
            capture_dir: PathBuf::from(&config.storage.capture_directory),
        }
    }

    fn index(&self) -> u32 {
        match self.facing {
            CameraFacing::Back => self.back_index,
            CameraFacing::Front => self.front_index,
        }
    }

    fn open(&self, request: RequestedFormatType) -> Result<Camera, CameraError> {
        let format = RequestedFormat::new::<RgbFormat>(request);
        Camera::new(CameraIndex::Index(self.index()), format).map_err(|e| {
            CameraError::InitializationError(format!(
                "Failed to open {} camera (device {}): {}",
                self.facing.as_str(),
                self.index(),
                e
            ))
        })
    }

    fn compatible_sizes(&self) -> Result<Vec<(u32, u32)>, CameraError> {
        let mut camera = self.open(RequestedFormatType::None)?;
        let formats = camera.compatible_camera_formats().map_err(|e| {
            CameraError::InitializationError(format!("Failed to query camera formats: {}", e))
        })?;

        let mut sizes: Vec<(u32, u32)> = Vec::new();
        for format in formats {
            let size = (format.resolution().width(), format.resolution().height());
            if size.0 > 0 && size.1 > 0 && !sizes.contains(&size) {
                sizes.push(size);
            }
        }
        Ok(sizes)
    }
}

impl CameraDevice for NativeCamera {
    fn list_supported_ratios(&mut self) -> Result<Vec<String>, CameraError> {
        let mut ratios: Vec<String> = Vec::new();
        for (w, h) in self.compatible_sizes()? {
            let (rw, rh) = reduced(w, h);
            let label = format!("{}:{}", rw, rh);
            if !ratios.contains(&label) {
                ratios.push(label);
            }
        }
        Ok(ratios)
    }

    fn list_available_resolutions(&mut self, ratio: &str) -> Result<Vec<String>, CameraError> {
        let ratio: AspectRatio = ratio.parse()?;
        let wanted = reduced(ratio.width, ratio.height);
        Ok(self
            .compatible_sizes()?
            .into_iter()
            .filter(|&(w, h)| reduced(w, h) == wanted)
            .map(|(w, h)| format!("{}x{}", w, h))
            .collect())
    }

    fn capture(&mut self, options: &CaptureOptions) -> Result<CapturedPhoto, CameraError> {
        if options.flash == FlashMode::On {
            log::debug!("Flash is not supported by the native backend, ignoring");
        }

        let request = match options.resolution {
            Some(res) => RequestedFormatType::Closest(NativeFormat::new(
                NativeResolution::new(res.width, res.height),
                FrameFormat::MJPEG,
                30,
            )),
            None => RequestedFormatType::AbsoluteHighestResolution,
        };

        let mut camera = self.open(request)?;
        camera
            .open_stream()
            .map_err(|e| CameraError::CaptureFailed(format!("Failed to start stream: {}", e)))?;

        for _ in 0..WARMUP_FRAMES {
            if let Err(e) = camera.frame() {
                log::debug!("Warmup frame dropped: {}", e);
            }
        }

        let buffer = camera
            .frame()
            .map_err(|e| CameraError::CaptureFailed(format!("Failed to capture frame: {}", e)));
        if let Err(e) = camera.stop_stream() {
            log::warn!("Failed to stop camera stream: {}", e);
        }

        let decoded = buffer?
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(format!("Failed to decode frame: {}", e)))?;
        let (width, height) = (decoded.width(), decoded.height());
        let image = RgbImage::from_raw(width, height, decoded.into_raw()).ok_or_else(|| {
            CameraError::CaptureFailed("Decoded frame has an unexpected size".to_string())
        })?;

        write_pending_jpeg(&image, &self.capture_dir, self.facing, options)
    }

    fn set_facing(&mut self, facing: CameraFacing) -> Result<(), CameraError> {
        self.facing = facing;
        Ok(())
    }

    fn permission(&self) -> PermissionInfo {
        check_permission_detailed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_common_sizes() {
        assert_eq!(reduced(1920, 1080), (16, 9));
        assert_eq!(reduced(640, 480), (4, 3));
        assert_eq!(reduced(1440, 1440), (1, 1));
    }

    #[test]
    fn facing_selects_device_index() {
        let config = CrabshotConfig::default();
        let mut camera = NativeCamera::new(&config);
        assert_eq!(camera.index(), 0);
        camera.set_facing(CameraFacing::Front).unwrap();
        assert_eq!(camera.index(), 1);
    }
}
