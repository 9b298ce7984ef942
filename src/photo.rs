//! Writing pending captures to disk

use crate::errors::CameraError;
use crate::types::{CameraFacing, CaptureOptions, CapturedPhoto};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use uuid::Uuid;

/// Encode `image` as JPEG into `dir` and return a reference to it.
pub fn write_pending_jpeg(
    image: &RgbImage,
    dir: &Path,
    facing: CameraFacing,
    options: &CaptureOptions,
) -> Result<CapturedPhoto, CameraError> {
    fs::create_dir_all(dir).map_err(|e| {
        CameraError::StorageError(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let path = dir.join(format!("pending_{}.jpg", Uuid::new_v4().simple()));
    let file = File::create(&path).map_err(|e| {
        CameraError::StorageError(format!("Failed to create {}: {}", path.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, options.jpeg_quality())
        .encode_image(image)
        .map_err(|e| CameraError::CaptureFailed(format!("Failed to encode JPEG: {}", e)))?;
    writer.flush().map_err(|e| {
        CameraError::StorageError(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(CapturedPhoto::new(path, image.width(), image.height(), facing))
}
