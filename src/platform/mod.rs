//! Native camera backend

pub mod native;

pub use native::NativeCamera;

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeDeviceInfo {
    pub index: String,
    pub name: String,
    pub description: String,
}

/// List cameras visible to the platform capture API
pub fn list_cameras() -> Result<Vec<NativeDeviceInfo>, CameraError> {
    let cameras = nokhwa::query(nokhwa::utils::ApiBackend::Auto)
        .map_err(|e| CameraError::InitializationError(format!("Failed to query cameras: {}", e)))?;

    Ok(cameras
        .into_iter()
        .map(|info| NativeDeviceInfo {
            index: info.index().to_string(),
            name: info.human_name(),
            description: info.description().to_string(),
        })
        .collect())
}
