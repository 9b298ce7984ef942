use crate::errors::CameraError;
use crate::permissions::PermissionInfo;
use crate::types::{CameraFacing, CaptureOptions, CapturedPhoto};

/// Camera backend driven by [`CameraScreen`](crate::screen::CameraScreen).
///
/// Calls are blocking; the screen moves captures onto the tokio blocking pool.
pub trait CameraDevice: Send {
    /// Aspect ratios the active camera supports, as `"W:H"` strings
    fn list_supported_ratios(&mut self) -> Result<Vec<String>, CameraError>;

    /// Picture sizes available for `ratio`, as `"WxH"` strings
    fn list_available_resolutions(&mut self, ratio: &str) -> Result<Vec<String>, CameraError>;

    /// Take a picture and return where it was written
    fn capture(&mut self, options: &CaptureOptions) -> Result<CapturedPhoto, CameraError>;

    /// Switch the active physical camera
    fn set_facing(&mut self, facing: CameraFacing) -> Result<(), CameraError>;

    fn permission(&self) -> PermissionInfo;

    /// Ask the platform for camera access. Backends without a prompt return the
    /// current status.
    fn request_permission(&mut self) -> PermissionInfo {
        self.permission()
    }
}

impl<D: CameraDevice + ?Sized> CameraDevice for Box<D> {
    fn list_supported_ratios(&mut self) -> Result<Vec<String>, CameraError> {
        (**self).list_supported_ratios()
    }

    fn list_available_resolutions(&mut self, ratio: &str) -> Result<Vec<String>, CameraError> {
        (**self).list_available_resolutions(ratio)
    }

    fn capture(&mut self, options: &CaptureOptions) -> Result<CapturedPhoto, CameraError> {
        (**self).capture(options)
    }

    fn set_facing(&mut self, facing: CameraFacing) -> Result<(), CameraError> {
        (**self).set_facing(facing)
    }

    fn permission(&self) -> PermissionInfo {
        (**self).permission()
    }

    fn request_permission(&mut self) -> PermissionInfo {
        (**self).request_permission()
    }
}
