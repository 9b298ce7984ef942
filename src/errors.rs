use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Camera initialization error: {0}")]
    InitializationError(String),
    #[error("Permission denied error: {0}")]
    PermissionDenied(String),
    #[error("Capture error: {0}")]
    CaptureFailed(String),
    #[error("Capture timed out after {0}ms")]
    CaptureTimeout(u64),
    #[error("Camera busy: {0}")]
    DeviceBusy(String),
    #[error("Invalid ratio format: {0:?}")]
    InvalidRatioFormat(String),
    #[error("Invalid resolution format: {0:?}")]
    InvalidResolutionFormat(String),
    #[error("Cannot {action} while {state}")]
    InvalidStateTransition { action: &'static str, state: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl CameraError {
    pub fn invalid_transition(action: &'static str, state: impl std::fmt::Display) -> Self {
        CameraError::InvalidStateTransition {
            action,
            state: state.to_string(),
        }
    }

    /// Whether the UI should show a blocking permission prompt for this error.
    pub fn is_permission(&self) -> bool {
        matches!(self, CameraError::PermissionDenied(_))
    }
}
