#[cfg(test)]
mod error_tests {
    use crabshot::errors::CameraError;
    use crabshot::{AspectRatio, CaptureState, Resolution};
    use std::error::Error;

    #[test]
    fn test_camera_error_initialization() {
        let error = CameraError::InitializationError("Test init error".to_string());
        assert!(error.to_string().contains("Camera initialization error"));
        assert!(error.to_string().contains("Test init error"));
    }

    #[test]
    fn test_camera_error_permission_denied() {
        let error = CameraError::PermissionDenied("Access denied".to_string());
        assert!(error.to_string().contains("Permission denied"));
        assert!(error.to_string().contains("Access denied"));
        assert!(error.is_permission());
    }

    #[test]
    fn test_camera_error_display_trait() {
        let error = CameraError::CaptureFailed("Display test".to_string());
        assert_eq!(format!("{}", error), "Capture error: Display test");
        assert!(!error.is_permission());
    }

    #[test]
    fn test_capture_timeout_display() {
        let error = CameraError::CaptureTimeout(10_000);
        assert_eq!(error.to_string(), "Capture timed out after 10000ms");
    }

    #[test]
    fn test_invalid_transition_names_action_and_state() {
        let error = CameraError::invalid_transition("retake", CaptureState::Previewing);
        assert_eq!(error.to_string(), "Cannot retake while previewing");

        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("InvalidStateTransition"));
    }

    #[test]
    fn test_parse_errors_quote_input() {
        let error = "16/9".parse::<AspectRatio>().unwrap_err();
        assert!(matches!(error, CameraError::InvalidRatioFormat(ref s) if s == "16/9"));
        assert_eq!(error.to_string(), "Invalid ratio format: \"16/9\"");

        let error = "0x1080".parse::<Resolution>().unwrap_err();
        assert!(matches!(error, CameraError::InvalidResolutionFormat(_)));
    }

    #[test]
    fn test_camera_error_implements_error_trait() {
        let error = CameraError::StorageError("Error trait test".to_string());
        let _error_trait: &dyn Error = &error;
        assert!(error.source().is_none());
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors = vec![
            CameraError::InitializationError("init".to_string()),
            CameraError::PermissionDenied("permission".to_string()),
            CameraError::CaptureFailed("capture".to_string()),
            CameraError::CaptureTimeout(1),
            CameraError::DeviceBusy("busy".to_string()),
            CameraError::InvalidRatioFormat("ratio".to_string()),
            CameraError::InvalidResolutionFormat("size".to_string()),
            CameraError::invalid_transition("confirm", "previewing"),
            CameraError::ConfigError("config".to_string()),
            CameraError::StorageError("storage".to_string()),
        ];

        for error in &errors {
            assert!(!error.to_string().is_empty());
        }
        assert_eq!(errors.len(), 10);
    }

    #[test]
    fn test_error_in_result() {
        fn failing() -> Result<(), CameraError> {
            Err(CameraError::ConfigError("bad timeout".to_string()))
        }

        match failing() {
            Err(CameraError::ConfigError(msg)) => assert_eq!(msg, "bad timeout"),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }
}
