#[cfg(test)]
mod screen_state_tests {
    use crabshot::commands::ScreenState;
    use crabshot::testing::{CaptureScript, SyntheticCamera};
    use crabshot::{CameraDevice, CaptureState, CrabshotConfig, FlashMode, PermissionGate};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn state_with(dir: &TempDir, camera: SyntheticCamera) -> ScreenState {
        let mut config = CrabshotConfig::default();
        config.storage.capture_directory = dir.path().join("pending").to_string_lossy().into_owned();
        config.storage.output_directory = dir.path().join("confirmed").to_string_lossy().into_owned();
        config.storage.auto_organize_by_date = false;

        let device: Box<dyn CameraDevice> = Box::new(camera);
        ScreenState::new(device, config, dir.path().join("crabshot.toml"))
    }

    #[tokio::test]
    async fn test_full_command_flow() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")));

        let initial = state.snapshot().await;
        assert!(initial.loading);
        assert!(!initial.shutter_enabled);

        let ready = state.prepare().await.unwrap();
        assert_eq!(ready.ratio, "4:3");
        assert_eq!(ready.resolution.as_deref(), Some("2560x1920"));
        assert_eq!(ready.permission, PermissionGate::Ready);
        assert!(ready.shutter_enabled);

        let reviewing = state.take_picture().await.unwrap();
        assert_eq!(reviewing.state, CaptureState::Reviewing);
        let pending = reviewing.photo.unwrap().uri;
        assert!(pending.exists());

        let confirmed = state.confirm().await.unwrap();
        assert!(!pending.exists());
        assert_eq!(confirmed.screen.state, CaptureState::Previewing);
        assert!(confirmed.screen.photo.is_none());
        let stored_at = confirmed.stored_at.unwrap();
        assert_eq!(stored_at.parent().unwrap(), dir.path().join("confirmed"));
        assert!(stored_at.exists());
    }

    #[tokio::test]
    async fn test_retake_and_toggles() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")));
        state.prepare().await.unwrap();

        let flashed = state.toggle_flash().await.unwrap();
        assert_eq!(flashed.flash, FlashMode::On);

        state.take_picture().await.unwrap();
        let previewing = state.retake().await.unwrap();
        assert_eq!(previewing.state, CaptureState::Previewing);
        assert!(previewing.photo.is_none());

        let front = state.toggle_facing().await.unwrap();
        assert!(front.loading);
        assert!(front.resolution.is_none());

        let ready = state.prepare().await.unwrap();
        assert_eq!(ready.resolution.as_deref(), Some("1600x1200"));
    }

    #[tokio::test]
    async fn test_failed_capture_reports_error() {
        let dir = TempDir::new().unwrap();
        let camera = SyntheticCamera::new(dir.path().join("pending"))
            .with_script([CaptureScript::Fail("no frame".to_string())]);
        let state = state_with(&dir, camera);
        state.prepare().await.unwrap();

        let error = state.take_picture().await.unwrap_err();
        assert!(error.to_string().contains("no frame"));
        assert_eq!(state.snapshot().await.state, CaptureState::Previewing);
    }

    #[tokio::test]
    async fn test_confirm_without_photo_is_rejected() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")));
        state.prepare().await.unwrap();

        assert!(state.confirm().await.is_err());
        assert!(state.retake().await.is_err());
    }

    #[tokio::test]
    async fn test_layout_uses_screen_ratio() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")));
        state.prepare().await.unwrap();

        let layout = state.layout(300.0, 800.0).await;
        assert!((layout.preview_height - 400.0).abs() < 1e-9);
        assert!((layout.overlay_top - 200.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_config_persists() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")));

        let mut config = state.config().await;
        config.capture.timeout_ms = 3_000;
        state.update_config(config.clone()).await.unwrap();

        assert_eq!(state.config().await.capture.timeout_ms, 3_000);
        let saved = CrabshotConfig::load_from_file(dir.path().join("crabshot.toml")).unwrap();
        assert_eq!(saved, config);

        let mut invalid = config.clone();
        invalid.capture.quality = 2.0;
        assert!(state.update_config(invalid).await.is_err());
        assert_eq!(state.config().await, config);

        let defaults = state.reset_config().await.unwrap();
        assert_eq!(defaults, CrabshotConfig::default());
        assert_eq!(state.config().await, CrabshotConfig::default());
    }

    #[tokio::test]
    async fn test_commands_serialize_concurrent_callers() {
        let dir = TempDir::new().unwrap();
        let state = Arc::new(state_with(&dir, SyntheticCamera::new(dir.path().join("pending"))));
        state.prepare().await.unwrap();

        // Two shutter presses race; exactly one can win
        let (first, second) = tokio::join!(state.take_picture(), state.take_picture());
        assert!(first.is_ok() != second.is_ok());
        assert_eq!(state.snapshot().await.state, CaptureState::Reviewing);
    }

    #[tokio::test]
    async fn test_permission_commands() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")));

        assert_eq!(state.check_permission().await.unwrap(), PermissionGate::Ready);
        assert_eq!(state.request_permission().await.unwrap(), PermissionGate::Ready);
    }

    #[tokio::test]
    async fn test_snapshot_json_shape() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")));
        state.prepare().await.unwrap();

        let json = serde_json::to_value(state.snapshot().await).unwrap();
        assert_eq!(json["state"], "previewing");
        assert_eq!(json["facing"], "back");
        assert_eq!(json["flash"], "off");
        assert_eq!(json["ratio"], "4:3");
        assert_eq!(json["permission"]["kind"], "ready");
        assert!(json["photo"].is_null());
    }

    #[tokio::test]
    async fn test_device_settings_rebuild_device() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")))
            .with_device_factory(|config| -> Box<dyn CameraDevice> {
                Box::new(SyntheticCamera::new(&config.storage.capture_directory))
            });
        state.prepare().await.unwrap();

        let moved = dir.path().join("moved");
        let mut config = state.config().await;
        config.storage.capture_directory = moved.to_string_lossy().into_owned();
        state.update_config(config).await.unwrap();

        let snapshot = state.snapshot().await;
        assert!(snapshot.loading);
        assert_eq!(snapshot.permission, PermissionGate::Loading);

        state.prepare().await.unwrap();
        let reviewing = state.take_picture().await.unwrap();
        assert_eq!(reviewing.photo.unwrap().uri.parent().unwrap(), moved);
    }

    #[tokio::test]
    async fn test_device_settings_rejected_while_reviewing() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, SyntheticCamera::new(dir.path().join("pending")))
            .with_device_factory(|config| -> Box<dyn CameraDevice> {
                Box::new(SyntheticCamera::new(&config.storage.capture_directory))
            });
        state.prepare().await.unwrap();
        state.take_picture().await.unwrap();

        let before = state.config().await;
        let mut config = before.clone();
        config.camera.front_device = 7;
        assert!(state.update_config(config).await.is_err());
        assert_eq!(state.config().await, before);
        assert!(!dir.path().join("crabshot.toml").exists());
    }
}
