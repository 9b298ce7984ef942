//! Plugin-managed screen state shared by the Tauri commands

use crate::config::CrabshotConfig;
use crate::consumer::DirectoryConsumer;
use crate::device::CameraDevice;
use crate::errors::CameraError;
use crate::layout::PreviewLayout;
use crate::permissions::PermissionGate;
use crate::screen::{CameraScreen, ScreenSnapshot};
use crate::types::CapturedPhoto;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;

pub type DynScreen = CameraScreen<Box<dyn CameraDevice>>;

/// Builds the camera device for a configuration
pub type DeviceFactory = Box<dyn Fn(&CrabshotConfig) -> Box<dyn CameraDevice> + Send + Sync>;

/// Result of confirming a photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedPhoto {
    pub photo: CapturedPhoto,
    pub stored_at: Option<PathBuf>,
    pub screen: ScreenSnapshot,
}

/// The camera screen owned by the plugin.
///
/// The mutex serializes commands: an in-flight capture holds it until the
/// device answers or the capture times out.
pub struct ScreenState {
    screen: Mutex<DynScreen>,
    config_path: PathBuf,
    device_factory: Option<DeviceFactory>,
}

impl ScreenState {
    pub fn new(device: Box<dyn CameraDevice>, config: CrabshotConfig, config_path: PathBuf) -> Self {
        Self {
            screen: Mutex::new(CameraScreen::new(device, config)),
            config_path,
            device_factory: None,
        }
    }

    /// Rebuild the device with `factory` when a config update changes the
    /// device indices or the capture directory
    pub fn with_device_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&CrabshotConfig) -> Box<dyn CameraDevice> + Send + Sync + 'static,
    {
        self.device_factory = Some(Box::new(factory));
        self
    }

    pub async fn snapshot(&self) -> ScreenSnapshot {
        self.screen.lock().await.snapshot()
    }

    pub async fn prepare(&self) -> Result<ScreenSnapshot, CameraError> {
        let mut screen = self.screen.lock().await;
        screen.prepare().await?;
        Ok(screen.snapshot())
    }

    pub async fn take_picture(&self) -> Result<ScreenSnapshot, CameraError> {
        let mut screen = self.screen.lock().await;
        screen.capture().await?;
        Ok(screen.snapshot())
    }

    pub async fn retake(&self) -> Result<ScreenSnapshot, CameraError> {
        let mut screen = self.screen.lock().await;
        screen.retake()?;
        Ok(screen.snapshot())
    }

    /// Files the photo under the configured output directory
    pub async fn confirm(&self) -> Result<ConfirmedPhoto, CameraError> {
        let mut screen = self.screen.lock().await;
        let mut consumer = DirectoryConsumer::from_config(&screen.config().storage);
        let photo = screen.confirm(&mut consumer)?;
        Ok(ConfirmedPhoto {
            photo,
            stored_at: consumer.last_stored().map(PathBuf::from),
            screen: screen.snapshot(),
        })
    }

    pub async fn toggle_facing(&self) -> Result<ScreenSnapshot, CameraError> {
        let mut screen = self.screen.lock().await;
        screen.toggle_facing()?;
        Ok(screen.snapshot())
    }

    pub async fn toggle_flash(&self) -> Result<ScreenSnapshot, CameraError> {
        let mut screen = self.screen.lock().await;
        screen.toggle_flash()?;
        Ok(screen.snapshot())
    }

    pub async fn layout(&self, screen_width: f64, screen_height: f64) -> PreviewLayout {
        self.screen.lock().await.layout(screen_width, screen_height)
    }

    pub async fn check_permission(&self) -> Result<PermissionGate, CameraError> {
        self.screen.lock().await.refresh_permission()
    }

    pub async fn request_permission(&self) -> Result<PermissionGate, CameraError> {
        self.screen.lock().await.request_permission()
    }

    pub async fn config(&self) -> CrabshotConfig {
        self.screen.lock().await.config().clone()
    }

    /// Validate, persist and apply a new configuration.
    ///
    /// Device settings take effect immediately when a device factory is set.
    /// Without one they apply on the next start.
    pub async fn update_config(&self, config: CrabshotConfig) -> Result<(), CameraError> {
        config.validate().map_err(CameraError::ConfigError)?;

        let mut screen = self.screen.lock().await;
        if device_settings_changed(screen.config(), &config) {
            match &self.device_factory {
                Some(factory) => screen.replace_device(factory(&config)).await?,
                None => log::warn!("Camera device settings change applies after restart"),
            }
        }

        config.save_to_file(&self.config_path)?;
        screen.set_config(config);
        Ok(())
    }

    pub async fn reset_config(&self) -> Result<CrabshotConfig, CameraError> {
        let defaults = CrabshotConfig::default();
        self.update_config(defaults.clone()).await?;
        Ok(defaults)
    }
}

fn device_settings_changed(old: &CrabshotConfig, new: &CrabshotConfig) -> bool {
    old.camera.back_device != new.camera.back_device
        || old.camera.front_device != new.camera.front_device
        || old.storage.capture_directory != new.storage.capture_directory
}
