//! Capture/review state machine behind the camera screen
//!
//! The screen starts in [`CaptureState::Previewing`] with the shutter disabled
//! until [`CameraScreen::prepare`] has queried the device for its ratio and
//! picture size. A successful [`capture`](CameraScreen::capture) moves to
//! [`CaptureState::Reviewing`] holding the photo; [`retake`](CameraScreen::retake)
//! discards it and [`confirm`](CameraScreen::confirm) hands it to a
//! [`PhotoConsumer`], both returning to previewing.

use crate::assert_invariant;
use crate::config::CrabshotConfig;
use crate::consumer::PhotoConsumer;
use crate::device::CameraDevice;
use crate::errors::CameraError;
use crate::layout::PreviewLayout;
use crate::permissions::{PermissionGate, PermissionInfo};
use crate::types::{
    AspectRatio, CameraFacing, CaptureState, CapturedPhoto, FlashMode, Resolution,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::Instant;
use tokio::task::JoinHandle;

/// Checked after every transition
pub const PHOTO_HELD_WHILE_REVIEWING: &str = "Captured photo is present exactly while reviewing";

/// Serializable view of the screen for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    pub state: CaptureState,
    pub facing: CameraFacing,
    pub flash: FlashMode,
    pub ratio: String,
    pub resolution: Option<String>,
    pub loading: bool,
    pub shutter_enabled: bool,
    pub photo: Option<CapturedPhoto>,
    pub permission: PermissionGate,
}

struct Discovery {
    ratio: AspectRatio,
    resolution: Option<Resolution>,
}

pub struct CameraScreen<D: CameraDevice + 'static> {
    device: Arc<Mutex<D>>,
    config: CrabshotConfig,
    state: CaptureState,
    facing: CameraFacing,
    flash: FlashMode,
    ratio: AspectRatio,
    resolution: Option<Resolution>,
    photo: Option<CapturedPhoto>,
    loading: bool,
    permission: Option<PermissionInfo>,
    /// Capture still running on the blocking pool after its timeout expired
    stalled_capture: Option<JoinHandle<Result<CapturedPhoto, CameraError>>>,
}

fn lock_device<D>(device: &Mutex<D>) -> Result<MutexGuard<'_, D>, CameraError> {
    device
        .lock()
        .map_err(|_| CameraError::InitializationError("Camera mutex poisoned".to_string()))
}

/// Device access from the async side. Never waits: the lock is only held
/// for long by a capture that outlived its timeout.
fn try_lock_device<D>(device: &Mutex<D>) -> Result<MutexGuard<'_, D>, CameraError> {
    device.try_lock().map_err(|e| match e {
        TryLockError::WouldBlock => {
            CameraError::DeviceBusy("A timed-out capture is still running".to_string())
        }
        TryLockError::Poisoned(_) => {
            CameraError::InitializationError("Camera mutex poisoned".to_string())
        }
    })
}

fn discard_pending(photo: &CapturedPhoto) {
    if let Err(e) = std::fs::remove_file(&photo.uri) {
        log::debug!("Could not remove pending photo {}: {}", photo.uri.display(), e);
    }
}

impl<D: CameraDevice + 'static> CameraScreen<D> {
    pub fn new(device: D, config: CrabshotConfig) -> Self {
        Self {
            device: Arc::new(Mutex::new(device)),
            state: CaptureState::Previewing,
            facing: config.camera.default_facing,
            flash: config.capture.default_flash,
            ratio: config.default_ratio(),
            resolution: None,
            photo: None,
            loading: true,
            permission: None,
            stalled_capture: None,
            config,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_reviewing(&self) -> bool {
        self.state == CaptureState::Reviewing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    pub fn ratio(&self) -> &AspectRatio {
        &self.ratio
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    pub fn config(&self) -> &CrabshotConfig {
        &self.config
    }

    /// Replace the configuration. Selection settings apply from the next `prepare`.
    pub fn set_config(&mut self, config: CrabshotConfig) {
        self.config = config;
    }

    pub fn permission_gate(&self) -> PermissionGate {
        PermissionGate::from_info(self.permission.as_ref())
    }

    /// The shutter is usable only while previewing, after setup, with camera access
    /// and no timed-out capture still holding the device
    pub fn shutter_enabled(&self) -> bool {
        self.state == CaptureState::Previewing
            && !self.loading
            && self.permission_gate().is_ready()
            && !self.has_stalled_capture()
    }

    pub fn layout(&self, screen_width: f64, screen_height: f64) -> PreviewLayout {
        PreviewLayout::compute(screen_width, screen_height, &self.ratio)
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            state: self.state,
            facing: self.facing,
            flash: self.flash,
            ratio: self.ratio.to_string(),
            resolution: self.resolution.map(|r| r.to_string()),
            loading: self.loading,
            shutter_enabled: self.shutter_enabled(),
            photo: self.photo.clone(),
            permission: self.permission_gate(),
        }
    }

    pub fn refresh_permission(&mut self) -> Result<PermissionGate, CameraError> {
        let info = try_lock_device(&self.device)?.permission();
        log::debug!("Camera permission: {} ({})", info.status, info.message);
        self.permission = Some(info);
        Ok(self.permission_gate())
    }

    /// Retry affordance of the permission prompt
    pub fn request_permission(&mut self) -> Result<PermissionGate, CameraError> {
        let info = try_lock_device(&self.device)?.request_permission();
        log::info!("Camera permission after request: {}", info.status);
        self.permission = Some(info);
        Ok(self.permission_gate())
    }

    fn ensure_permitted(&mut self) -> Result<(), CameraError> {
        if self.permission.is_none() {
            self.refresh_permission()?;
        }
        match &self.permission {
            Some(info) if info.is_granted() => Ok(()),
            Some(info) => Err(CameraError::PermissionDenied(info.message.clone())),
            None => Err(CameraError::PermissionDenied(
                "Camera permission unknown".to_string(),
            )),
        }
    }

    fn require_state(&self, action: &'static str, expected: CaptureState) -> Result<(), CameraError> {
        if self.state != expected {
            return Err(CameraError::invalid_transition(action, self.state));
        }
        Ok(())
    }

    fn check_invariants(&self, context: &str) {
        assert_invariant!(
            self.photo.is_some() == (self.state == CaptureState::Reviewing),
            PHOTO_HELD_WHILE_REVIEWING,
            context
        );
    }

    /// Collect a capture abandoned by its timeout. While it still runs the
    /// device is busy; once it has finished, its late photo is deleted.
    async fn settle_stalled_capture(&mut self) -> Result<(), CameraError> {
        let Some(handle) = self.stalled_capture.take() else {
            return Ok(());
        };
        if !handle.is_finished() {
            self.stalled_capture = Some(handle);
            return Err(CameraError::DeviceBusy(
                "A timed-out capture is still running".to_string(),
            ));
        }

        match handle.await {
            Ok(Ok(photo)) => {
                log::info!("Discarding late photo {} from a timed-out capture", photo.id);
                discard_pending(&photo);
            }
            Ok(Err(e)) => log::debug!("Timed-out capture finished with: {}", e),
            Err(e) => log::debug!("Timed-out capture task failed: {}", e),
        }
        Ok(())
    }

    /// Whether a capture that timed out is still occupying the device
    pub fn has_stalled_capture(&self) -> bool {
        self.stalled_capture
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Query the active camera for its ratio and picture size, then enable the shutter.
    ///
    /// Query failures fall back to the configured default ratio and keep the
    /// previous picture size; only a failure to select the camera is an error.
    pub async fn prepare(&mut self) -> Result<(), CameraError> {
        self.require_state("prepare", CaptureState::Previewing)?;
        self.settle_stalled_capture().await?;
        self.ensure_permitted()?;

        let device = Arc::clone(&self.device);
        let facing = self.facing;
        let ratio_selector = self.config.ratio_selector();
        let resolution_selector = self.config.resolution_selector();
        let fallback_ratio = self.config.default_ratio();

        let discovery = tokio::task::spawn_blocking(move || -> Result<Discovery, CameraError> {
            let mut camera = lock_device(&device)?;
            camera.set_facing(facing)?;

            let chosen = match camera.list_supported_ratios() {
                Ok(ratios) => {
                    log::debug!("Supported ratios: {:?}", ratios);
                    ratio_selector.select_lenient(&ratios)
                }
                Err(e) => {
                    log::warn!("Failed to list supported ratios: {}", e);
                    None
                }
            };
            let ratio = chosen.unwrap_or_else(|| {
                log::info!("No usable ratio reported, using default {}", fallback_ratio);
                fallback_ratio
            });

            let resolution = match camera.list_available_resolutions(ratio.as_str()) {
                Ok(sizes) => {
                    log::debug!("Available picture sizes for {}: {:?}", ratio, sizes);
                    resolution_selector.select_lenient(&sizes)
                }
                Err(e) => {
                    log::warn!("Failed to list picture sizes for {}: {}", ratio, e);
                    None
                }
            };

            Ok(Discovery { ratio, resolution })
        })
        .await
        .map_err(|e| CameraError::InitializationError(format!("Task join error: {}", e)))??;

        self.ratio = discovery.ratio;
        if let Some(resolution) = discovery.resolution {
            self.resolution = Some(resolution);
        }
        self.loading = false;

        log::info!(
            "Camera ready: facing={} ratio={} picture_size={}",
            self.facing.as_str(),
            self.ratio,
            self.resolution
                .map(|r| r.to_string())
                .unwrap_or_else(|| "device default".to_string())
        );
        self.check_invariants("prepare");
        Ok(())
    }

    /// Take a picture and switch to reviewing it.
    ///
    /// The device call runs on the blocking pool and is bounded by
    /// `capture.timeout_ms`. On failure or timeout the screen stays in
    /// previewing with no photo. A timed-out call keeps the device until it
    /// returns; until then device calls fail with [`CameraError::DeviceBusy`]
    /// and its photo, if any, is deleted. Dropping the future abandons the wait
    /// without touching the screen state.
    pub async fn capture(&mut self) -> Result<CapturedPhoto, CameraError> {
        self.require_state("capture", CaptureState::Previewing)?;
        if self.loading {
            return Err(CameraError::invalid_transition("capture", "loading"));
        }
        self.settle_stalled_capture().await?;
        self.ensure_permitted()?;

        let options = self
            .config
            .base_capture_options()
            .with_resolution(self.resolution)
            .with_flash(self.flash);
        let timeout = self.config.capture_timeout();
        let device = Arc::clone(&self.device);

        log::info!("Capturing photo: {:?}", options);
        let started = Instant::now();

        let mut task = tokio::task::spawn_blocking(move || {
            let mut camera = lock_device(&device)?;
            camera.capture(&options)
        });

        let waited = tokio::time::timeout(timeout, &mut task).await;
        let outcome = match waited {
            Err(_) => {
                log::warn!("Capture timed out after {}ms", timeout.as_millis());
                self.stalled_capture = Some(task);
                Err(CameraError::CaptureTimeout(timeout.as_millis() as u64))
            }
            Ok(Err(e)) => Err(CameraError::CaptureFailed(format!("Task join error: {}", e))),
            Ok(Ok(result)) => result,
        };

        let photo = match outcome {
            Ok(photo) => photo,
            Err(e) => {
                log::error!("Failed to capture photo: {}", e);
                self.check_invariants("capture");
                return Err(match e {
                    CameraError::PermissionDenied(_) => {
                        self.permission = None;
                        e
                    }
                    CameraError::CaptureFailed(_) | CameraError::CaptureTimeout(_) => e,
                    other => CameraError::CaptureFailed(other.to_string()),
                });
            }
        };

        log::info!(
            "Captured {}x{} photo {} in {}ms",
            photo.width,
            photo.height,
            photo.uri.display(),
            started.elapsed().as_millis()
        );

        self.photo = Some(photo.clone());
        self.state = CaptureState::Reviewing;
        self.check_invariants("capture");
        Ok(photo)
    }

    /// Discard the photo under review and return to the live preview
    pub fn retake(&mut self) -> Result<(), CameraError> {
        self.require_state("retake", CaptureState::Reviewing)?;

        if let Some(photo) = self.photo.take() {
            log::info!("Discarding photo {}", photo.id);
            discard_pending(&photo);
        }
        self.state = CaptureState::Previewing;
        self.check_invariants("retake");
        Ok(())
    }

    /// Hand the photo under review to `consumer` and return to the live preview.
    ///
    /// If the consumer fails the screen keeps reviewing the same photo.
    pub fn confirm<C: PhotoConsumer + ?Sized>(
        &mut self,
        consumer: &mut C,
    ) -> Result<CapturedPhoto, CameraError> {
        self.require_state("confirm", CaptureState::Reviewing)?;

        let Some(photo) = self.photo.as_ref() else {
            return Err(CameraError::invalid_transition("confirm", "reviewing without a photo"));
        };

        if let Err(e) = consumer.accept(photo) {
            log::warn!("Photo {} was not accepted: {}", photo.id, e);
            self.check_invariants("confirm");
            return Err(e);
        }

        let photo = self.photo.take().ok_or_else(|| {
            CameraError::invalid_transition("confirm", "reviewing without a photo")
        })?;
        log::info!("Confirmed photo {}", photo.id);
        self.state = CaptureState::Previewing;
        self.check_invariants("confirm");
        Ok(photo)
    }

    /// Switch between the back and front camera.
    ///
    /// The other camera reports its own ratios and sizes, so the shutter stays
    /// disabled until the next `prepare`.
    pub fn toggle_facing(&mut self) -> Result<CameraFacing, CameraError> {
        self.require_state("toggle facing", CaptureState::Previewing)?;
        self.ensure_permitted()?;

        let next = self.facing.toggled();
        try_lock_device(&self.device)?.set_facing(next)?;

        self.facing = next;
        self.resolution = None;
        self.loading = true;
        log::info!("Switched to {} camera", next.as_str());
        self.check_invariants("toggle_facing");
        Ok(next)
    }

    /// Swap in a new device, e.g. after the device settings changed.
    ///
    /// Permission is checked again and the shutter stays disabled until the
    /// next `prepare`, which also re-applies the current facing.
    pub async fn replace_device(&mut self, device: D) -> Result<(), CameraError> {
        self.require_state("replace the camera", CaptureState::Previewing)?;
        self.settle_stalled_capture().await?;

        self.device = Arc::new(Mutex::new(device));
        self.permission = None;
        self.resolution = None;
        self.loading = true;
        log::info!("Camera device replaced");
        self.check_invariants("replace_device");
        Ok(())
    }

    pub fn toggle_flash(&mut self) -> Result<FlashMode, CameraError> {
        self.require_state("toggle flash", CaptureState::Previewing)?;
        self.flash = self.flash.toggled();
        log::debug!("Flash mode: {:?}", self.flash);
        Ok(self.flash)
    }
}
