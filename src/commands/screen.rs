use crate::commands::state::{ConfirmedPhoto, ScreenState};
use crate::layout::PreviewLayout;
use crate::screen::ScreenSnapshot;
use tauri::{command, AppHandle, Emitter, Runtime, State};

/// Event emitted with the [`ConfirmedPhoto`] payload when the user confirms a photo
pub const PHOTO_CONFIRMED_EVENT: &str = "crabshot://photo-confirmed";

/// Current screen state for rendering
#[command]
pub async fn get_screen_state(state: State<'_, ScreenState>) -> Result<ScreenSnapshot, String> {
    Ok(state.snapshot().await)
}

/// Query the camera once the preview surface is ready
#[command]
pub async fn prepare_camera(state: State<'_, ScreenState>) -> Result<ScreenSnapshot, String> {
    log::info!("Preparing camera screen");
    state.prepare().await.map_err(|e| {
        log::error!("Failed to prepare camera: {}", e);
        e.to_string()
    })
}

/// Shutter press
#[command]
pub async fn take_picture(state: State<'_, ScreenState>) -> Result<ScreenSnapshot, String> {
    state.take_picture().await.map_err(|e| {
        if e.is_permission() {
            log::warn!("Camera permission lost during capture: {}", e);
        } else {
            log::error!("Failed to take picture: {}", e);
        }
        format!("Failed to take picture: {}", e)
    })
}

#[command]
pub async fn retake_picture(state: State<'_, ScreenState>) -> Result<ScreenSnapshot, String> {
    state.retake().await.map_err(|e| e.to_string())
}

#[command]
pub async fn confirm_picture<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, ScreenState>,
) -> Result<ConfirmedPhoto, String> {
    let confirmed = state.confirm().await.map_err(|e| {
        log::error!("Failed to confirm picture: {}", e);
        e.to_string()
    })?;

    if let Err(e) = app.emit(PHOTO_CONFIRMED_EVENT, &confirmed) {
        log::warn!("Failed to emit {}: {}", PHOTO_CONFIRMED_EVENT, e);
    }
    Ok(confirmed)
}

#[command]
pub async fn toggle_camera_facing(state: State<'_, ScreenState>) -> Result<ScreenSnapshot, String> {
    state.toggle_facing().await.map_err(|e| e.to_string())
}

#[command]
pub async fn toggle_flash(state: State<'_, ScreenState>) -> Result<ScreenSnapshot, String> {
    state.toggle_flash().await.map_err(|e| e.to_string())
}

/// Preview box and review overlay geometry for the given screen size
#[command]
pub async fn get_preview_layout(
    state: State<'_, ScreenState>,
    screen_width: f64,
    screen_height: f64,
) -> Result<PreviewLayout, String> {
    if screen_width <= 0.0 || screen_height <= 0.0 {
        return Err("Screen dimensions must be positive".to_string());
    }
    Ok(state.layout(screen_width, screen_height).await)
}
