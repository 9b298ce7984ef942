use crate::commands::state::ScreenState;
use crate::config::CrabshotConfig;
use tauri::{command, State};

/// Get the current configuration
#[command]
pub async fn get_config(state: State<'_, ScreenState>) -> Result<CrabshotConfig, String> {
    Ok(state.config().await)
}

/// Validate, save and apply a new configuration.
///
/// Changing the device indices or the capture directory reopens the camera,
/// so call `prepare_camera` again afterwards. Fails while a photo is under review.
#[command]
pub async fn update_config(
    state: State<'_, ScreenState>,
    new_config: CrabshotConfig,
) -> Result<(), String> {
    state.update_config(new_config).await.map_err(|e| e.to_string())
}

/// Reset configuration to defaults
#[command]
pub async fn reset_config(state: State<'_, ScreenState>) -> Result<CrabshotConfig, String> {
    state.reset_config().await.map_err(|e| e.to_string())
}
