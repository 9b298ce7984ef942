use crate::commands::state::ScreenState;
use crate::permissions::PermissionGate;
use tauri::{command, State};

/// Retry button of the permission prompt
#[command]
pub async fn request_camera_permission(
    state: State<'_, ScreenState>,
) -> Result<PermissionGate, String> {
    log::info!("Requesting camera permission");
    let gate = state.request_permission().await.map_err(|e| e.to_string())?;
    if let PermissionGate::Prompt { message, can_request } = &gate {
        log::warn!("Camera permission not granted (can_request={}): {}", can_request, message);
    }
    Ok(gate)
}

#[command]
pub async fn check_camera_permission_status(
    state: State<'_, ScreenState>,
) -> Result<PermissionGate, String> {
    state.check_permission().await.map_err(|e| e.to_string())
}
