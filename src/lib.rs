//! crabshot: capture-and-review camera screen for Tauri applications
//!
//! The host webview renders the live preview; this crate owns the decisions and
//! state behind the screen:
//!
//! # Features
//! - Aspect ratio selection closest to 4:3 from the ratios a camera reports
//! - Picture size selection aiming at a 1920px portrait height
//! - Asynchronous shutter capture with a timeout
//! - Front/back camera toggle and flash toggle
//! - Confirm/retake review overlay, with confirmed photos filed to disk
//! - Permission gating with a retry prompt
//!
//! # Usage
//! ```rust,ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(crabshot::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! Without Tauri, drive a [`CameraScreen`] directly:
//! ```rust,ignore
//! let config = CrabshotConfig::load_or_default();
//! let mut screen = CameraScreen::new(NativeCamera::new(&config), config);
//! screen.prepare().await?;
//! let photo = screen.capture().await?;
//! let mut consumer = DirectoryConsumer::new("./captures");
//! screen.confirm(&mut consumer)?;
//! ```
pub mod commands;
pub mod config;
pub mod consumer;
pub mod device;
pub mod errors;
pub mod invariant_ppt;
pub mod layout;
pub mod permissions;
pub mod photo;
pub mod platform;
pub mod screen;
pub mod selection;
pub mod testing;
pub mod types;

// Re-exports for convenience
pub use self::config::CrabshotConfig;
pub use consumer::{ChannelConsumer, DirectoryConsumer, PhotoConsumer};
pub use device::CameraDevice;
pub use errors::CameraError;
pub use layout::PreviewLayout;
pub use permissions::{PermissionGate, PermissionInfo, PermissionStatus};
pub use platform::NativeCamera;
pub use screen::{CameraScreen, ScreenSnapshot};
pub use selection::{select_ratio, select_resolution, RatioSelector, ResolutionSelector};
pub use types::{
    AspectRatio, CameraFacing, CaptureOptions, CaptureState, CapturedPhoto, FlashMode, Platform,
    Resolution, ResolutionAxis,
};

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

/// Initialize the crabshot plugin with all commands.
///
/// Configuration is read from `crabshot.toml` (see [`CrabshotConfig`]) and the
/// screen drives the native camera.
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("crabshot")
        .invoke_handler(tauri::generate_handler![
            // Screen commands
            commands::screen::get_screen_state,
            commands::screen::prepare_camera,
            commands::screen::take_picture,
            commands::screen::retake_picture,
            commands::screen::confirm_picture,
            commands::screen::toggle_camera_facing,
            commands::screen::toggle_flash,
            commands::screen::get_preview_layout,
            // Permission commands
            commands::permissions::request_camera_permission,
            commands::permissions::check_camera_permission_status,
            // Configuration commands
            commands::config::get_config,
            commands::config::update_config,
            commands::config::reset_config,
        ])
        .setup(|app, _api| {
            let config = CrabshotConfig::load_or_default();
            let device: Box<dyn CameraDevice> = Box::new(NativeCamera::new(&config));
            let state = commands::ScreenState::new(device, config, CrabshotConfig::default_path())
                .with_device_factory(|config| -> Box<dyn CameraDevice> {
                    Box::new(NativeCamera::new(config))
                });
            app.manage(state);
            log::info!("crabshot plugin initialized on {}", current_platform().as_str());
            Ok(())
        })
        .build()
}

/// Detect the current platform using the Platform enum
pub fn current_platform() -> Platform {
    Platform::current()
}

/// Initialize logging for the camera screen
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "crabshot=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
        platform: Platform::current(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub platform: Platform,
}
