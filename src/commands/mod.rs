pub mod config;
pub mod permissions;
pub mod screen;
pub mod state;

pub use self::config::*;
pub use self::permissions::*;
pub use self::screen::*;
pub use self::state::{ConfirmedPhoto, DeviceFactory, ScreenState};
