//! Testing utilities for crabshot
//!
//! A synthetic camera that stands in for hardware in tests and in the
//! headless CLI.

pub mod synthetic_camera;

pub use synthetic_camera::{CaptureScript, SyntheticCamera, SyntheticLog};
