//! Scriptable camera for tests and headless demos
//!
//! Reports capability lists modelled on a typical Android phone (a 4:3 back
//! sensor with 12MP tops, a lower-resolution front sensor) and writes real,
//! thumbnail-sized JPEG files so consumers can be exercised end to end.

use crate::device::CameraDevice;
use crate::errors::CameraError;
use crate::permissions::PermissionInfo;
use crate::photo::write_pending_jpeg;
use crate::types::{CameraFacing, CaptureOptions, CapturedPhoto, Resolution};
use image::RgbImage;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Longest side of the JPEG actually written
const THUMBNAIL_EDGE: u32 = 320;

/// What the next capture call does
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureScript {
    Succeed,
    Fail(String),
    /// Block for the duration, then succeed
    Stall(Duration),
    Deny(String),
}

/// Calls observed by a [`SyntheticCamera`], readable after the camera moved into a screen
#[derive(Debug, Clone, Default)]
pub struct SyntheticLog {
    inner: Arc<Mutex<LogInner>>,
}

#[derive(Debug, Default)]
struct LogInner {
    captures: Vec<CaptureOptions>,
    facings: Vec<CameraFacing>,
    ratio_queries: Vec<String>,
}

impl SyntheticLog {
    pub fn captures(&self) -> Vec<CaptureOptions> {
        self.inner.lock().map(|g| g.captures.clone()).unwrap_or_default()
    }

    pub fn facings(&self) -> Vec<CameraFacing> {
        self.inner.lock().map(|g| g.facings.clone()).unwrap_or_default()
    }

    /// Ratios passed to `list_available_resolutions`
    pub fn ratio_queries(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|g| g.ratio_queries.clone())
            .unwrap_or_default()
    }

    fn record(&self, f: impl FnOnce(&mut LogInner)) {
        if let Ok(mut guard) = self.inner.lock() {
            f(&mut guard);
        }
    }
}

pub struct SyntheticCamera {
    output_dir: PathBuf,
    facing: CameraFacing,
    ratios: HashMap<CameraFacing, Vec<String>>,
    sizes: HashMap<(CameraFacing, String), Vec<String>>,
    script: VecDeque<CaptureScript>,
    permission: PermissionInfo,
    grant_on_request: bool,
    fail_discovery: bool,
    frame_number: u64,
    log: SyntheticLog,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl SyntheticCamera {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let mut ratios = HashMap::new();
        ratios.insert(CameraFacing::Back, strings(&["16:9", "4:3", "1:1"]));
        ratios.insert(CameraFacing::Front, strings(&["16:9", "4:3"]));

        let mut sizes = HashMap::new();
        sizes.insert(
            (CameraFacing::Back, "4:3".to_string()),
            strings(&[
                "1920x1440",
                "2048x1536",
                "2560x1920",
                "3264x2448",
                "4000x3000",
                "4032x3024",
            ]),
        );
        sizes.insert(
            (CameraFacing::Back, "16:9".to_string()),
            strings(&["1920x1080", "3840x2160"]),
        );
        sizes.insert(
            (CameraFacing::Back, "1:1".to_string()),
            strings(&["1440x1440", "3024x3024"]),
        );
        sizes.insert(
            (CameraFacing::Front, "4:3".to_string()),
            strings(&["640x480", "1280x960", "1600x1200"]),
        );
        sizes.insert(
            (CameraFacing::Front, "16:9".to_string()),
            strings(&["1280x720", "1920x1080"]),
        );

        Self {
            output_dir: output_dir.into(),
            facing: CameraFacing::Back,
            ratios,
            sizes,
            script: VecDeque::new(),
            permission: PermissionInfo::granted("Synthetic camera access granted"),
            grant_on_request: true,
            fail_discovery: false,
            frame_number: 0,
            log: SyntheticLog::default(),
        }
    }

    pub fn with_ratios(mut self, facing: CameraFacing, ratios: &[&str]) -> Self {
        self.ratios.insert(facing, strings(ratios));
        self
    }

    pub fn with_sizes(mut self, facing: CameraFacing, ratio: &str, sizes: &[&str]) -> Self {
        self.sizes.insert((facing, ratio.to_string()), strings(sizes));
        self
    }

    /// Queue outcomes for the next capture calls; once drained captures succeed
    pub fn with_script(mut self, script: impl IntoIterator<Item = CaptureScript>) -> Self {
        self.script.extend(script);
        self
    }

    pub fn with_permission(mut self, permission: PermissionInfo, grant_on_request: bool) -> Self {
        self.permission = permission;
        self.grant_on_request = grant_on_request;
        self
    }

    /// Make capability queries fail
    pub fn with_failing_discovery(mut self) -> Self {
        self.fail_discovery = true;
        self
    }

    pub fn log(&self) -> SyntheticLog {
        self.log.clone()
    }

    fn render(&mut self, resolution: Resolution) -> RgbImage {
        let scale = (resolution.width.max(resolution.height) / THUMBNAIL_EDGE).max(1);
        let width = (resolution.width / scale).max(1);
        let height = (resolution.height / scale).max(1);

        let base = (self.frame_number % 256) as u8;
        self.frame_number += 1;

        RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                base.wrapping_add((x % 256) as u8),
                base.wrapping_add((y % 256) as u8),
                base.wrapping_add(((x + y) % 256) as u8),
            ])
        })
    }
}

impl CameraDevice for SyntheticCamera {
    fn list_supported_ratios(&mut self) -> Result<Vec<String>, CameraError> {
        if self.fail_discovery {
            return Err(CameraError::InitializationError(
                "Synthetic discovery failure".to_string(),
            ));
        }
        Ok(self.ratios.get(&self.facing).cloned().unwrap_or_default())
    }

    fn list_available_resolutions(&mut self, ratio: &str) -> Result<Vec<String>, CameraError> {
        self.log.record(|log| log.ratio_queries.push(ratio.to_string()));
        if self.fail_discovery {
            return Err(CameraError::InitializationError(
                "Synthetic discovery failure".to_string(),
            ));
        }
        Ok(self
            .sizes
            .get(&(self.facing, ratio.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn capture(&mut self, options: &CaptureOptions) -> Result<CapturedPhoto, CameraError> {
        self.log.record(|log| log.captures.push(options.clone()));

        match self.script.pop_front().unwrap_or(CaptureScript::Succeed) {
            CaptureScript::Succeed => {}
            CaptureScript::Fail(message) => return Err(CameraError::CaptureFailed(message)),
            CaptureScript::Stall(duration) => std::thread::sleep(duration),
            CaptureScript::Deny(message) => return Err(CameraError::PermissionDenied(message)),
        }

        let resolution = options.resolution.unwrap_or(Resolution::new(640, 480));
        let image = self.render(resolution);
        write_pending_jpeg(&image, &self.output_dir, self.facing, options)
    }

    fn set_facing(&mut self, facing: CameraFacing) -> Result<(), CameraError> {
        self.log.record(|log| log.facings.push(facing));
        self.facing = facing;
        Ok(())
    }

    fn permission(&self) -> PermissionInfo {
        self.permission.clone()
    }

    fn request_permission(&mut self) -> PermissionInfo {
        if self.grant_on_request {
            self.permission = PermissionInfo::granted("Synthetic camera access granted");
        }
        self.permission.clone()
    }
}
