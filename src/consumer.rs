//! Destinations for confirmed photos

use crate::config::StorageConfig;
use crate::errors::CameraError;
use crate::types::CapturedPhoto;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;

/// Receives the photo when the user confirms it
pub trait PhotoConsumer {
    fn accept(&mut self, photo: &CapturedPhoto) -> Result<(), CameraError>;
}

/// Moves confirmed photos out of the pending directory into the output
/// directory, optionally under a date folder
#[derive(Debug, Clone)]
pub struct DirectoryConsumer {
    root: PathBuf,
    organize_by_date: bool,
    date_format: String,
    stored: Vec<PathBuf>,
}

impl DirectoryConsumer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            organize_by_date: false,
            date_format: "%Y-%m-%d".to_string(),
            stored: Vec::new(),
        }
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&storage.output_directory),
            organize_by_date: storage.auto_organize_by_date,
            date_format: storage.date_format.clone(),
            stored: Vec::new(),
        }
    }

    pub fn organize_by_date(mut self, enabled: bool) -> Self {
        self.organize_by_date = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths written so far, oldest first
    pub fn stored(&self) -> &[PathBuf] {
        &self.stored
    }

    pub fn last_stored(&self) -> Option<&Path> {
        self.stored.last().map(PathBuf::as_path)
    }

    fn destination(&self, photo: &CapturedPhoto) -> PathBuf {
        let mut dir = self.root.clone();
        if self.organize_by_date {
            dir.push(photo.captured_at.format(&self.date_format).to_string());
        }

        let extension = photo
            .uri
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");
        dir.join(format!(
            "{}_{}.{}",
            photo.captured_at.format("%Y%m%d_%H%M%S"),
            photo.id.simple(),
            extension
        ))
    }
}

impl PhotoConsumer for DirectoryConsumer {
    fn accept(&mut self, photo: &CapturedPhoto) -> Result<(), CameraError> {
        let destination = self.destination(photo);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CameraError::StorageError(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        move_file(&photo.uri, &destination).map_err(|e| {
            CameraError::StorageError(format!(
                "Failed to move {} to {}: {}",
                photo.uri.display(),
                destination.display(),
                e
            ))
        })?;

        log::info!("Stored photo {} at {}", photo.id, destination.display());
        self.stored.push(destination);
        Ok(())
    }
}

/// Rename, or copy and delete when the two paths are on different filesystems
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
        log::warn!("Stored {} but could not remove it: {}", from.display(), e);
    }
    Ok(())
}

/// Forwards confirmed photos to an async receiver. The receiver owns the
/// pending file from then on.
#[derive(Debug, Clone)]
pub struct ChannelConsumer {
    sender: UnboundedSender<CapturedPhoto>,
}

impl ChannelConsumer {
    pub fn new(sender: UnboundedSender<CapturedPhoto>) -> Self {
        Self { sender }
    }
}

impl PhotoConsumer for ChannelConsumer {
    fn accept(&mut self, photo: &CapturedPhoto) -> Result<(), CameraError> {
        self.sender
            .send(photo.clone())
            .map_err(|_| CameraError::StorageError("Photo receiver was dropped".to_string()))
    }
}

impl<F> PhotoConsumer for F
where
    F: FnMut(&CapturedPhoto) -> Result<(), CameraError>,
{
    fn accept(&mut self, photo: &CapturedPhoto) -> Result<(), CameraError> {
        self(photo)
    }
}
