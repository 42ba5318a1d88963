//! Camera capture into uniquely named app-private files.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CameraOutcome};
use crate::provider::{FileProvider, ProviderError};

/// File name timestamp layout, e.g. `20240131_235959`.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const EXTENSION: &str = "jpg";

/// A photo written by the camera. Read by preview and export, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPhoto {
    pub path: PathBuf,
    pub display_name: String,
    pub captured_at: NaiveDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("cannot prepare capture storage {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Issues capture destinations and hands them to the camera.
pub struct CaptureSession {
    storage_dir: PathBuf,
    file_prefix: String,
    provider: Arc<dyn FileProvider>,
    issued: HashSet<String>,
}

impl CaptureSession {
    pub fn new(
        storage_dir: impl Into<PathBuf>,
        file_prefix: impl Into<String>,
        provider: Arc<dyn FileProvider>,
    ) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            file_prefix: file_prefix.into(),
            provider,
            issued: HashSet::new(),
        }
    }

    /// Ask the camera for a photo.
    ///
    /// `Ok(None)` means the camera was cancelled or failed; nothing else
    /// changes in that case.
    pub async fn capture<C: Camera>(
        &mut self,
        camera: &C,
    ) -> Result<Option<CapturedPhoto>, CaptureError> {
        let photo = self.next_destination(Local::now().naive_local())?;
        let uri = self.provider.uri_for_file(&photo.path)?;
        tracing::info!("capture requested: {} -> {uri}", photo.display_name);

        match camera.take_picture(&uri).await {
            CameraOutcome::Saved => {
                tracing::info!("capture saved: {}", photo.path.display());
                Ok(Some(photo))
            }
            CameraOutcome::Cancelled => {
                tracing::info!("capture cancelled: {}", photo.display_name);
                Ok(None)
            }
            CameraOutcome::Failed(reason) => {
                tracing::warn!("capture failed for {}: {reason}", photo.display_name);
                Ok(None)
            }
        }
    }

    /// Reserve a destination named after `now`.
    ///
    /// The name is `<prefix><timestamp>.jpg`, with `_1`, `_2`, ... appended
    /// when that name already exists on disk or was issued earlier.
    pub fn next_destination(&mut self, now: NaiveDateTime) -> Result<CapturedPhoto, CaptureError> {
        std::fs::create_dir_all(&self.storage_dir).map_err(|source| CaptureError::Storage {
            path: self.storage_dir.clone(),
            source,
        })?;

        let stem = format!("{}{}", self.file_prefix, now.format(TIMESTAMP_FORMAT));
        let mut n = 0u32;
        loop {
            let display_name = if n == 0 {
                format!("{stem}.{EXTENSION}")
            } else {
                format!("{stem}_{n}.{EXTENSION}")
            };
            let path = self.storage_dir.join(&display_name);
            if !self.issued.contains(&display_name) && !path.exists() {
                self.issued.insert(display_name.clone());
                return Ok(CapturedPhoto {
                    path,
                    display_name,
                    captured_at: now,
                });
            }
            n += 1;
        }
    }
}
