//! Full-resolution export of the adjusted photo into the media library.

use std::io::Write;
use std::sync::Arc;

use photoexpress_core::codec;
use photoexpress_core::{ColorTransform, CoreError, ImageFilterEngine};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::JoinHandle;

use crate::capture::CapturedPhoto;
use crate::media::{MediaEntry, MediaError, MediaLibrary};

/// Immutable snapshot handed to the export worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub photo: CapturedPhoto,
    pub transform: ColorTransform,
}

/// Describes the media entry an export produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReceipt {
    pub display_name: String,
    pub mime_type: String,
    pub location: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export failed: {0}")]
    Image(#[from] CoreError),
    #[error("export failed: {0}")]
    Media(#[from] MediaError),
    #[error("export failed writing {name}: {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },
    #[error("export worker stopped: {0}")]
    Worker(String),
}

/// Decode, filter, encode, persist.
pub struct ExportPipeline {
    library: Arc<dyn MediaLibrary>,
    collection: String,
    jpeg_quality: u8,
}

impl ExportPipeline {
    pub fn new(
        library: Arc<dyn MediaLibrary>,
        collection: impl Into<String>,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            library,
            collection: collection.into(),
            jpeg_quality,
        }
    }

    /// Run the export synchronously. Meant for a blocking worker thread.
    ///
    /// The JPEG is fully encoded before a media entry is opened, and the
    /// entry is only published after every byte is written.
    pub fn export(&self, request: &ExportRequest) -> Result<ExportReceipt, ExportError> {
        let source = codec::decode_full(&request.photo.path)?;
        let adjusted = ImageFilterEngine::apply(&source, &request.transform);
        let jpeg = codec::encode_jpeg(&adjusted, self.jpeg_quality)?;

        let entry = MediaEntry::jpeg(&request.photo.display_name, &self.collection);
        let mut sink = self.library.insert(&entry)?;
        sink.write_all(&jpeg)
            .and_then(|()| sink.flush())
            .map_err(|source| ExportError::Write {
                name: entry.display_name.clone(),
                source,
            })?;
        let location = sink.publish()?;

        tracing::info!(
            "exported {} ({}x{}, {} bytes) to {location}",
            entry.display_name,
            adjusted.width(),
            adjusted.height(),
            jpeg.len()
        );

        Ok(ExportReceipt {
            display_name: entry.display_name,
            mime_type: entry.mime_type,
            location,
            width: adjusted.width(),
            height: adjusted.height(),
        })
    }

    /// Run [`export`](Self::export) on the runtime's blocking pool.
    pub fn spawn(
        self: Arc<Self>,
        runtime: &tokio::runtime::Handle,
        request: ExportRequest,
    ) -> PendingExport {
        let display_name = request.photo.display_name.clone();
        let (tx, rx) = oneshot::channel();
        let worker = runtime.spawn_blocking(move || {
            let outcome = self.export(&request);
            if tx.send(outcome).is_err() {
                let name = &request.photo.display_name;
                tracing::debug!("export of {name} finished unobserved");
            }
        });
        PendingExport {
            display_name,
            outcome: rx,
            worker,
        }
    }
}

/// An export running in the background.
///
/// The worker keeps running when this handle is dropped; the result is then
/// discarded.
#[derive(Debug)]
pub struct PendingExport {
    display_name: String,
    outcome: oneshot::Receiver<Result<ExportReceipt, ExportError>>,
    worker: JoinHandle<()>,
}

impl PendingExport {
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether the worker thread has returned.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// The result if the worker is done, `None` while it is still running.
    pub fn try_outcome(&mut self) -> Option<Result<ExportReceipt, ExportError>> {
        match self.outcome.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(worker_stopped())),
        }
    }

    /// Wait for the worker. A panicked worker is reported as an error.
    ///
    /// Cancel safe: dropping the future leaves the export pending.
    pub async fn outcome(&mut self) -> Result<ExportReceipt, ExportError> {
        (&mut self.outcome)
            .await
            .unwrap_or_else(|_| Err(worker_stopped()))
    }
}

fn worker_stopped() -> ExportError {
    ExportError::Worker("worker exited without a result".to_string())
}
