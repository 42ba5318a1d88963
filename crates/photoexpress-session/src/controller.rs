//! Session controller.
//!
//! This is the ONLY place session state changes. UI input arrives as method
//! calls, heavy export work is pushed to the blocking pool, and the controller
//! keeps the worker's handle until the outcome is collected on the control side.

use std::sync::Arc;

use photoexpress_core::{BrightnessLevel, ColorTransform, PixelBuffer};
use tokio::runtime::Handle;

use crate::camera::Camera;
use crate::capture::{CaptureError, CaptureSession, CapturedPhoto};
use crate::config::SessionConfig;
use crate::events::SessionEvent;
use crate::export::{ExportError, ExportPipeline, ExportReceipt, PendingExport};
use crate::media::MediaLibrary;
use crate::preview::{PreviewController, PreviewError, Viewport};
use crate::provider::FileProvider;
use crate::state::SessionState;

pub struct SessionController {
    photo: Option<CapturedPhoto>,
    brightness: BrightnessLevel,
    capture: CaptureSession,
    preview: PreviewController,
    pipeline: Arc<ExportPipeline>,
    pending: Option<PendingExport>,
    runtime: Handle,
    events: Vec<SessionEvent>,
}

impl SessionController {
    /// Build a controller. Exports are spawned onto `runtime`'s blocking pool.
    pub fn new(
        config: &SessionConfig,
        provider: Arc<dyn FileProvider>,
        library: Arc<dyn MediaLibrary>,
        runtime: Handle,
    ) -> Self {
        Self {
            photo: None,
            brightness: BrightnessLevel::NEUTRAL,
            capture: CaptureSession::new(&config.storage_dir, &config.file_prefix, provider),
            preview: PreviewController::new(),
            pipeline: Arc::new(ExportPipeline::new(
                library,
                &config.collection,
                config.jpeg_quality,
            )),
            pending: None,
            runtime,
            events: Vec::new(),
        }
    }

    /// Current session state.
    ///
    /// `export_in_flight` follows the worker itself, so it clears as soon as
    /// the export completes, whether or not the outcome was collected yet.
    pub fn state(&self) -> SessionState {
        SessionState {
            photo: self.photo.clone(),
            brightness: self.brightness,
            export_in_flight: self.export_in_flight(),
        }
    }

    pub fn export_in_flight(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Serialized copy of the session state.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state())
    }

    pub fn preview(&self) -> &PreviewController {
        &self.preview
    }

    /// Take a new photo and load it for preview.
    ///
    /// Returns `Ok(true)` when the photo replaced the current one. Camera
    /// cancellation, camera failure, and an undecodable file all return
    /// `Ok(false)` and leave the state exactly as it was.
    pub async fn capture<C: Camera>(
        &mut self,
        camera: &C,
        viewport: Viewport,
    ) -> Result<bool, CaptureError> {
        let Some(photo) = self.capture.capture(camera).await? else {
            self.events.push(SessionEvent::CaptureCancelled);
            return Ok(false);
        };

        let (width, height) = match self.preview.load_for_preview(&photo, viewport) {
            Ok(buffer) => buffer.dimensions(),
            Err(e) => {
                tracing::warn!("{e}");
                self.events.push(SessionEvent::PreviewUnavailable {
                    message: e.to_string(),
                });
                return Ok(false);
            }
        };
        let scale_factor = self.preview.scale_factor().unwrap_or(1);

        self.events.push(SessionEvent::PhotoCaptured {
            display_name: photo.display_name.clone(),
            width,
            height,
            scale_factor,
        });
        self.photo = Some(photo);
        self.brightness = BrightnessLevel::NEUTRAL;
        Ok(true)
    }

    /// Move the slider and re-render the preview.
    ///
    /// Ignored while there is no photo, since the control is hidden then.
    pub fn set_brightness(&mut self, level: i32) -> Option<PixelBuffer> {
        if self.photo.is_none() {
            tracing::debug!("brightness {level} ignored: no photo");
            return None;
        }

        let level = BrightnessLevel::new(level);
        if level != self.brightness {
            self.brightness = level;
            tracing::debug!("brightness -> {level}");
            self.events.push(SessionEvent::BrightnessChanged { level });
        }
        self.preview.render(&self.current_transform()).ok()
    }

    pub fn current_transform(&self) -> ColorTransform {
        ColorTransform::from_brightness(self.brightness)
    }

    pub fn render_preview(&self) -> Result<PixelBuffer, PreviewError> {
        self.preview.render(&self.current_transform())
    }

    /// Start exporting the current photo with the current transform.
    ///
    /// A finished export that was never collected is recorded first. Returns
    /// `false` without side effects while commit is disabled: before the
    /// first capture, or while another export is still running.
    pub fn commit(&mut self) -> bool {
        self.poll_export();
        if let Some(pending) = &self.pending {
            let name = pending.display_name();
            tracing::debug!("commit ignored: {name} still exporting");
            return false;
        }
        let Some(request) = self.state().export_request() else {
            tracing::debug!("commit ignored: no photo");
            return false;
        };

        tracing::info!(
            "export started: {} at brightness {}",
            request.photo.display_name,
            self.brightness
        );
        self.events.push(SessionEvent::ExportStarted {
            display_name: request.photo.display_name.clone(),
        });
        self.pending = Some(Arc::clone(&self.pipeline).spawn(&self.runtime, request));
        true
    }

    /// Record the outcome of a finished export and re-enable commit.
    ///
    /// `None` when no export is pending or it is still running.
    pub fn poll_export(&mut self) -> Option<Result<ExportReceipt, ExportError>> {
        let outcome = self.pending.as_mut()?.try_outcome()?;
        self.pending = None;
        Some(self.finish_export(outcome))
    }

    /// Wait for the pending export and record its outcome.
    ///
    /// `None` when no export is pending. Dropping this future leaves the
    /// export pending; a later poll, wait, or commit collects it.
    pub async fn wait_export(&mut self) -> Option<Result<ExportReceipt, ExportError>> {
        let outcome = self.pending.as_mut()?.outcome().await;
        self.pending = None;
        Some(self.finish_export(outcome))
    }

    /// [`commit`](Self::commit) then [`wait_export`](Self::wait_export).
    ///
    /// `None` when commit was disabled.
    pub async fn commit_and_wait(&mut self) -> Option<Result<ExportReceipt, ExportError>> {
        if !self.commit() {
            return None;
        }
        self.wait_export().await
    }

    /// Take all queued notifications.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn finish_export(
        &mut self,
        outcome: Result<ExportReceipt, ExportError>,
    ) -> Result<ExportReceipt, ExportError> {
        match &outcome {
            Ok(receipt) => {
                tracing::info!("export saved: {}", receipt.location);
                self.events.push(SessionEvent::ExportSaved {
                    display_name: receipt.display_name.clone(),
                    location: receipt.location.clone(),
                });
            }
            Err(e) => {
                tracing::error!("{e}");
                self.events.push(SessionEvent::ExportFailed {
                    message: e.to_string(),
                });
            }
        }
        outcome
    }
}
