//! Session state owned by the controller.

use photoexpress_core::{BrightnessLevel, ColorTransform};
use serde::{Deserialize, Serialize};

use crate::capture::CapturedPhoto;
use crate::export::ExportRequest;

/// Snapshot of a session, taken by
/// [`SessionController::state`](crate::SessionController::state).
///
/// Background work receives an [`ExportRequest`] instead of a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// The current photo. `None` until the first successful capture.
    pub photo: Option<CapturedPhoto>,
    /// Slider position. Reset to neutral on every new capture.
    pub brightness: BrightnessLevel,
    /// Whether an export is running. Commit is disabled while set.
    pub export_in_flight: bool,
}

impl SessionState {
    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn preview_visible(&self) -> bool {
        self.has_photo()
    }

    pub fn brightness_control_visible(&self) -> bool {
        self.has_photo()
    }

    pub fn commit_enabled(&self) -> bool {
        self.has_photo() && !self.export_in_flight
    }

    pub fn transform(&self) -> ColorTransform {
        ColorTransform::from_brightness(self.brightness)
    }

    /// Snapshot of what an export right now would write.
    pub fn export_request(&self) -> Option<ExportRequest> {
        self.photo.as_ref().map(|photo| ExportRequest {
            photo: photo.clone(),
            transform: self.transform(),
        })
    }
}
