//! Notifications emitted by the session controller for the UI layer.

use photoexpress_core::BrightnessLevel;
use serde::{Deserialize, Serialize};

/// Outbound session notifications.
///
/// Queued by the controller and drained by whoever drives the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    /// A new photo replaced the previous one and the preview is ready.
    PhotoCaptured {
        display_name: String,
        /// Preview buffer width.
        width: u32,
        /// Preview buffer height.
        height: u32,
        scale_factor: u32,
    },

    /// The camera was cancelled or failed. State did not change.
    CaptureCancelled,

    /// The captured file could not be decoded for preview.
    PreviewUnavailable {
        message: String,
    },

    BrightnessChanged {
        level: BrightnessLevel,
    },

    /// Commit accepted; the commit control is disabled until completion.
    ExportStarted {
        display_name: String,
    },

    /// Transient confirmation that the adjusted photo was saved.
    ExportSaved {
        display_name: String,
        location: String,
    },

    ExportFailed {
        message: String,
    },
}
