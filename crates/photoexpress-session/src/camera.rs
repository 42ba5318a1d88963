//! Camera collaborator.

use std::future::Future;

use crate::provider::ContentUri;

/// Result reported by the camera once the capture activity ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraOutcome {
    /// The destination now holds a valid JPEG.
    Saved,
    /// The user backed out.
    Cancelled,
    /// The camera could not produce a picture.
    Failed(String),
}

/// Something that can take a picture into a writable destination.
///
/// The camera only ever sees the shareable reference, never the raw path.
pub trait Camera {
    fn take_picture(&self, destination: &ContentUri) -> impl Future<Output = CameraOutcome> + Send;
}
