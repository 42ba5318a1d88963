//! Live preview of the captured photo at display resolution.

use std::path::PathBuf;

use photoexpress_core::codec;
use photoexpress_core::{ColorTransform, CoreError, ImageFilterEngine, PixelBuffer};
use serde::{Deserialize, Serialize};

use crate::capture::CapturedPhoto;

/// Size of the surface the preview is shown on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("no photo loaded for preview")]
    NoPhoto,
    #[error("preview unavailable for {}: {source}", .path.display())]
    Decode { path: PathBuf, source: CoreError },
}

/// The pristine downsampled decode every render starts from.
#[derive(Debug)]
struct LoadedPreview {
    native: (u32, u32),
    scale_factor: u32,
    pristine: PixelBuffer,
}

/// Holds the downsampled decode of the current photo and renders it through
/// the filter on demand.
#[derive(Debug, Default)]
pub struct PreviewController {
    loaded: Option<LoadedPreview>,
}

impl PreviewController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `photo` reduced to roughly fit `viewport`.
    ///
    /// On failure the previously loaded preview, if any, is kept.
    pub fn load_for_preview(
        &mut self,
        photo: &CapturedPhoto,
        viewport: Viewport,
    ) -> Result<&PixelBuffer, PreviewError> {
        let decode_err = |source: CoreError| PreviewError::Decode {
            path: photo.path.clone(),
            source,
        };

        let native = codec::probe_dimensions(&photo.path).map_err(decode_err)?;
        let scale_factor = codec::sample_factor(native, (viewport.width, viewport.height));
        let pristine = codec::decode_sampled(&photo.path, scale_factor).map_err(decode_err)?;

        tracing::info!(
            "preview decoded {}: {}x{} at 1/{scale_factor} -> {}x{}",
            photo.display_name,
            native.0,
            native.1,
            pristine.width(),
            pristine.height()
        );

        let loaded = self.loaded.insert(LoadedPreview {
            native,
            scale_factor,
            pristine,
        });
        Ok(&loaded.pristine)
    }

    /// Filter the pristine decode with `transform`.
    ///
    /// Always starts from the unfiltered decode, so successive renders never
    /// compound.
    pub fn render(&self, transform: &ColorTransform) -> Result<PixelBuffer, PreviewError> {
        let loaded = self.loaded.as_ref().ok_or(PreviewError::NoPhoto)?;
        Ok(ImageFilterEngine::apply(&loaded.pristine, transform))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn scale_factor(&self) -> Option<u32> {
        self.loaded.as_ref().map(|l| l.scale_factor)
    }

    pub fn native_dimensions(&self) -> Option<(u32, u32)> {
        self.loaded.as_ref().map(|l| l.native)
    }

    pub fn pristine(&self) -> Option<&PixelBuffer> {
        self.loaded.as_ref().map(|l| &l.pristine)
    }
}
