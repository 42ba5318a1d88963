//! JPEG decode/encode.
//!
//! Preview decodes are reduced by an integer sample factor so a large camera
//! frame never has to be held at full size for a small display surface: JPEG
//! input is DCT-scaled by `jpeg-decoder` while decoding, and only the remainder
//! is resampled. Export decodes at full resolution through the `image` crate.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageReader, RgbaImage};
use jpeg_decoder::PixelFormat;

use crate::error::CoreError;
use crate::image::PixelBuffer;

/// Maximum JPEG quality, used for export by default.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// JPEG start-of-image marker.
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Read only the header of an image file and return its `(width, height)`.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), CoreError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
        .map_err(CoreError::Decode)
}

/// Integer reduction factor that still covers the target surface.
///
/// `floor(min(native_w / target_w, native_h / target_h))`, never below 1 so
/// an image is never upsampled. Zero target dimensions are treated as 1.
pub fn sample_factor(native: (u32, u32), target: (u32, u32)) -> u32 {
    let target_w = target.0.max(1);
    let target_h = target.1.max(1);
    (native.0 / target_w).min(native.1 / target_h).max(1)
}

/// Dimensions of an image decoded with the given sample factor.
pub fn sampled_dimensions(native: (u32, u32), factor: u32) -> (u32, u32) {
    let factor = factor.max(1);
    ((native.0 / factor).max(1), (native.1 / factor).max(1))
}

/// Decode the whole image at its native resolution.
pub fn decode_full(path: &Path) -> Result<PixelBuffer, CoreError> {
    Ok(PixelBuffer::from_rgba_image(decode_rgba(path)?))
}

/// Decode the image reduced by `factor` in each dimension.
///
/// The result is exactly [`sampled_dimensions`] of the native size.
pub fn decode_sampled(path: &Path, factor: u32) -> Result<PixelBuffer, CoreError> {
    if factor <= 1 {
        return decode_full(path);
    }
    let native = probe_dimensions(path)?;
    let (width, height) = sampled_dimensions(native, factor);

    let decoded = match decode_jpeg_scaled(path, (width, height))? {
        Some(image) => image,
        None => decode_rgba(path)?,
    };
    let reduced = if decoded.dimensions() == (width, height) {
        decoded
    } else {
        let (dw, dh) = decoded.dimensions();
        tracing::trace!("resampling {dw}x{dh} -> {width}x{height}");
        image::imageops::resize(&decoded, width, height, FilterType::Triangle)
    };
    tracing::debug!(
        "sampled decode {}x{} -> {width}x{height} (1/{factor})",
        native.0,
        native.1
    );
    Ok(PixelBuffer::from_rgba_image(reduced))
}

/// Encode a buffer as baseline JPEG. Alpha is dropped and `quality` is
/// clamped to `1..=100`.
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, CoreError> {
    let mut out = Cursor::new(Vec::new());
    let quality = quality.clamp(1, MAX_JPEG_QUALITY);
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(
            &buffer.to_rgb_bytes(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(CoreError::Encode)?;
    Ok(out.into_inner())
}

fn decode_rgba(path: &Path) -> Result<RgbaImage, CoreError> {
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(CoreError::Decode)?;
    Ok(image.into_rgba8())
}

/// DCT-scaled JPEG decode to the smallest 1/1, 1/2, 1/4 or 1/8 size that still
/// covers `target`.
///
/// `Ok(None)` when the file is not a JPEG or its pixel format is not RGB or
/// grayscale; the caller falls back to a full decode then.
fn decode_jpeg_scaled(path: &Path, target: (u32, u32)) -> Result<Option<RgbaImage>, CoreError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut magic = [0u8; 2];
    if reader.read_exact(&mut magic).is_err() || magic != JPEG_SOI {
        return Ok(None);
    }
    reader.seek(SeekFrom::Start(0))?;

    let mut decoder = jpeg_decoder::Decoder::new(reader);
    decoder.read_info()?;
    let (width, height) = decoder.scale(to_u16(target.0), to_u16(target.1))?;
    let Some(info) = decoder.info() else {
        return Ok(None);
    };
    let raw = decoder.decode()?;

    let rgba: Vec<u8> = match info.pixel_format {
        PixelFormat::RGB24 => raw
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        PixelFormat::L8 => raw.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        other => {
            tracing::debug!("no scaled decode for {other:?}");
            return Ok(None);
        }
    };
    Ok(RgbaImage::from_raw(u32::from(width), u32::from(height), rgba))
}

fn to_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
