#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to decode JPEG: {0}")]
    Jpeg(#[from] jpeg_decoder::Error),
    #[error("failed to encode JPEG: {0}")]
    Encode(image::ImageError),
    #[error("pixel buffer {width}x{height} needs {expected} pixels, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
