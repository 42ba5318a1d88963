//! Pixel buffer representation shared by the preview and export pipelines.

use image::RgbaImage;

use crate::error::CoreError;

/// Row-major RGBA8 pixel grid.
///
/// A buffer is owned by the pipeline stage that produced it. Filtering never
/// mutates a buffer in place; it allocates a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelBuffer {
    /// Wrap raw pixels. Fails if `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(CoreError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer where every pixel has the same value.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// New buffer of the same size with `f` applied to every pixel.
    pub fn map_pixels(&self, f: impl Fn([u8; 4]) -> [u8; 4]) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&px| f(px)).collect(),
        }
    }

    /// Flat `RGBARGBA...` view of the pixel data.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Packed RGB bytes with alpha dropped, as JPEG expects.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b, _]| [r, g, b])
            .collect()
    }

    /// Take over the pixel storage of a decoded image.
    ///
    /// The allocation is reused when its capacity allows, so a full-size
    /// decode is not held twice.
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = match bytemuck::allocation::try_cast_vec::<u8, [u8; 4]>(image.into_raw()) {
            Ok(pixels) => pixels,
            Err((_, bytes)) => bytemuck::cast_slice::<u8, [u8; 4]>(&bytes).to_vec(),
        };
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage, CoreError> {
        RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec()).ok_or(
            CoreError::BufferSize {
                width: self.width,
                height: self.height,
                expected: self.width as usize * self.height as usize,
                actual: self.pixels.len(),
            },
        )
    }
}
