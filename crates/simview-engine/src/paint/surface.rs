use std::fmt;
use std::path::Path;

/// Error returned when building a [`Surface`] from external pixel data.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// Byte buffer length does not match `width * height * 4`.
    SizeMismatch { expected: usize, actual: usize },
    /// Image file could not be read or decoded.
    Decode(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::SizeMismatch { expected, actual } => {
                write!(f, "surface data is {actual} bytes, expected {expected}")
            }
            SurfaceError::Decode(msg) => write!(f, "image decode error: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// CPU-side RGBA8 image (straight alpha, sRGB, row-major, top row first).
///
/// Surfaces are the upload source for body textures and pre-rendered text.
/// The display consumes them by value when drawing text, so a surface never
/// outlives the frame it was queued in unless the caller keeps a copy.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)],
        }
    }

    /// Creates a surface filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(byte_len(width, height));
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&rgba);
        }
        Self { width, height, pixels }
    }

    /// Wraps raw RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SurfaceError> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(SurfaceError::SizeMismatch { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Converts a decoded image.
    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self { width, height, pixels: rgba.into_raw() }
    }

    /// Decodes an image file (PNG, JPEG, BMP or GIF).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SurfaceError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| SurfaceError::Decode(format!("{}: {e}", path.display())))?;
        Ok(Self::from_image(&image))
    }

    /// Decodes an in-memory image file.
    pub fn decode(bytes: &[u8]) -> Result<Self, SurfaceError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| SurfaceError::Decode(e.to_string()))?;
        Ok(Self::from_image(&image))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[i..i + 4]);
        Some(out)
    }

    /// Overwrites the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&rgba);
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[inline]
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_transparent() {
        let s = Surface::new(3, 2);
        assert_eq!(s.pixels().len(), 24);
        assert!(s.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn solid_fills_every_pixel() {
        let s = Surface::solid(2, 2, [1, 2, 3, 4]);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(s.pixel(x, y), Some([1, 2, 3, 4]));
            }
        }
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert!(Surface::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            Surface::from_rgba8(2, 2, vec![0; 15]),
            Err(SurfaceError::SizeMismatch { expected: 16, actual: 15 })
        );
    }

    #[test]
    fn put_pixel_is_row_major() {
        let mut s = Surface::new(3, 2);
        s.put_pixel(2, 1, [9, 9, 9, 9]);
        assert_eq!(&s.pixels()[20..24], &[9, 9, 9, 9]);
        s.put_pixel(3, 0, [1, 1, 1, 1]);
        assert_eq!(s.pixel(3, 0), None);
    }

    #[test]
    fn from_image_keeps_dimensions() {
        let img = image::DynamicImage::new_rgba8(5, 7);
        let s = Surface::from_image(&img);
        assert_eq!((s.width(), s.height()), (5, 7));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(Surface::decode(b"not an image"), Err(SurfaceError::Decode(_))));
    }
}
