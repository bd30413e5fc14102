//! Decoded pixel buffer in the canonical display layout.

use crate::dimensions::Dimensions;
use std::fmt;

/// Bytes per pixel in the canonical BGRA8 layout.
pub const BYTES_PER_PIXEL: usize = 4;

/// A decoded, in-memory bitmap ready for display.
///
/// Pixels are stored row-major in BGRA8 order, the layout the presentation
/// layer uploads directly (ARGB32 on a little-endian host). Every source
/// mode is upconverted to four channels during decode, so the buffer length
/// is always `width * height * 4`.
///
/// A `Pixmap` is immutable after construction and safe to share by
/// reference across threads.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Create a pixmap from a raw BGRA8 buffer.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or the buffer length does not
    /// match `width * height * 4`. Both are programmer errors: the decode
    /// pipeline always produces a consistent buffer.
    pub fn from_bgra8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert!(width > 0 && height > 0, "pixmap dimensions must be positive");
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        assert_eq!(
            data.len(),
            expected,
            "pixmap buffer length {} does not match {}x{} BGRA8",
            data.len(),
            width,
            height
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Actual decoded size as a dimensions pair.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Raw BGRA8 pixel data, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Estimated resident size: `height * width * bytes-per-pixel`.
    pub fn size_bytes(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}

impl fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}
