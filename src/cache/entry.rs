//! One resident decoded-and-resized image.

use crate::dimensions::Dimensions;
use crate::pixmap::Pixmap;
use std::sync::Arc;

/// A resident cache entry: a decoded pixmap plus the fit box it was
/// produced for.
///
/// `dimensions` is the *requested* box (the cache-key component); the
/// pixmap itself records the actual decoded size, which never exceeds the
/// box on either axis because the pipeline preserves aspect ratio.
///
/// Cloning is cheap: the pixel buffer is shared behind an `Arc`.
/// Consumers hold clones; the buffer itself stays immutable.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pixmap: Arc<Pixmap>,
    dimensions: Dimensions,
}

impl CacheEntry {
    /// Create an entry from a freshly decoded pixmap.
    pub fn new(pixmap: Pixmap, dimensions: Dimensions) -> Self {
        Self {
            pixmap: Arc::new(pixmap),
            dimensions,
        }
    }

    /// The decoded pixel buffer.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// The requested fit box this entry was decoded for.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Resident size estimate: `height * width * bytes-per-pixel`.
    pub fn size_bytes(&self) -> usize {
        self.pixmap.size_bytes()
    }

    /// Whether two entries share the same underlying pixel buffer.
    ///
    /// Used to verify that operations like rename move entries without
    /// copying or re-decoding pixels.
    pub fn same_pixmap(&self, other: &CacheEntry) -> bool {
        Arc::ptr_eq(&self.pixmap, &other.pixmap)
    }
}
