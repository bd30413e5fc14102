//! Image loading: decode, orient, convert, resize.

use crate::dimensions::Dimensions;
use crate::pipeline::error::LoadError;
use crate::pixmap::Pixmap;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::ErrorKind;
use std::path::Path;
use tracing::trace;

/// Trait seam for the decode pipeline.
///
/// The cache drives loads through this trait so that tests can substitute
/// an instrumented implementation (counting pipeline executions, injecting
/// failures) without touching the filesystem. Implementations must be
/// thread-safe: the worker pool calls `load` from many threads at once.
pub trait Loader: Send + Sync + 'static {
    /// Load the image at `path` and fit it inside `max_dimensions`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    fn load(&self, path: &Path, max_dimensions: Dimensions) -> Result<Option<Pixmap>, LoadError>;
}

/// Production loader backed by [`load_and_resize`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl Loader for FileLoader {
    fn load(&self, path: &Path, max_dimensions: Dimensions) -> Result<Option<Pixmap>, LoadError> {
        load_and_resize(path, max_dimensions)
    }
}

/// Decode the image at `path` and fit it inside `max_dimensions`.
///
/// The full pipeline, in order:
///
/// 1. decode the file (format guessed from content, not extension);
/// 2. apply EXIF orientation so the buffer is stored upright regardless
///    of camera-rotation metadata;
/// 3. upconvert to four channels and swap R/B into the canonical BGRA8
///    display layout;
/// 4. scale to fit the box with bilinear filtering when the fit ratio is
///    not exactly 1 (small sources are enlarged, see
///    [`Dimensions::fit_ratio`]).
///
/// A missing file yields `Ok(None)`: files disappear between discovery and
/// display as a matter of course, and callers treat this as "nothing to
/// show". Unreadable or corrupt files are real errors.
///
/// This function blocks on I/O and decode work; run it on a worker thread,
/// never on the presentation thread.
pub fn load_and_resize(
    path: &Path,
    max_dimensions: Dimensions,
) -> Result<Option<Pixmap>, LoadError> {
    let reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    let reader = reader.with_guessed_format().map_err(|err| LoadError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;

    let mut decoder = reader.into_decoder().map_err(|err| LoadError::Decode {
        path: path.to_path_buf(),
        source: err,
    })?;

    // Unreadable orientation metadata is not worth failing the whole load.
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);

    let mut img = DynamicImage::from_decoder(decoder).map_err(|err| LoadError::Decode {
        path: path.to_path_buf(),
        source: err,
    })?;
    img.apply_orientation(orientation);

    let (source_width, source_height) = (img.width(), img.height());
    let ratio = max_dimensions.fit_ratio(source_width, source_height);
    let img = if ratio != 1.0 {
        let (width, height) = max_dimensions.fit(source_width, source_height);
        img.resize_exact(width, height, FilterType::Triangle)
    } else {
        img
    };

    trace!(
        path = %path.display(),
        source_width,
        source_height,
        fitted_width = img.width(),
        fitted_height = img.height(),
        ratio,
        "decoded and resized image"
    );

    Ok(Some(into_bgra_pixmap(img)))
}

/// Convert a decoded image into the canonical BGRA8 pixmap.
///
/// Greyscale and RGB sources are upconverted to four channels first, then
/// the red and blue channels are swapped into display order.
fn into_bgra_pixmap(img: DynamicImage) -> Pixmap {
    let (width, height) = (img.width(), img.height());
    let mut rgba = img.into_rgba8();
    for pixel in rgba.pixels_mut() {
        pixel.0.swap(0, 2);
    }
    Pixmap::from_bgra8(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::fs;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, img: &DynamicImage) -> std::path::PathBuf {
        let path = dir.path().join(name);
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_absent_not_error() {
        let result = load_and_resize(
            Path::new("/nonexistent/path.png"),
            Dimensions::new(100, 100),
        );
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.png");
        fs::write(&path, b"this is not a png").unwrap();

        let result = load_and_resize(&path, Dimensions::new(100, 100));
        assert!(matches!(result, Err(LoadError::Decode { .. })));
    }

    #[test]
    fn test_fit_resize_is_exact() {
        // 4000x2000 into an 800x800 box must come out exactly 800x400.
        let dir = TempDir::new().unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::new(4000, 2000));
        let path = write_png(&dir, "wide.png", &img);

        let pixmap = load_and_resize(&path, Dimensions::new(800, 800))
            .unwrap()
            .unwrap();
        assert_eq!(pixmap.width(), 800);
        assert_eq!(pixmap.height(), 400);
    }

    #[test]
    fn test_small_source_is_enlarged() {
        let dir = TempDir::new().unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        let path = write_png(&dir, "small.png", &img);

        let pixmap = load_and_resize(&path, Dimensions::new(20, 40))
            .unwrap()
            .unwrap();
        assert_eq!(pixmap.width(), 20);
        assert_eq!(pixmap.height(), 20);
    }

    // Minimal baseline JPEG: a single grayscale 4x2 raster (one all-zero
    // MCU, mid-grey) carrying an EXIF APP1 segment with orientation 6
    // (rotate 90 CW to display upright).
    const ROTATED_JPEG: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x22, 0x45, 0x78, 0x69, 0x66, 0x00, 0x00,
        0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01, 0x00, 0x12, 0x01,
        0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x10, 0x10, 0x10, 0x10, 0x10,
        0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
        0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
        0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
        0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
        0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0xFF,
        0xC0, 0x00, 0x0B, 0x08, 0x00, 0x02, 0x00, 0x04, 0x01, 0x01, 0x11, 0x00,
        0xFF, 0xC4, 0x00, 0x14, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xC4,
        0x00, 0x14, 0x10, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xDA, 0x00, 0x08,
        0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, 0x3F, 0xFF, 0xD9,
    ];

    #[test]
    fn test_exif_orientation_is_applied_before_fit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rotated.jpg");
        fs::write(&path, ROTATED_JPEG).unwrap();

        // The stored raster is 4x2; orientation 6 stands it upright as 2x4.
        let pixmap = load_and_resize(&path, Dimensions::new(2, 4))
            .unwrap()
            .unwrap();
        assert_eq!(pixmap.width(), 2);
        assert_eq!(pixmap.height(), 4);
        assert_eq!(&pixmap.data()[..4], &[128, 128, 128, 255]);
    }

    #[test]
    fn test_exif_orientation_feeds_the_upright_size_into_fit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rotated.jpg");
        fs::write(&path, ROTATED_JPEG).unwrap();

        // Fitting the upright 2x4 into an 8x8 box doubles it; the stored
        // 4x2 raster would have come out 8x4 instead.
        let pixmap = load_and_resize(&path, Dimensions::new(8, 8))
            .unwrap()
            .unwrap();
        assert_eq!(pixmap.width(), 4);
        assert_eq!(pixmap.height(), 8);
    }

    #[test]
    fn test_matching_source_is_not_resampled() {
        let dir = TempDir::new().unwrap();
        let mut img = RgbaImage::new(8, 8);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        let path = write_png(&dir, "exact.png", &DynamicImage::ImageRgba8(img));

        let pixmap = load_and_resize(&path, Dimensions::new(8, 8))
            .unwrap()
            .unwrap();
        assert_eq!(pixmap.width(), 8);
        assert_eq!(pixmap.height(), 8);
        // R/B swapped into BGRA, pixel values otherwise untouched.
        assert_eq!(&pixmap.data()[..4], &[30, 20, 10, 255]);
    }

    #[test]
    fn test_rgb_channels_swapped_to_bgra() {
        let dir = TempDir::new().unwrap();
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0])); // pure red
        img.put_pixel(1, 0, Rgb([0, 0, 255])); // pure blue
        let path = write_png(&dir, "rb.png", &DynamicImage::ImageRgb8(img));

        let pixmap = load_and_resize(&path, Dimensions::new(2, 1))
            .unwrap()
            .unwrap();
        // Red lands in the third byte, blue in the first.
        assert_eq!(&pixmap.data()[..4], &[0, 0, 255, 255]);
        assert_eq!(&pixmap.data()[4..8], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_greyscale_upconverts_to_four_channels() {
        let dir = TempDir::new().unwrap();
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            4,
            4,
            image::Luma([128]),
        ));
        let path = write_png(&dir, "grey.png", &img);

        let pixmap = load_and_resize(&path, Dimensions::new(4, 4))
            .unwrap()
            .unwrap();
        assert_eq!(pixmap.data().len(), 4 * 4 * 4);
        assert_eq!(&pixmap.data()[..4], &[128, 128, 128, 255]);
    }

    #[test]
    fn test_file_loader_delegates() {
        let dir = TempDir::new().unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::new(16, 16));
        let path = write_png(&dir, "delegate.png", &img);

        let pixmap = FileLoader
            .load(&path, Dimensions::new(8, 8))
            .unwrap()
            .unwrap();
        assert_eq!(pixmap.dimensions(), Dimensions::new(8, 8));
    }
}
