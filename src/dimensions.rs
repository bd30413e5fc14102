//! Width/height pair used as a resize target and cache-key component.

use std::fmt;

/// An immutable width/height pair.
///
/// `Dimensions` plays two roles: a requested "maximum box to fit into"
/// when loading, and the recorded fit box of a cached entry. Aspect ratio
/// is preserved when fitting, so the decoded image may be smaller than the
/// requested box along one axis.
///
/// Both components must be greater than zero; the constructor panics
/// otherwise, since a zero-sized request is a programmer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Create a new dimensions pair.
    ///
    /// # Panics
    ///
    /// Panics if either component is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "dimensions must be positive, got {width}x{height}"
        );
        Self { width, height }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The scale factor that fits a source of the given size inside this box.
    ///
    /// Computed as `min(width / source_width, height / source_height)`.
    /// The ratio exceeds 1.0 for sources smaller than the box: fitting a
    /// small image into a large box enlarges it. This is "fit" semantics,
    /// not "shrink only".
    pub fn fit_ratio(&self, source_width: u32, source_height: u32) -> f64 {
        let rw = f64::from(self.width) / f64::from(source_width);
        let rh = f64::from(self.height) / f64::from(source_height);
        rw.min(rh)
    }

    /// The size of a source image after fitting it inside this box.
    ///
    /// Scaled components are truncated, never rounded up, and clamped to
    /// at least one pixel. A source that already fits exactly is returned
    /// unchanged.
    pub fn fit(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        let ratio = self.fit_ratio(source_width, source_height);
        if ratio == 1.0 {
            return (source_width, source_height);
        }
        let width = (f64::from(source_width) * ratio) as u32;
        let height = (f64::from(source_height) * ratio) as u32;
        (width.max(1), height.max(1))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_components() {
        let dims = Dimensions::new(800, 600);
        assert_eq!(dims.width(), 800);
        assert_eq!(dims.height(), 600);
    }

    #[test]
    #[should_panic(expected = "dimensions must be positive")]
    fn test_zero_width_panics() {
        Dimensions::new(0, 600);
    }

    #[test]
    #[should_panic(expected = "dimensions must be positive")]
    fn test_zero_height_panics() {
        Dimensions::new(800, 0);
    }

    #[test]
    fn test_equality_by_value() {
        assert_eq!(Dimensions::new(100, 200), Dimensions::new(100, 200));
        assert_ne!(Dimensions::new(100, 200), Dimensions::new(200, 100));
    }

    #[test]
    fn test_fit_ratio_landscape_source() {
        // 4000x2000 into an 800x800 box: limited by width.
        let dims = Dimensions::new(800, 800);
        assert!((dims.fit_ratio(4000, 2000) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_fit_exact_downscale() {
        let dims = Dimensions::new(800, 800);
        assert_eq!(dims.fit(4000, 2000), (800, 400));
    }

    #[test]
    fn test_fit_identity_when_already_matching() {
        let dims = Dimensions::new(640, 480);
        assert_eq!(dims.fit(640, 480), (640, 480));
    }

    #[test]
    fn test_fit_enlarges_small_source() {
        // A 10x10 source in a 20x40 box is doubled.
        let dims = Dimensions::new(20, 40);
        assert_eq!(dims.fit(10, 10), (20, 20));
    }

    #[test]
    fn test_fit_never_collapses_to_zero() {
        // An extreme aspect ratio must still produce a 1-pixel axis.
        let dims = Dimensions::new(100, 100);
        let (w, h) = dims.fit(10_000, 10);
        assert_eq!(w, 100);
        assert_eq!(h, 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Dimensions::new(800, 400).to_string(), "800x400");
    }
}
