//! Core key types for the pixmap cache.

use crate::dimensions::Dimensions;
use std::path::{Path, PathBuf};

/// Cache key uniquely identifying a resized image.
///
/// Two requests for the same file at different dimensions are distinct
/// entries; the cache never derives one size from an already-cached larger
/// image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Absolute, normalized file path.
    pub path: PathBuf,
    /// The requested fit box.
    pub dimensions: Dimensions,
}

impl CacheKey {
    /// Create a new cache key, normalizing the path.
    ///
    /// # Panics
    ///
    /// Panics on an empty path: that is a programmer error, not a missing
    /// file.
    pub fn new(path: &Path, dimensions: Dimensions) -> Self {
        Self {
            path: normalize_path(path),
            dimensions,
        }
    }
}

/// Normalize a path to its absolute form.
///
/// Relative and absolute references to the same file must collide in the
/// cache, so every key passes through here before lookup. The file does
/// not need to exist; `std::path::absolute` is lexical, so keys for files
/// that were already moved or deleted still normalize consistently.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    assert!(
        !path.as_os_str().is_empty(),
        "cache key path must not be empty"
    );
    // Fails only if the current directory is gone; keep the key usable.
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_relative_and_absolute_keys_collide() {
        let relative = normalize_path(Path::new("photos/cat.png"));
        let absolute = env::current_dir().unwrap().join("photos/cat.png");
        assert_eq!(relative, normalize_path(&absolute));
    }

    #[test]
    fn test_absolute_path_unchanged() {
        let path = Path::new("/photos/cat.png");
        assert_eq!(normalize_path(path), PathBuf::from("/photos/cat.png"));
    }

    #[test]
    fn test_current_dir_components_removed() {
        let with_dot = normalize_path(Path::new("/photos/./cat.png"));
        assert_eq!(with_dot, PathBuf::from("/photos/cat.png"));
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_path_panics() {
        normalize_path(Path::new(""));
    }

    #[test]
    fn test_keys_differ_by_dimensions() {
        let a = CacheKey::new(Path::new("/p/img.png"), Dimensions::new(100, 100));
        let b = CacheKey::new(Path::new("/p/img.png"), Dimensions::new(200, 200));
        assert_ne!(a, b);
        assert_eq!(a.path, b.path);
    }
}
