//! Error types for the decode pipeline.
//!
//! A missing source file is not represented here: callers receive
//! `Ok(None)` for that case, since files routinely disappear between
//! discovery and display. These errors cover the genuinely unexpected
//! conditions, kept distinct so logs can tell an unreadable file from a
//! corrupt one.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and resizing one image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content could not be decoded as an image.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = LoadError::Io {
            path: PathBuf::from("/photos/a.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(format!("{err}"), "failed to read /photos/a.png: denied");
    }

    #[test]
    fn test_decode_error_display() {
        let err = LoadError::Decode {
            path: PathBuf::from("/photos/b.jpg"),
            source: image::ImageError::Unsupported(
                image::error::UnsupportedError::from_format_and_kind(
                    image::error::ImageFormatHint::Unknown,
                    image::error::UnsupportedErrorKind::GenericFeature("bad".into()),
                ),
            ),
        };
        assert!(format!("{err}").starts_with("failed to decode /photos/b.jpg"));
    }
}
