//! Blocking decode-and-resize pipeline.
//!
//! The pipeline is a pure, synchronous function: given a file path and a
//! maximum box, decode the image, normalize EXIF orientation, convert to
//! the canonical BGRA8 layout, and scale to fit while preserving aspect
//! ratio. It holds no shared state and is designed to run concurrently on
//! many worker threads; the cache layer owns all orchestration.

mod error;
mod loader;

pub use error::LoadError;
pub use loader::{load_and_resize, FileLoader, Loader};
