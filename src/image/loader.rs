//! Image decoding behind the [`ImageLoader`] capability.

use std::path::Path;

use crate::error::{PixelmillError, Result};
use crate::image::{ImageBuffer, Rgb};

/// Decodes a file into the normalized in-memory representation.
///
/// The pipeline only ever talks to this trait, so tests can substitute
/// in-memory loaders and the decode backend stays swappable.
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<ImageBuffer>;
}

/// Disk-backed loader using the `image` crate for decoding.
#[derive(Debug, Default)]
pub struct FileLoader;

impl ImageLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<ImageBuffer> {
        let decoded = image_rs::open(path).map_err(|err| PixelmillError::LoadFailure {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;
        let rgb = decoded.to_rgb32f();
        let (width, height) = rgb.dimensions();
        let samples = rgb.pixels().map(|px| Rgb::new(px[0], px[1], px[2])).collect();
        ImageBuffer::new(width, height, samples)
    }
}
