//! Persisting processed images without name collisions.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PixelmillError, Result};
use crate::image::ImageBuffer;

/// Derives a target name that does not collide with existing files.
pub trait PersistenceNamer {
    fn unique_name(&self, desired: &Path) -> PathBuf;
}

/// Appends `_1`, `_2`, ... before the extension until the name is free.
#[derive(Debug, Default)]
pub struct CounterNamer;

impl PersistenceNamer for CounterNamer {
    fn unique_name(&self, desired: &Path) -> PathBuf {
        if !desired.exists() {
            return desired.to_path_buf();
        }
        let stem = desired.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
        let extension = desired.extension().and_then(|s| s.to_str());
        let parent = desired.parent().unwrap_or_else(|| Path::new("."));
        let mut counter = 1;
        loop {
            let name = match extension {
                Some(ext) => format!("{stem}_{counter}.{ext}"),
                None => format!("{stem}_{counter}"),
            };
            let candidate = parent.join(name);
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Default location for processed images: `~/ProcessedImages`.
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ProcessedImages")
}

/// Names a processed derivative: `photo.jpg` -> `photo_processed.png`.
pub fn processed_name(source: &Path, suffix: &str) -> PathBuf {
    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    PathBuf::from(format!("{stem}{suffix}.png"))
}

/// Encodes the buffer as an 8-bit image, creating parent directories as
/// needed. The format follows the target extension; targets without one
/// get PNG.
pub fn save_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| PixelmillError::SaveFailure {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;
    }

    let mut encoded = image_rs::RgbImage::new(image.width(), image.height());
    for (x, y, out) in encoded.enumerate_pixels_mut() {
        let px = image.pixel(x, y);
        *out = image_rs::Rgb([to_u8(px.r), to_u8(px.g), to_u8(px.b)]);
    }

    let result = if path.extension().is_some() {
        encoded.save(path)
    } else {
        encoded.save_with_format(path, image_rs::ImageFormat::Png)
    };
    result.map_err(|err| PixelmillError::SaveFailure {
        path: path.to_path_buf(),
        source: Box::new(err),
    })?;
    debug!(path = %path.display(), "image saved");
    Ok(())
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
