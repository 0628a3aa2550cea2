//! Per-pixel filters.
//!
//! Filters are pure functions from one [`ImageBuffer`] to a new one of
//! identical dimensions. Dispatch goes through the closed [`FilterKind`]
//! enum and the single [`apply`] entry point; adding a filter means
//! adding a variant, not a new type.

use crate::error::{PixelmillError, Result};
use crate::image::{ImageBuffer, Rgb};

/// The set of supported per-pixel transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// Channel mean replicated to R = G = B.
    Grayscale,
    /// `1.0 - c` per channel.
    Invert,
    /// `min(c * factor, 1.0)` per channel; `factor` must be positive.
    Brightness { factor: f32 },
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Grayscale => "grayscale",
            FilterKind::Invert => "invert",
            FilterKind::Brightness { .. } => "brightness",
        }
    }

    /// Rejects parameters the transform cannot run with.
    pub fn validate(&self) -> Result<()> {
        if let FilterKind::Brightness { factor } = *self {
            // `!(factor > 0.0)` also catches NaN.
            if !(factor > 0.0) {
                return Err(PixelmillError::InvalidFactor { factor });
            }
        }
        Ok(())
    }
}

/// Applies `filter` to `input`, producing a new buffer.
pub fn apply(input: &ImageBuffer, filter: FilterKind) -> Result<ImageBuffer> {
    filter.validate()?;
    Ok(match filter {
        FilterKind::Grayscale => input.map(grayscale),
        FilterKind::Invert => input.map(invert),
        FilterKind::Brightness { factor } => input.map(|px| brighten(px, factor)),
    })
}

fn grayscale(px: Rgb) -> Rgb {
    let gray = (px.r + px.g + px.b) / 3.0;
    Rgb::new(gray, gray, gray)
}

fn invert(px: Rgb) -> Rgb {
    Rgb::new(1.0 - px.r, 1.0 - px.g, 1.0 - px.b)
}

fn brighten(px: Rgb, factor: f32) -> Rgb {
    Rgb::new(
        (px.r * factor).min(1.0),
        (px.g * factor).min(1.0),
        (px.b * factor).min(1.0),
    )
}
