//! Command implementations for the pixelmill CLI.
//!
//! Each command lives in its own module with an `execute` function
//! taking its parsed arguments, the loaded configuration, and the
//! output handler.

pub mod apply;
pub mod batch;

use clap::ValueEnum;

use crate::config::PixelmillConfig;
use crate::filter::FilterKind;

/// Filter selector shared by the apply and batch commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    Grayscale,
    Invert,
    Brightness,
}

/// Builds the concrete filter from the CLI selector; a missing
/// brightness factor falls back to the configured default.
pub(crate) fn resolve_filter(
    arg: FilterArg,
    factor: Option<f32>,
    config: &PixelmillConfig,
) -> FilterKind {
    match arg {
        FilterArg::Grayscale => FilterKind::Grayscale,
        FilterArg::Invert => FilterKind::Invert,
        FilterArg::Brightness => FilterKind::Brightness {
            factor: factor.unwrap_or(config.filter.brightness_factor),
        },
    }
}
