//! # pixelmill - Concurrent Batch Image Filtering
//!
//! pixelmill applies per-pixel filters (grayscale, invert, brightness)
//! to one or many images through a bounded worker pool, with race-free
//! progress reporting and per-image failure isolation.
//!
//! ## Features
//!
//! - **Bounded concurrency**: a fixed worker pool caps simultaneous
//!   transforms regardless of batch size
//! - **Failure isolation**: one corrupt image never aborts its siblings;
//!   a batch always terminates with a full accounting
//! - **Observable progress**: lock-free (completed, total) snapshots
//!   streamed to the shell over an event channel
//! - **Collision-free persistence**: processed images land under unique,
//!   counter-suffixed names
//!
//! ## Quick Start
//!
//! ```bash
//! # Install pixelmill
//! cargo install pixelmill
//!
//! # Invert one image
//! pixelmill apply photo.png --filter invert
//!
//! # Grayscale a whole folder on 8 workers
//! pixelmill batch ./shots --filter grayscale --workers 8
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod image;
pub mod pipeline;
pub mod storage;

pub use engine::FilterEngine;
pub use error::{PixelmillError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
