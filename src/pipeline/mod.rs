//! Concurrent batch-processing pipeline.
//!
//! This module is the concurrency core of the crate:
//!
//! - [`pool`]: fixed-size worker pool executing units with a bounded
//!   concurrency limit and per-unit failure isolation
//! - [`progress`]: race-free (completed, total) aggregation shared by
//!   every concurrently running unit
//! - [`coordinator`]: one-batch orchestration from input discovery to
//!   a single terminal outcome
//! - [`types`]: the unit/result/event vocabulary the pieces exchange
//!
//! The pipeline never touches presentation state; shells observe a
//! batch exclusively through its [`BatchEvent`] channel.

pub mod coordinator;
pub mod pool;
pub mod progress;
pub mod types;


pub use coordinator::{BatchCoordinator, BatchHandle, discover_inputs};
pub use pool::{UnitCallback, WorkerPool};
pub use progress::{ProgressAggregator, ProgressSnapshot};
pub use types::{BatchEvent, BatchOutcome, CompletedUnit, FailedUnit, UnitId, UnitInput, UnitOfWork};
