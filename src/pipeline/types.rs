//! Types shared across the pipeline.

use std::path::PathBuf;

use crate::error::PixelmillError;
use crate::filter::FilterKind;
use crate::image::ImageBuffer;
use crate::pipeline::progress::ProgressSnapshot;

/// Ticket handed back by `WorkerPool::submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub u64);

/// Where a unit's pixels come from.
///
/// The interactive path submits an already-decoded buffer; the batch
/// path submits `Unloaded` so decoding happens on a worker and a decode
/// failure stays contained to that unit.
#[derive(Debug, Clone)]
pub enum UnitInput {
    Decoded(ImageBuffer),
    Unloaded,
}

/// One (image, filter) pair scheduled for execution.
///
/// Identity is the source path. A unit is consumed exactly once by the
/// pool and receives exactly one completion callback.
#[derive(Debug, Clone)]
pub struct UnitOfWork {
    pub source: PathBuf,
    pub input: UnitInput,
    pub filter: FilterKind,
}

impl UnitOfWork {
    pub fn decoded(source: PathBuf, image: ImageBuffer, filter: FilterKind) -> Self {
        Self {
            source,
            input: UnitInput::Decoded(image),
            filter,
        }
    }

    pub fn from_path(source: PathBuf, filter: FilterKind) -> Self {
        Self {
            source,
            input: UnitInput::Unloaded,
            filter,
        }
    }
}

/// What a worker hands to the unit's callback.
#[derive(Debug)]
pub struct CompletedUnit {
    pub id: UnitId,
    pub source: PathBuf,
    pub result: std::result::Result<ImageBuffer, PixelmillError>,
}

/// One failed unit in a batch: path plus the stringified error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUnit {
    pub source: PathBuf,
    pub error: String,
}

/// Terminal outcome of a batch. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    PartialFailure(Vec<FailedUnit>),
}

/// Messages streamed from a running batch to the presentation layer.
///
/// The core never touches presentation state directly; anything a shell
/// wants to display it reads from this channel.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Progress(ProgressSnapshot),
    UnitFinished { source: PathBuf, succeeded: bool },
    Finished(BatchOutcome),
}
