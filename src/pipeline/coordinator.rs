//! Whole-folder batch orchestration.
//!
//! A coordinator turns an ordered set of units into a single logical
//! operation: every unit goes through the shared pool, every completion
//! (success or failure) counts toward progress, and exactly one terminal
//! outcome is emitted once the completed count reaches the total.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crossbeam::channel::{Receiver, Sender, unbounded};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{PixelmillError, Result};
use crate::image::ImageBuffer;
use crate::pipeline::pool::WorkerPool;
use crate::pipeline::progress::{ProgressAggregator, ProgressSnapshot};
use crate::pipeline::types::{BatchEvent, BatchOutcome, FailedUnit, UnitOfWork};

/// Per-batch state shared with the unit completion callbacks.
struct BatchShared {
    progress: ProgressAggregator,
    failures: Mutex<Vec<FailedUnit>>,
    outputs: Mutex<HashMap<PathBuf, ImageBuffer>>,
    events: Sender<BatchEvent>,
}

impl BatchShared {
    /// Books one finished unit. The call that observes the final
    /// snapshot emits the terminal event; the increment is atomic, so
    /// exactly one call does.
    fn complete(&self, source: PathBuf, result: std::result::Result<ImageBuffer, PixelmillError>) {
        let succeeded = result.is_ok();
        match result {
            Ok(image) => {
                self.outputs.lock().expect("output lock poisoned").insert(source.clone(), image);
            }
            Err(err) => {
                self.failures.lock().expect("failure lock poisoned").push(FailedUnit {
                    source: source.clone(),
                    error: err.to_string(),
                });
            }
        }

        // A failed unit still counts toward completion so the batch
        // always terminates.
        let Ok(snapshot) = self.progress.record_completion() else {
            return;
        };
        let _ = self.events.send(BatchEvent::UnitFinished { source, succeeded });
        let _ = self.events.send(BatchEvent::Progress(snapshot));
        if snapshot.is_complete() {
            let _ = self.events.send(BatchEvent::Finished(self.outcome()));
        }
    }

    fn outcome(&self) -> BatchOutcome {
        let failures = self.failures.lock().expect("failure lock poisoned");
        if failures.is_empty() {
            BatchOutcome::AllSucceeded
        } else {
            BatchOutcome::PartialFailure(failures.clone())
        }
    }
}

/// Orchestrates one batch run against a shared [`WorkerPool`].
pub struct BatchCoordinator {
    pool: Arc<WorkerPool>,
}

impl BatchCoordinator {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self { pool }
    }

    /// Submits every unit and returns a handle to the running batch.
    ///
    /// Consumes the coordinator: an instance drives exactly one batch
    /// and there is no way back from the terminal state. A batch with
    /// zero units terminates immediately as `AllSucceeded`.
    pub fn run(self, units: Vec<UnitOfWork>) -> BatchHandle {
        let (events, receiver) = unbounded();
        let shared = Arc::new(BatchShared {
            progress: ProgressAggregator::new(),
            failures: Mutex::new(Vec::new()),
            outputs: Mutex::new(HashMap::new()),
            events,
        });
        shared.progress.initialize(units.len());
        debug!(total = units.len(), "batch started");

        if units.is_empty() {
            let _ = shared.events.send(BatchEvent::Finished(BatchOutcome::AllSucceeded));
            return BatchHandle { receiver, shared };
        }

        for unit in units {
            let source = unit.source.clone();
            let callback_shared = Arc::clone(&shared);
            let submitted = self.pool.submit(
                unit,
                Box::new(move |done| callback_shared.complete(done.source, done.result)),
            );
            // A rejected submission is booked as that unit's failure so
            // the batch still reaches its terminal outcome.
            if let Err(err) = submitted {
                shared.complete(source, Err(err));
            }
        }

        BatchHandle { receiver, shared }
    }
}

/// Live view of a running batch: its event stream, progress, and the
/// transformed images collected so far.
pub struct BatchHandle {
    receiver: Receiver<BatchEvent>,
    shared: Arc<BatchShared>,
}

impl BatchHandle {
    /// The batch's event stream, terminated by `BatchEvent::Finished`.
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.receiver
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> ProgressSnapshot {
        self.shared
            .progress
            .snapshot()
            .expect("aggregator initialized at batch start")
    }

    /// Blocks until the terminal event and returns the outcome.
    pub fn wait(&self) -> BatchOutcome {
        loop {
            match self.receiver.recv() {
                Ok(BatchEvent::Finished(outcome)) => return outcome,
                Ok(_) => continue,
                // Channel closed without a terminal event; reconstruct
                // the outcome from the batch state.
                Err(_) => return self.shared.outcome(),
            }
        }
    }

    /// Drains the transformed images stored under their source identity.
    /// Complete once the terminal event has fired.
    pub fn take_outputs(&self) -> Vec<(PathBuf, ImageBuffer)> {
        let mut outputs = self.shared.outputs.lock().expect("output lock poisoned");
        outputs.drain().collect()
    }
}

/// Enumerates processable images in a folder.
///
/// Extension matching is case-insensitive and results are sorted, so
/// discovery order is stable across runs. Unreadable entries below the
/// root are skipped with a warning; an unreadable root is fatal.
pub fn discover_inputs(folder: &Path, extensions: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(folder).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut inputs = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(PixelmillError::FolderUnreadable {
                    path: folder.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|accepted| accepted.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        if matches {
            inputs.push(entry.into_path());
        }
    }
    inputs.sort();
    Ok(inputs)
}
