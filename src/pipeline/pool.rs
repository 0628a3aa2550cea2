//! Bounded worker pool executing units with a fixed concurrency limit.
//!
//! A fixed set of worker threads pulls jobs from one shared channel:
//! at most `limit` transforms run at any instant, queued units start in
//! FIFO submission order, and completion order is whatever the workers
//! produce. Submission never blocks the caller.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam::channel::{Receiver, Sender, unbounded};
use tracing::{debug, warn};

use crate::error::{PixelmillError, Result};
use crate::filter;
use crate::image::{ImageBuffer, ImageLoader};
use crate::pipeline::types::{CompletedUnit, UnitId, UnitInput, UnitOfWork};

/// Callback invoked exactly once per submitted unit, on a worker thread.
pub type UnitCallback = Box<dyn FnOnce(CompletedUnit) + Send + 'static>;

struct Job {
    id: UnitId,
    unit: UnitOfWork,
    callback: UnitCallback,
}

/// Fixed-size execution engine for [`UnitOfWork`] submissions.
pub struct WorkerPool {
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    limit: usize,
    next_id: AtomicU64,
}

impl WorkerPool {
    /// Spawns `limit` worker threads; 0 selects one per CPU core.
    pub fn new(limit: usize, loader: Arc<dyn ImageLoader>) -> Self {
        let limit = if limit == 0 { num_cpus::get() } else { limit };
        let (sender, receiver) = unbounded::<Job>();

        let mut workers = Vec::with_capacity(limit);
        for worker_id in 0..limit {
            let receiver = receiver.clone();
            let loader = Arc::clone(&loader);
            let handle = std::thread::Builder::new()
                .name(format!("pixelmill-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, receiver, loader))
                .expect("failed to spawn worker thread");
            workers.push(handle);
        }

        Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            limit,
            next_id: AtomicU64::new(0),
        }
    }

    /// Maximum number of units with an active transform at any instant.
    pub fn concurrency_limit(&self) -> usize {
        self.limit
    }

    /// Queues a unit for execution and returns immediately.
    ///
    /// Excess units wait in an unbounded FIFO queue, so the caller is
    /// never blocked on a free slot. Fails with `PoolShutdown` once
    /// [`shutdown`](Self::shutdown) has run.
    pub fn submit(&self, unit: UnitOfWork, callback: UnitCallback) -> Result<UnitId> {
        let sender = self.sender.lock().expect("pool sender lock poisoned");
        let Some(sender) = sender.as_ref() else {
            return Err(PixelmillError::PoolShutdown);
        };
        let id = UnitId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(unit = %unit.source.display(), filter = unit.filter.name(), "unit queued");
        sender
            .send(Job { id, unit, callback })
            .map_err(|_| PixelmillError::PoolShutdown)?;
        Ok(id)
    }

    /// Stops accepting submissions and waits for the workers to finish.
    ///
    /// In-flight units complete and already-queued units are drained
    /// normally; every one of them still receives its callback.
    pub fn shutdown(&self) {
        drop(self.sender.lock().expect("pool sender lock poisoned").take());
        let mut workers = self.workers.lock().expect("pool worker lock poisoned");
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(worker_id: usize, receiver: Receiver<Job>, loader: Arc<dyn ImageLoader>) {
    while let Ok(Job { id, unit, callback }) = receiver.recv() {
        let source = unit.source.clone();
        debug!(worker_id, unit = %source.display(), "unit started");
        let result = execute_unit(unit, loader.as_ref());
        if let Err(err) = &result {
            warn!(worker_id, unit = %source.display(), error = %err, "unit failed");
        }
        callback(CompletedUnit { id, source, result });
    }
}

/// Resolves the unit's input and applies its filter.
///
/// Failures, including panics inside the transform, stay contained to
/// this unit; they never take down the worker or its siblings.
fn execute_unit(unit: UnitOfWork, loader: &dyn ImageLoader) -> Result<ImageBuffer> {
    let UnitOfWork {
        source,
        input,
        filter,
    } = unit;
    let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<ImageBuffer> {
        let image = match input {
            UnitInput::Decoded(image) => image,
            UnitInput::Unloaded => loader.load(&source)?,
        };
        filter::apply(&image, filter)
    }));
    outcome.unwrap_or_else(|panic| {
        Err(PixelmillError::TransformFailure {
            reason: panic_message(panic),
        })
    })
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "transform panicked".to_string()
    }
}
