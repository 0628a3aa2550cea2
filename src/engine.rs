//! Front door for presentation shells.
//!
//! One shared [`WorkerPool`] serves both entry points: the interactive
//! single-image path and whole-folder batches, exactly as the submitting
//! shell sees them. Results are always delivered asynchronously over
//! channels; the engine never blocks a submitter.

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam::channel::{Receiver, bounded};

use crate::error::Result;
use crate::filter::FilterKind;
use crate::image::{FileLoader, ImageBuffer, ImageLoader};
use crate::pipeline::{BatchCoordinator, BatchHandle, CompletedUnit, UnitOfWork, WorkerPool};

pub struct FilterEngine {
    pool: Arc<WorkerPool>,
}

impl FilterEngine {
    /// Engine with disk-backed decoding; `workers` of 0 selects one
    /// worker per CPU core.
    pub fn new(workers: usize) -> Self {
        Self::with_loader(workers, Arc::new(FileLoader))
    }

    pub fn with_loader(workers: usize, loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            pool: Arc::new(WorkerPool::new(workers, loader)),
        }
    }

    /// Applies one filter to one decoded image. The result arrives on
    /// the returned channel once a worker picks the unit up.
    pub fn submit_single(
        &self,
        source: PathBuf,
        image: ImageBuffer,
        filter: FilterKind,
    ) -> Result<Receiver<CompletedUnit>> {
        let (sender, receiver) = bounded(1);
        self.pool.submit(
            UnitOfWork::decoded(source, image, filter),
            Box::new(move |done| {
                let _ = sender.send(done);
            }),
        )?;
        Ok(receiver)
    }

    /// Runs a whole-folder batch. Progress and the terminal outcome are
    /// streamed on the handle's event channel.
    pub fn run_batch(&self, units: Vec<UnitOfWork>) -> BatchHandle {
        BatchCoordinator::new(Arc::clone(&self.pool)).run(units)
    }

    /// Finishes outstanding units and stops the workers.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Rgb;

    #[test]
    fn single_unit_round_trip() {
        let engine = FilterEngine::new(2);
        let image = ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb::new(1.0, 0.0, 0.0)
            } else {
                Rgb::new(0.0, 1.0, 0.0)
            }
        })
        .unwrap();

        let receiver = engine
            .submit_single(PathBuf::from("button.png"), image, FilterKind::Invert)
            .unwrap();
        let done = receiver.recv().unwrap();

        assert_eq!(done.source, PathBuf::from("button.png"));
        let inverted = done.result.unwrap();
        assert_eq!(inverted.pixel(0, 0), Rgb::new(0.0, 1.0, 1.0));
        assert_eq!(inverted.pixel(1, 0), Rgb::new(1.0, 0.0, 1.0));
    }
}
