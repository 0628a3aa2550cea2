//! `pixelmill batch`: filter every image in a folder concurrently.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;

use crate::cli::Output;
use crate::cli::commands::{FilterArg, resolve_filter};
use crate::config::PixelmillConfig;
use crate::engine::FilterEngine;
use crate::error::PixelmillError;
use crate::pipeline::{BatchEvent, BatchHandle, BatchOutcome, UnitOfWork, discover_inputs};
use crate::storage::{self, CounterNamer, PersistenceNamer};

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Folder containing the images to process
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Filter to apply to every image
    #[arg(short, long, value_enum)]
    pub filter: FilterArg,

    /// Brightness multiplier (only meaningful with --filter brightness)
    #[arg(long)]
    pub factor: Option<f32>,

    /// Worker threads (overrides config; 0 = one per CPU core)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Recurse into subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Output directory (default from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

pub fn execute(args: BatchArgs, config: &PixelmillConfig, out: &Output) -> Result<()> {
    let filter = resolve_filter(args.filter, args.factor, config);
    filter.validate()?;

    out.step(&format!("Discovering images in {}", args.folder.display()));
    let recursive = args.recursive || config.batch.recursive;
    let inputs = discover_inputs(&args.folder, &config.batch.extensions, recursive)?;
    if inputs.is_empty() {
        return Err(PixelmillError::EmptyFolder { path: args.folder }.into());
    }
    out.info(&format!("{} images found", inputs.len()));

    let workers = args.workers.unwrap_or(config.pipeline.workers);
    let engine = FilterEngine::new(workers);
    let units = inputs
        .iter()
        .map(|path| UnitOfWork::from_path(path.clone(), filter))
        .collect();

    let handle = engine.run_batch(units);
    let bar = out.progress_bar(inputs.len() as u64, "filtering");
    let outcome = drive_progress(&handle, &bar);
    bar.finish_and_clear();

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.resolved_output_dir());
    let saved = save_outputs(&handle, &output_dir, config, out)?;

    match outcome {
        BatchOutcome::AllSucceeded => {
            out.success(&format!(
                "Processed {} images into {}",
                saved,
                output_dir.display()
            ));
        }
        BatchOutcome::PartialFailure(failures) => {
            out.warning(&format!(
                "{} of {} images failed",
                failures.len(),
                inputs.len()
            ));
            for failure in &failures {
                out.list_item(&format!("{}: {}", failure.source.display(), failure.error));
            }
            out.success(&format!(
                "Saved {} processed images into {}",
                saved,
                output_dir.display()
            ));
        }
    }
    Ok(())
}

/// Mirrors the batch's event stream onto the progress bar until the
/// terminal event arrives.
fn drive_progress(handle: &BatchHandle, bar: &ProgressBar) -> BatchOutcome {
    for event in handle.events().iter() {
        match event {
            BatchEvent::Progress(snapshot) => bar.set_position(snapshot.completed as u64),
            BatchEvent::UnitFinished { source, succeeded } => {
                let name = source
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source.display().to_string());
                bar.set_message(if succeeded { name } else { format!("{name} failed") });
            }
            BatchEvent::Finished(outcome) => return outcome,
        }
    }
    handle.wait()
}

fn save_outputs(
    handle: &BatchHandle,
    output_dir: &std::path::Path,
    config: &PixelmillConfig,
    out: &Output,
) -> Result<usize> {
    let mut outputs = handle.take_outputs();
    // Save in discovery order, not completion order.
    outputs.sort_by(|a, b| a.0.cmp(&b.0));

    let namer = CounterNamer;
    let mut saved = 0;
    for (source, image) in outputs {
        let desired = output_dir.join(storage::processed_name(&source, &config.output.suffix));
        let target = namer.unique_name(&desired);
        storage::save_image(&image, &target)?;
        out.verbose(&format!("{} -> {}", source.display(), target.display()));
        saved += 1;
    }
    Ok(saved)
}
