//! `pixelmill apply`: one filter, one image.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::cli::Output;
use crate::cli::commands::{FilterArg, resolve_filter};
use crate::config::PixelmillConfig;
use crate::engine::FilterEngine;
use crate::image::{FileLoader, ImageLoader};
use crate::storage::{self, CounterNamer, PersistenceNamer};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Image file to process
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Filter to apply
    #[arg(short, long, value_enum)]
    pub filter: FilterArg,

    /// Brightness multiplier (only meaningful with --filter brightness)
    #[arg(long)]
    pub factor: Option<f32>,

    /// Explicit output path (default: unique name in the output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ApplyArgs, config: &PixelmillConfig, out: &Output) -> Result<()> {
    let filter = resolve_filter(args.filter, args.factor, config);
    filter.validate()?;

    out.step(&format!(
        "Applying {} to {}",
        filter.name(),
        args.image.display()
    ));
    let image = FileLoader.load(&args.image)?;

    let engine = FilterEngine::new(config.pipeline.workers);
    let receiver = engine.submit_single(args.image.clone(), image, filter)?;
    let done = receiver.recv()?;
    let processed = done.result?;

    let target = match args.output {
        Some(path) => path,
        None => {
            let desired = config
                .resolved_output_dir()
                .join(storage::processed_name(&args.image, &config.output.suffix));
            CounterNamer.unique_name(&desired)
        }
    };
    storage::save_image(&processed, &target)?;
    out.success(&format!("Saved {}", target.display()));
    Ok(())
}
