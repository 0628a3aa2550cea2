//! Command-line interface for pixelmill.
//!
//! This module provides the main CLI structure and command dispatch.
//! It uses clap for argument parsing; the commands themselves live in
//! [`commands`].

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

use crate::config::PixelmillConfig;

/// pixelmill - concurrent image filtering from the terminal
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Apply a filter to a single image
    Apply(commands::apply::ApplyArgs),
    /// Filter every image in a folder concurrently
    Batch(commands::batch::BatchArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = Output::new(self.verbose, self.quiet);
        let config = PixelmillConfig::load(self.config.as_deref())?;

        match self.command {
            Some(Commands::Apply(args)) => commands::apply::execute(args, &config, &output),
            Some(Commands::Batch(args)) => commands::batch::execute(args, &config, &output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}
