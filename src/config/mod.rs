//! Layered configuration.
//!
//! Embedded defaults sit at the bottom; user config, a repo-local
//! `pixelmill.toml`, and `PIXELMILL_*` environment variables override
//! them in that order.

use std::path::PathBuf;

use anyhow::Result;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;

use crate::storage;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct PixelmillConfig {
    pub pipeline: PipelineConfig,
    pub batch: BatchConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Worker threads (0 = one per CPU core).
    pub workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Extensions accepted by folder discovery, case-insensitive.
    pub extensions: Vec<String>,
    pub recursive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Default multiplier for the brightness filter.
    pub brightness_factor: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output directory; empty selects `~/ProcessedImages`.
    pub directory: String,
    /// Appended to the source file stem when naming results.
    pub suffix: String,
}

impl PixelmillConfig {
    /// Loads the merged configuration. A custom path replaces the
    /// user/repo layers but keeps defaults and env vars.
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            figment = figment.merge(Toml::file(custom_path));
        } else {
            figment = figment
                .merge(Toml::file(Self::user_config_path()))
                .merge(Toml::file("pixelmill.toml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("PIXELMILL_").split("_"));

        Ok(figment.extract()?)
    }

    /// Output directory with the empty-string default resolved.
    pub fn resolved_output_dir(&self) -> PathBuf {
        if self.output.directory.is_empty() {
            storage::default_output_dir()
        } else {
            PathBuf::from(&self.output.directory)
        }
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/pixelmill/config.toml"),
            Err(_) => "~/.config/pixelmill/config.toml".to_string(),
        }
    }
}
