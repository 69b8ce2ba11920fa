use crate::config::HarvestConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Without any flag the run uses the built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "plastic-harvest")]
#[command(about = "Collect plastic-packaged US products from Open Food Facts into a CSV file")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop requesting pages once this many rows are collected
    #[arg(long)]
    pub target_rows: Option<usize>,

    /// Products requested per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// CSV file to write (overwritten)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Pause between pages, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Search endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliArgs {
    /// Loads the config file when one was given, then applies flag overrides.
    pub fn resolve(&self) -> Result<HarvestConfig> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::default(),
        };

        if let Some(target_rows) = self.target_rows {
            config.extract.target_rows = target_rows;
        }
        if let Some(page_size) = self.page_size {
            config.extract.page_size = page_size;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.extract.request_delay_ms = delay_ms;
        }
        if let Some(output) = &self.output {
            config.load.output_path = output.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.source.endpoint = endpoint.clone();
        }

        Ok(config)
    }
}
