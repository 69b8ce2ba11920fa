pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::adapters::{http::SearchClient, storage::LocalStorage};
pub use crate::config::HarvestConfig;
pub use crate::core::{etl::EtlEngine, pipeline::HarvestPipeline};
pub use crate::domain::model::{Harvest, Page, Record, RunSummary, StopReason, TabularExport};
pub use crate::utils::error::{EtlError, Result};
