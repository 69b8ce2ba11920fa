#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://world.openfoodfacts.org/cgi/search.pl";
pub const DEFAULT_OUTPUT_PATH: &str = "plastic_data.csv";
pub const DEFAULT_TARGET_ROWS: usize = 35_000;
pub const DEFAULT_PAGE_SIZE: usize = 1_000;
pub const MAX_PAGE_SIZE: usize = 1_000;

pub const DEFAULT_FIELDS: &[&str] = &[
    "code",
    "product_name",
    "brands",
    "packaging_tags",
    "packaging_text",
    "ingredients_text",
    "ecoscore_grade",
    "countries_en",
];

/// Run configuration. Every section defaults to the constants above, so an
/// empty TOML document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub country: String,
    pub packaging: String,
    pub fields: Vec<String>,
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            country: "united states".to_string(),
            packaging: "plastic".to_string(),
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            timeout_seconds: 30,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub target_rows: usize,
    pub page_size: usize,
    pub request_delay_ms: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            target_rows: DEFAULT_TARGET_ROWS,
            page_size: DEFAULT_PAGE_SIZE,
            request_delay_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

impl ConfigProvider for HarvestConfig {
    fn endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn fields(&self) -> &[String] {
        &self.source.fields
    }

    fn country(&self) -> &str {
        &self.source.country
    }

    fn packaging(&self) -> &str {
        &self.source.packaging
    }

    fn target_rows(&self) -> usize {
        self.extract.target_rows
    }

    fn page_size(&self) -> usize {
        self.extract.page_size
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.extract.request_delay_ms)
    }

    fn user_agent(&self) -> &str {
        self.source.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl Validate for HarvestConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        validation::validate_non_empty_string("source.country", &self.source.country)?;
        validation::validate_non_empty_string("source.packaging", &self.source.packaging)?;
        validation::validate_field_list("source.fields", &self.source.fields)?;
        validation::validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 300)?;
        validation::validate_positive_number("extract.target_rows", self.extract.target_rows, 1)?;
        validation::validate_range("extract.page_size", self.extract.page_size, 1, MAX_PAGE_SIZE)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        Ok(())
    }
}
