use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Fetch failed on page {page}: {message}")]
    FetchFailure { page: u32, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn fetch_failure(page: u32, err: impl std::fmt::Display) -> Self {
        EtlError::FetchFailure {
            page,
            message: err.to_string(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ApiError(_)
            | EtlError::HttpStatusError { .. }
            | EtlError::FetchFailure { .. } => ErrorSeverity::Medium,
            EtlError::CsvError(_) | EtlError::SerializationError(_) => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EtlError::ConfigError { .. }
                | EtlError::MissingConfigError { .. }
                | EtlError::InvalidConfigValueError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) | EtlError::FetchFailure { .. } => {
                "Check network connectivity and rerun; the search API is occasionally slow"
            }
            EtlError::HttpStatusError { .. } => {
                "The search API rejected the request; check the endpoint and filters"
            }
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "The collected data could not be serialized; rerun with --verbose for details"
            }
            EtlError::IoError(_) => "Check that the output path is writable",
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
