use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One product entry as returned by the search API.
///
/// Fields are sparse: a key the API left out is simply absent from `data`.
/// Key order follows the upstream object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

/// Records from a single search request.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    pub records: Vec<Record>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    Exhausted { page: u32 },
    FetchFailed { page: u32, message: String },
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::TargetReached => write!(f, "target reached"),
            StopReason::Exhausted { page } => write!(f, "page {} came back empty", page),
            StopReason::FetchFailed { page, message } => {
                write!(f, "stopped by error on page {}: {}", page, message)
            }
        }
    }
}

/// Everything collected in one run, in fetch order.
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest {
    pub records: Vec<Record>,
    pub requests_made: u32,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabularExport {
    pub columns: Vec<String>,
    pub row_count: usize,
    pub csv_output: Vec<u8>,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: String,
    pub row_count: usize,
    pub stop_reason: StopReason,
}
