pub mod etl;
pub mod export;
pub mod pipeline;

pub use crate::domain::model::{Harvest, Record, TabularExport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ProductSource, Storage};
pub use crate::utils::error::Result;
