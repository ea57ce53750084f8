pub mod etl;
pub mod exporter;
pub mod fetcher;
pub mod pipeline;

pub use crate::domain::model::{ExportRecord, ExportTarget, FetchRequest, Payload, RunSummary};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
