pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::storage::LocalStorage;
pub use crate::config::{CliArgs, EnvConfig, RunConfig};
pub use crate::core::{
    etl::ExportEngine, exporter::Exporter, fetcher::Fetcher, pipeline::ExportPipeline,
};
pub use crate::domain::model::{ExportFormat, ExportTarget, FetchRequest, Payload, RunSummary};
pub use crate::utils::error::{ExportError, FetchError, Result};
