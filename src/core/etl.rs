use crate::domain::model::RunSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Prepare, fetch, write. The first error ends the run; files already
    /// written stay on disk.
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!("Starting export run");

        self.pipeline.prepare().await?;

        tracing::info!("Fetching data...");
        let payload = self.pipeline.extract().await?;

        tracing::info!("Writing exports...");
        let summary = self.pipeline.load(&payload).await?;

        tracing::info!(
            "Export finished in {:?}, {} file(s) written",
            started.elapsed(),
            summary.written().len()
        );
        Ok(summary)
    }
}
