use crate::core::exporter::Exporter;
use crate::core::fetcher::Fetcher;
use crate::domain::model::{ExportTarget, FetchRequest, Payload, RunSummary};
use crate::domain::ports::{Pipeline, Storage};
use crate::utils::error::Result;

/// Fetch one URL, then write JSON and/or CSV, in that order.
pub struct ExportPipeline<S: Storage> {
    fetcher: Fetcher,
    exporter: Exporter<S>,
    request: FetchRequest,
    target: ExportTarget,
}

impl<S: Storage> ExportPipeline<S> {
    pub fn new(storage: S, request: FetchRequest, target: ExportTarget) -> Self {
        Self {
            fetcher: Fetcher::new(),
            exporter: Exporter::new(storage),
            request,
            target,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for ExportPipeline<S> {
    async fn prepare(&self) -> Result<()> {
        tracing::debug!("Ensuring output directory {}", self.target.directory.display());
        self.exporter.prepare(&self.target).await
    }

    async fn extract(&self) -> Result<Payload> {
        tracing::debug!(
            "Requesting {} (timeout {:?}, up to {} attempts, {:?} apart)",
            self.request.url,
            self.request.timeout,
            self.request.max_attempts(),
            self.request.retry_delay
        );

        match self.fetcher.fetch(&self.request).await {
            Ok(payload) => {
                tracing::debug!("Fetched payload from {}", self.request.url);
                Ok(payload)
            }
            Err(err) => {
                tracing::warn!(
                    "Fetch from {} failed after {} attempt(s): {}",
                    self.request.url,
                    err.attempts,
                    err.message
                );
                Err(err.into())
            }
        }
    }

    async fn load(&self, payload: &Payload) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        if self.target.format.wants_json() {
            let path = self.exporter.export_json(payload, &self.target).await?;
            tracing::info!("✅ JSON export: {}", path.display());
            summary.json_path = Some(path);
        }

        if self.target.format.wants_csv() {
            let path = self.exporter.export_csv(payload, &self.target).await?;
            tracing::info!("✅ CSV export: {}", path.display());
            summary.csv_path = Some(path);
        }

        Ok(summary)
    }
}
