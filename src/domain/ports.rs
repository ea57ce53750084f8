use crate::domain::model::{Payload, RunSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn create_dir_all(&self, dir: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Runs before the fetch so a bad output location fails without a network call.
    async fn prepare(&self) -> Result<()>;
    async fn extract(&self) -> Result<Payload>;
    async fn load(&self, payload: &Payload) -> Result<RunSummary>;
}
