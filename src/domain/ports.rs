use crate::domain::model::{Dataset, LoadReport, Manifest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Output sink rooted at the run's output directory. Paths are relative to that root.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn create_dir_all(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Settings the batch pipeline reads, independent of where they came from.
pub trait ConfigProvider: Send + Sync {
    fn source_kind(&self) -> crate::config::SourceKind;
    fn data_location(&self) -> &str;
    fn payload_template(&self) -> &str;
    fn naming_template(&self) -> &str;
    fn group_by(&self) -> Option<&str>;
    fn save(&self) -> bool;
    fn folder_name(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<Manifest>;
    async fn load(&self, manifest: Manifest) -> Result<LoadReport>;
}
