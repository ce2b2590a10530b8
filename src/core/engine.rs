use crate::core::{LoadReport, Pipeline};
use crate::utils::error::Result;

pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<LoadReport> {
        tracing::info!("Starting batch QR generation");

        tracing::info!("Loading data...");
        let dataset = self.pipeline.extract().await?;
        tracing::info!("Loaded {} records", dataset.records.len());

        tracing::info!("Resolving templates...");
        let manifest = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Resolved {} files in {} groups",
            manifest.entry_count(),
            manifest.group_count()
        );

        tracing::info!("Writing output...");
        let report = self.pipeline.load(manifest).await?;
        if report.saved() {
            tracing::info!("Wrote manifest and {} images", report.images.len());
        }

        Ok(report)
    }
}
