use crate::config::cli::LocalStorage;
use crate::config::{RunConfig, RunMode};
use crate::core::engine::BatchEngine;
use crate::core::pipeline::BatchPipeline;
use crate::core::single::{SingleOutcome, SingleRun};
use crate::core::LoadReport;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Single(SingleOutcome),
    Batch(LoadReport),
}

/// Runs a fully described job against the filesystem under `output_root`.
pub async fn execute(config: RunConfig) -> Result<RunOutcome> {
    config.validate()?;

    let storage = LocalStorage::new(config.output_root.clone());
    tracing::debug!("Output root: {}", storage.base_path().display());

    match config.mode {
        RunMode::Single(single) => {
            let outcome = SingleRun::new(storage, single, config.render).run().await?;
            Ok(RunOutcome::Single(outcome))
        }
        RunMode::Batch(batch) => {
            tracing::info!(
                "Batch run: {} data from {}",
                batch.source,
                batch.location
            );
            let pipeline = BatchPipeline::new(storage, batch).with_render(config.render);
            let report = BatchEngine::new(pipeline).run().await?;
            Ok(RunOutcome::Batch(report))
        }
    }
}
