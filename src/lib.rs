pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::{RunConfig, RunMode};
pub use core::{engine::BatchEngine, pipeline::BatchPipeline, runner::execute};
pub use utils::error::{QrBatchError, Result};
