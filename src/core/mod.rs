pub mod engine;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod runner;
pub mod single;
pub mod template;

pub use crate::domain::model::{Dataset, HeaderSet, LoadReport, Manifest, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
