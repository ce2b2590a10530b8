pub mod cli;
pub mod prompt;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{QrBatchError, Result};
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_OUTPUT_ROOT: &str = "./Out";
pub const DEFAULT_FOLDER: &str = "QRCode";
pub const MANIFEST_FILE: &str = "data.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    Json,
}

impl FromStr for SourceKind {
    type Err = QrBatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(SourceKind::Csv),
            "json" => Ok(SourceKind::Json),
            other => Err(QrBatchError::InvalidDataSource {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Csv => write!(f, "csv"),
            SourceKind::Json => write!(f, "json"),
        }
    }
}

/// Raster and terminal rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Pixels per QR module in PNG output.
    pub scale: u32,
    /// Quiet zone width, in modules.
    pub border: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 4,
            border: 4,
        }
    }
}

impl Validate for RenderOptions {
    fn validate(&self) -> Result<()> {
        validation::validate_range("render.scale", self.scale, 1, 64)?;
        validation::validate_range("render.border", self.border, 0, 16)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleConfig {
    pub content: String,
    pub save: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub source: SourceKind,
    pub location: String,
    pub payload_template: String,
    pub naming_template: String,
    pub group_by: Option<String>,
    pub save: bool,
    pub folder: String,
}

impl ConfigProvider for BatchConfig {
    fn source_kind(&self) -> SourceKind {
        self.source
    }

    fn data_location(&self) -> &str {
        &self.location
    }

    fn payload_template(&self) -> &str {
        &self.payload_template
    }

    fn naming_template(&self) -> &str {
        &self.naming_template
    }

    fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    fn save(&self) -> bool {
        self.save
    }

    fn folder_name(&self) -> &str {
        &self.folder
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Single(SingleConfig),
    Batch(BatchConfig),
}

/// Everything a run needs, gathered up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: RunMode,
    pub output_root: PathBuf,
    pub render: RenderOptions,
}

impl RunConfig {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            render: RenderOptions::default(),
        }
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_root", &self.output_root.to_string_lossy())?;
        self.render.validate()?;

        if let RunMode::Batch(batch) = &self.mode {
            validation::validate_location("batch.location", &batch.location)?;
            validation::validate_non_empty_string("batch.folder", &batch.folder)?;
        }
        Ok(())
    }
}

/// Empty answers mean "not given".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "qr-batch")]
#[command(about = "Generate QR codes from a URL or in bulk from CSV/JSON data")]
pub struct CliConfig {
    /// Path to a TOML run file; skips prompts and the flags below
    #[arg(short, long)]
    pub config: Option<String>,

    /// Batch mode: generate one QR code per input record
    #[arg(long)]
    pub batch: bool,

    /// Data source kind for batch mode (csv or json)
    #[arg(long)]
    pub source: Option<String>,

    /// URL or text to encode in single mode
    #[arg(long)]
    pub content: Option<String>,

    /// Write PNG files (and the manifest in batch mode)
    #[arg(long)]
    pub save: bool,

    /// Local path or http(s) URL of the batch data
    #[arg(long)]
    pub data: Option<String>,

    /// Payload template, e.g. https://example.com/$$<id>
    #[arg(long)]
    pub format: Option<String>,

    /// Field to group records by
    #[arg(long)]
    pub group_by: Option<String>,

    /// File naming template, e.g. $$<id>-$$<name>
    #[arg(long)]
    pub naming: Option<String>,

    /// Folder for batch images, under the output root
    #[arg(long, default_value = DEFAULT_FOLDER)]
    pub folder: String,

    /// File name for the single-mode image
    #[arg(long)]
    pub filename: Option<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT_ROOT)]
    pub output_root: String,

    #[arg(long, default_value = "4")]
    pub scale: u32,

    #[arg(long, default_value = "4")]
    pub border: u32,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// True when the flags describe a full run and no prompting is needed.
    pub fn is_scripted(&self) -> bool {
        self.batch || self.content.is_some()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            scale: self.scale,
            border: self.border,
        }
    }

    pub fn to_run_config(&self) -> Result<RunConfig> {
        let mode = if self.batch {
            let source: SourceKind =
                validation::validate_required_field("source", &self.source)?.parse()?;
            let location = validation::validate_required_field("data", &self.data)?;
            let payload_template = validation::validate_required_field("format", &self.format)?;
            let naming_template = validation::validate_required_field("naming", &self.naming)?;

            RunMode::Batch(BatchConfig {
                source,
                location: location.clone(),
                payload_template: payload_template.clone(),
                naming_template: naming_template.clone(),
                group_by: non_empty(self.group_by.clone()),
                save: self.save,
                folder: self.folder.clone(),
            })
        } else {
            let content = validation::validate_required_field("content", &self.content)?;
            RunMode::Single(SingleConfig {
                content: content.clone(),
                save: self.save,
                filename: non_empty(self.filename.clone()),
            })
        };

        Ok(RunConfig::new(mode)
            .with_output_root(&self.output_root)
            .with_render(self.render_options()))
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_root", &self.output_root)?;
        self.render_options().validate()
    }
}
