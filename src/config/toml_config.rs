use crate::config::{
    non_empty, BatchConfig, RenderOptions, RunConfig, RunMode, SingleConfig, SourceKind,
    DEFAULT_FOLDER, DEFAULT_OUTPUT_ROOT,
};
use crate::utils::error::{QrBatchError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub run: RunSection,
    pub single: Option<SingleSection>,
    pub batch: Option<BatchSection>,
    pub render: Option<RenderOptions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeName {
    Single,
    Batch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    pub mode: ModeName,
    #[serde(default)]
    pub save: bool,
    pub output_root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleSection {
    pub content: String,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSection {
    pub source: String,
    pub location: String,
    pub payload: String,
    pub naming: String,
    pub group_by: Option<String>,
    pub folder: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QrBatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QrBatchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| QrBatchError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_root(&self) -> &str {
        self.run.output_root.as_deref().unwrap_or(DEFAULT_OUTPUT_ROOT)
    }

    pub fn to_run_config(&self) -> Result<RunConfig> {
        let mode = match self.run.mode {
            ModeName::Single => {
                let single = validation::validate_required_field("single", &self.single)?;
                RunMode::Single(SingleConfig {
                    content: single.content.clone(),
                    save: self.run.save,
                    filename: non_empty(single.filename.clone()),
                })
            }
            ModeName::Batch => {
                let batch = validation::validate_required_field("batch", &self.batch)?;
                RunMode::Batch(BatchConfig {
                    source: batch.source.parse::<SourceKind>()?,
                    location: batch.location.clone(),
                    payload_template: batch.payload.clone(),
                    naming_template: batch.naming.clone(),
                    group_by: non_empty(batch.group_by.clone()),
                    save: self.run.save,
                    folder: non_empty(batch.folder.clone())
                        .unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
                })
            }
        };

        Ok(RunConfig::new(mode)
            .with_output_root(self.output_root())
            .with_render(self.render.unwrap_or_default()))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_run_config()?.validate()
    }
}
