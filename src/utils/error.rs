use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrBatchError {
    #[error("Invalid data source: {kind} (expected csv or json)")]
    InvalidDataSource { kind: String },

    #[error("No data found at {location}: {reason}")]
    DataUnavailable { location: String, reason: String },

    #[error("Invalid data: {message}")]
    InvalidShape { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("QR encoding failed: {message}")]
    EncodeError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Network,
    Io,
    Render,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl QrBatchError {
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        QrBatchError::InvalidShape {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            QrBatchError::InvalidDataSource { .. } => ErrorCategory::Input,
            QrBatchError::DataUnavailable { .. }
            | QrBatchError::InvalidShape { .. }
            | QrBatchError::CsvError(_)
            | QrBatchError::SerializationError(_) => ErrorCategory::Data,
            QrBatchError::ApiError(_) => ErrorCategory::Network,
            QrBatchError::IoError(_) => ErrorCategory::Io,
            QrBatchError::ImageError(_) | QrBatchError::EncodeError { .. } => {
                ErrorCategory::Render
            }
            QrBatchError::ConfigError { .. }
            | QrBatchError::InvalidConfigValueError { .. }
            | QrBatchError::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Config => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Io | ErrorCategory::Render => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            QrBatchError::InvalidDataSource { .. } => "Choose either 'csv' or 'json' as the data source",
            QrBatchError::DataUnavailable { .. } => {
                "Check that the path or URL points at a non-empty file"
            }
            QrBatchError::InvalidShape { .. } => {
                "Provide a CSV file with a header row, or a JSON array of flat objects"
            }
            QrBatchError::CsvError(_) => "Check the CSV file encoding and line endings",
            QrBatchError::SerializationError(_) => "Check that the JSON document is well formed",
            QrBatchError::ApiError(_) => "Check the network connection and the data URL",
            QrBatchError::IoError(_) => "Check file permissions and free disk space",
            QrBatchError::ImageError(_) => "Check that the output directory is writable",
            QrBatchError::EncodeError { .. } => {
                "Shorten the payload template; the content does not fit in a QR code"
            }
            QrBatchError::ConfigError { .. }
            | QrBatchError::InvalidConfigValueError { .. }
            | QrBatchError::MissingConfigError { .. } => {
                "Review the command line flags or the configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QrBatchError::InvalidDataSource { kind } => {
                format!("Unsupported data source '{}'", kind)
            }
            QrBatchError::DataUnavailable { location, .. } => {
                format!("Could not get any data from '{}'", location)
            }
            QrBatchError::InvalidShape { message } => {
                format!("The input data has an unexpected shape: {}", message)
            }
            QrBatchError::ApiError(_) => "Downloading the data failed".to_string(),
            QrBatchError::EncodeError { message } => {
                format!("A QR code could not be generated: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QrBatchError>;
