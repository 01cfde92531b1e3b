use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP error! Status: {status}")]
    HttpStatusError { status: u16 },

    #[error("Backend reported an error: {message}")]
    RemoteError { message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No {what} available")]
    EmptyInput { what: String },

    #[error("Value {value} does not fall into any salary range")]
    UnboundedValue { value: f64 },

    #[error("Salary {value} is not a finite number")]
    NonFiniteValue { value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InsightsError {
    pub fn empty(what: impl Into<String>) -> Self {
        Self::EmptyInput { what: what.into() }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } | Self::RemoteError { .. } => {
                ErrorCategory::Network
            }
            Self::SerializationError(_)
            | Self::EmptyInput { .. }
            | Self::UnboundedValue { .. }
            | Self::NonFiniteValue { .. } => ErrorCategory::Data,
            Self::ZipError(_) | Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => match self {
                Self::EmptyInput { .. } => ErrorSeverity::Low,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Storage => ErrorSeverity::Critical,
            ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the insights backend is running and that api.base_url is correct"
            }
            ErrorCategory::Data => "The backend returned data that cannot be summarized; check the dataset",
            ErrorCategory::Storage => "Check that report.output_path exists and is writable",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags and retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_timeout() => "The backend did not respond in time".to_string(),
            Self::ApiError(_) => "Could not reach the insights backend".to_string(),
            Self::HttpStatusError { status } => format!("The backend answered with status {}", status),
            Self::EmptyInput { what } => format!("No data available ({})", what),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
