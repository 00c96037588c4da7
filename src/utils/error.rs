use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upstream returned status {status} for {url}")]
    UpstreamStatusError { status: u16, url: String },

    #[error("Upstream request timed out after {timeout_secs}s")]
    UpstreamTimeoutError { timeout_secs: u64 },

    #[error("Malformed upstream response: {message}")]
    MalformedResponseError { message: String },

    #[error("Unable to fetch FX data from upstream and fallback snapshot is not available: {message}")]
    DataUnavailable { message: String },

    #[error("No rate data available between {start} and {end}")]
    EmptyResult { start: String, end: String },

    #[error("Invalid input for '{field}' ('{value}'): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ('{value}'): {reason}")]
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
    Upstream,
    Data,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FxError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FxError::HttpError(_)
            | FxError::UpstreamStatusError { .. }
            | FxError::UpstreamTimeoutError { .. }
            | FxError::MalformedResponseError { .. } => ErrorCategory::Upstream,
            FxError::DataUnavailable { .. } | FxError::EmptyResult { .. } => ErrorCategory::Data,
            FxError::InvalidInput { .. } => ErrorCategory::Input,
            FxError::ConfigError { .. }
            | FxError::InvalidConfigValueError { .. }
            | FxError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FxError::IoError(_) | FxError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 上游失敗會被 fallback 吸收
            ErrorCategory::Upstream => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Data => match self {
                FxError::EmptyResult { .. } => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於可由 fallback 快照處理的上游錯誤
    pub fn is_upstream_failure(&self) -> bool {
        self.category() == ErrorCategory::Upstream
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FxError::DataUnavailable { .. } => {
                "FX data is currently unavailable (upstream and fallback both failed)".to_string()
            }
            FxError::EmptyResult { .. } => {
                "No rate data available for the specified date range".to_string()
            }
            FxError::InvalidInput { reason, .. } => reason.clone(),
            FxError::ConfigError { message } => format!("Invalid configuration: {}", message),
            FxError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            FxError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Upstream => "Check network connectivity to the rate provider",
            ErrorCategory::Data => match self {
                FxError::EmptyResult { .. } => "Try a wider date range that includes business days",
                _ => "Check your connection or regenerate the fallback snapshot with fetch-snapshot",
            },
            ErrorCategory::Input => "Use YYYY-MM-DD dates with start <= end and breakdown 'day' or 'none'",
            ErrorCategory::Configuration => "Review the command line flags or the TOML config file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, FxError>;
