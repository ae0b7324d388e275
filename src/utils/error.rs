use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Fetching {url} failed with HTTP status {status}")]
    FatalFetchError { url: String, status: u16 },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InputValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, CrawlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parsing,
    Input,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CrawlError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::FatalFetchError { .. } => ErrorCategory::Network,
            Self::ParseError { .. } | Self::UrlError(_) => ErrorCategory::Parsing,
            Self::InputValidationError { .. } => ErrorCategory::Input,
            Self::TomlError(_) | Self::ConfigError { .. } | Self::MissingConfigError { .. } => {
                ErrorCategory::Configuration
            }
            Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤可以透過 offset / start-page 重跑
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Parsing | ErrorCategory::Input | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Suggests how to continue after the run stopped.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) | Self::FatalFetchError { .. } => {
                "The archive may be busy. Re-run later; use --start-page or --offset to resume where the run stopped."
            }
            Self::ParseError { .. } => {
                "The page layout did not match the expected result table. Check the query URL for this year."
            }
            Self::InputValidationError { .. } => "Check the command line arguments.",
            Self::UrlError(_) | Self::TomlError(_) | Self::ConfigError { .. } | Self::MissingConfigError { .. } => {
                "Check the configuration file."
            }
            Self::CsvError(_) | Self::IoError(_) => {
                "Check that the input files exist and the output directory is writable."
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::FatalFetchError { url, status } => {
                format!("The archive answered {} for {}", status, url)
            }
            Self::InputValidationError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_are_retryable_severity() {
        let err = CrawlError::FatalFetchError {
            url: "https://aad.archives.gov/aad/".to_string(),
            status: 500,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("500"));
    }

    #[test]
    fn test_input_errors_are_high_severity() {
        let err = CrawlError::InputValidationError {
            field: "page_size".to_string(),
            value: "15".to_string(),
            reason: "must be one of 10, 20, 50".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.user_friendly_message(),
            "Invalid page_size: must be one of 10, 20, 50"
        );
    }
}
