use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    #[error("GeoJSON error: {message}")]
    GeoJson { message: String },

    #[error("Could not read feed {source_path}: {error}")]
    FeedRead {
        source_path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { status: u16, url: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
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
    Network,
    Storage,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used by the binaries. `Low` is treated as success.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl MapError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        MapError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn geojson(message: impl Into<String>) -> Self {
        MapError::GeoJson {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::InvalidInput { .. }
            | MapError::InvalidFeature { .. }
            | MapError::GeoJson { .. }
            | MapError::FeedRead { .. } => ErrorCategory::Input,
            MapError::HttpStatus { .. } | MapError::ApiError(_) => ErrorCategory::Network,
            MapError::IoError(_) | MapError::ZipError(_) => ErrorCategory::Storage,
            MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MapError::CsvError(_) | MapError::SerializationError(_) => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Processing | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MapError::InvalidInput { .. } => {
                "Check that every depth value in the feed is a number"
            }
            MapError::InvalidFeature { .. } => {
                "Set error_handling.on_invalid_feature = \"skip\" to ignore malformed features"
            }
            MapError::GeoJson { .. } => {
                "Make sure the source returns a GeoJSON FeatureCollection"
            }
            MapError::FeedRead { .. } => "Check that the local feed file exists and is readable",
            MapError::HttpStatus { .. } | MapError::ApiError(_) => {
                "Check the network connection and the feed URL, then retry"
            }
            MapError::IoError(_) | MapError::ZipError(_) => {
                "Check that the output path exists and is writable"
            }
            MapError::CsvError(_) | MapError::SerializationError(_) => {
                "Re-run with --verbose and inspect the offending feature"
            }
            MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => {
                "Fix the configuration value and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The input data could not be used: {}", self),
            ErrorCategory::Network => format!("Could not download the feed: {}", self),
            ErrorCategory::Storage => format!("Could not write the output: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_and_severity() {
        let err = MapError::invalid_input("depth_km", "depth is NaN");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.severity().exit_code(), 1);

        let err = MapError::HttpStatus {
            status: 503,
            url: "https://example.com/feed".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity().exit_code(), 2);

        let err = MapError::IoError(std::io::Error::other("disk full"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_feed_read_is_an_input_error() {
        let err = MapError::FeedRead {
            source_path: "./data/plates.json".to_string(),
            error: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.recovery_suggestion().contains("feed file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_user_friendly_message_includes_cause() {
        let err = MapError::geojson("missing 'features' array");
        let message = err.user_friendly_message();
        assert!(message.starts_with("The input data could not be used"));
        assert!(message.contains("missing 'features' array"));
    }
}
