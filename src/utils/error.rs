use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourtError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Parse,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CourtError {
    pub fn parse(message: impl Into<String>) -> Self {
        CourtError::ParseError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CourtError::TransportError(_) | CourtError::HttpStatusError { .. } => {
                ErrorCategory::Transport
            }
            CourtError::ParseError { .. } => ErrorCategory::Parse,
            CourtError::MissingConfigError { .. }
            | CourtError::InvalidConfigValueError { .. }
            | CourtError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CourtError::CsvError(_) | CourtError::IoError(_) | CourtError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可以重試
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Parse => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CourtError::TransportError(_) => {
                "Check network connectivity and that the site is reachable, then retry".to_string()
            }
            CourtError::HttpStatusError { status, .. } if *status == 401 || *status == 403 => {
                "The session cookie was rejected; log in again and pass a fresh PHPSESSID".to_string()
            }
            CourtError::HttpStatusError { .. } => {
                "The site answered with an error status; retry later".to_string()
            }
            CourtError::ParseError { .. } => {
                "The page layout may have changed; run with --verbose and inspect the markup"
                    .to_string()
            }
            CourtError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the TOML config", field)
            }
            CourtError::InvalidConfigValueError { field, .. }
            | CourtError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            CourtError::CsvError(_) | CourtError::IoError(_) | CourtError::SerializationError(_) => {
                "Check that the output path is writable and the disk is not full".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Transport => format!("Network problem: {}", self),
            ErrorCategory::Parse => format!("Could not understand the site response: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CourtError>;
