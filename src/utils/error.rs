use serde::Serialize;
use thiserror::Error;

/// Why a consumption reading was rejected before any charge was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    NotNumeric,
    NonPositive,
    OutOfRange,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum BillError {
    #[error("Invalid consumption: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown customer class: {value}")]
    UnknownCustomerClass { value: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
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
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BillError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BillError::Validation(_) | BillError::UnknownCustomerClass { .. } => {
                ErrorCategory::Input
            }
            BillError::ConfigError { .. }
            | BillError::InvalidConfigValueError { .. }
            | BillError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BillError::IoError(_) => ErrorCategory::Io,
            BillError::CsvError(_) | BillError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BillError::Validation(e) => e.message.clone(),
            BillError::UnknownCustomerClass { value } => format!(
                "'{}' is not a customer class. Use 'residential' or 'commercial'.",
                value
            ),
            BillError::CsvError(e) => format!("The readings file could not be read: {}", e),
            BillError::IoError(e) => format!("File access failed: {}", e),
            BillError::SerializationError(e) => format!("Could not render the bill: {}", e),
            BillError::ConfigError { message } => format!("Rate configuration problem: {}", message),
            BillError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Rate configuration field '{}' = '{}' is invalid: {}", field, value, reason),
            BillError::MissingConfigError { field } => {
                format!("Rate configuration is missing '{}'", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BillError::Validation(e) => match e.kind {
                ValidationErrorKind::NotNumeric => "Enter the consumption as a plain number, e.g. 25.5",
                ValidationErrorKind::NonPositive => "Consumption must be greater than 0 cubic meters",
                ValidationErrorKind::OutOfRange => {
                    "Readings above 1000 cubic meters are usually typos; check the meter value"
                }
            },
            BillError::UnknownCustomerClass { .. } => "Use 'residential' or 'commercial'",
            BillError::CsvError(_) => {
                "Check that the file has an 'account,consumption,customer_class' header"
            }
            BillError::IoError(_) => "Check that the file exists and is readable",
            BillError::SerializationError(_) => "Retry with the default text output",
            BillError::ConfigError { .. }
            | BillError::InvalidConfigValueError { .. }
            | BillError::MissingConfigError { .. } => {
                "Fix the rate file or run without --rates to use the built-in schedules"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BillError>;
