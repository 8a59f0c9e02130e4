use std::error::Error as _;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{}", with_causes(.0))]
    FetchError(#[from] reqwest::Error),

    #[error("HTTP Error {status}: {reason}")]
    HttpStatusError {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("No columns to parse from file")]
    EmptyInputError,

    #[error("EOF inside string starting at line {line}")]
    UnterminatedQuoteError { line: u64 },

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RaggedRowError {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] Box<handlebars::TemplateError>),

    #[error("Render error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    #[error("Upload error: {message}")]
    UploadError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
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

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::FetchError(_) | DashboardError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            DashboardError::CsvError(_)
            | DashboardError::EmptyInputError
            | DashboardError::UnterminatedQuoteError { .. }
            | DashboardError::RaggedRowError { .. }
            | DashboardError::ProcessingError { .. } => ErrorCategory::Parse,
            DashboardError::UploadError { .. } => ErrorCategory::Input,
            DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DashboardError::IoError(_)
            | DashboardError::TemplateError(_)
            | DashboardError::RenderError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 資料來源錯誤只影響單一區塊，頁面仍可渲染
            ErrorCategory::Network | ErrorCategory::Parse | ErrorCategory::Input => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the CSV source: {}", self),
            ErrorCategory::Parse => format!("The source is not a readable CSV table: {}", self),
            ErrorCategory::Input => format!("The uploaded file was rejected: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("Internal error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::HttpStatusError { status: 401 | 403, .. } => {
                "Share the sheet as 'Anyone with the link' (Viewer) or publish it to the web"
            }
            DashboardError::HttpStatusError { .. } | DashboardError::FetchError(_) => {
                "Check that the URL is reachable and points at a CSV export"
            }
            DashboardError::UnterminatedQuoteError { .. }
            | DashboardError::RaggedRowError { .. }
            | DashboardError::CsvError(_) => {
                "Check the file's quoting and that every row has the same number of fields"
            }
            DashboardError::EmptyInputError => "Make sure the CSV has at least a header line",
            DashboardError::UploadError { .. } => "Upload a single file with a .csv extension",
            DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. } => {
                "Check the command line flags and the TOML configuration file"
            }
            DashboardError::ProcessingError { .. } => "Inspect the source data",
            DashboardError::IoError(_)
            | DashboardError::TemplateError(_)
            | DashboardError::RenderError(_) => "Check the server logs for details",
        }
    }
}

impl From<handlebars::TemplateError> for DashboardError {
    fn from(error: handlebars::TemplateError) -> Self {
        DashboardError::TemplateError(Box::new(error))
    }
}

/// reqwest 只顯示最外層訊息，補上底層原因 (timed out, connection refused ...)
fn with_causes(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

pub type Result<T> = std::result::Result<T, DashboardError>;
