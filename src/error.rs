use thiserror::Error;

use crate::session::entry::EntryId;

/// Local input problems caught before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a URL")]
    EmptyUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL must start with http:// or https:// (got {0})")]
    UnsupportedScheme(String),

    #[error("Max pages must be between 1 and {max} (got {value})")]
    MaxPagesOutOfRange { value: u32, max: u32 },

    #[error("Scan depth must be between 1 and {max} (got {value})")]
    ScanDepthOutOfRange { value: u32, max: u32 },

    #[error("Please enter some text to analyze")]
    EmptyText,

    #[error("Text is too long ({len} characters, limit {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("Please select an image to upload")]
    NoImage,

    #[error("Image is too large ({size} bytes, limit {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Please select at least one CTA")]
    NothingSelected,
}

/// Failures talking to the analysis service, or rejections it reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response from service: {0}")]
    Decode(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Misaddressed session data. These indicate a caller bug and are never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Row {index} is out of range (collection has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No entry with handle {0}")]
    UnknownEntry(EntryId),

    #[error("History entry not found: {0}")]
    UnknownHistoryEntry(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ValidationError> for String {
    fn from(err: ValidationError) -> Self {
        err.to_string()
    }
}

impl From<ServiceError> for String {
    fn from(err: ServiceError) -> Self {
        err.to_string()
    }
}

impl From<SessionError> for String {
    fn from(err: SessionError) -> Self {
        err.to_string()
    }
}

impl From<ExportError> for String {
    fn from(err: ExportError) -> Self {
        err.to_string()
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}
