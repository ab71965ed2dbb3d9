use serde::Serialize;
use std::fmt;
use std::io;
use thiserror::Error;

/// Custom result type for the SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes reported by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Invalid or missing API key
    Unauthorized,
    /// Request format error
    InvalidRequest,
    /// Server-side error occurred
    ServerError,
    /// Operation timed out
    Timeout,
    /// File not found or invalid format
    InvalidFile,
    /// File is too large
    FileTooLarge,
    /// Failed to upload the file
    UploadFailed,
    /// Requested resource not found
    NotFound,
    /// Unexpected error
    UnknownError,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::ServerError => "server_error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::InvalidFile => "invalid_file",
            ErrorCode::FileTooLarge => "file_too_large",
            ErrorCode::UploadFailed => "upload_failed",
            ErrorCode::NotFound => "not_found",
            ErrorCode::UnknownError => "unknown_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for the Reality Defender SDK
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Authentication failure
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Server error from the API
    #[error("Server error: {0}")]
    ServerError(String),

    /// Polling or request deadline exceeded
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid file
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// File exceeds the size limit for its type
    #[error("File too large: {0}")]
    FileTooLarge(String),

    /// Upload failed
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unknown error
    #[error("Unknown error: {0}")]
    UnknownError(String),

    /// The caller cancelled the operation or its deadline passed
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// The taxonomy code for this error.
    ///
    /// Cancellation is caller-initiated rather than a service failure, so it
    /// carries no code.
    pub fn code(&self) -> Option<ErrorCode> {
        let code = match self {
            Error::InvalidConfig(_) | Error::InvalidRequest(_) => ErrorCode::InvalidRequest,
            Error::Unauthorized(_) => ErrorCode::Unauthorized,
            Error::NotFound(_) => ErrorCode::NotFound,
            Error::ServerError(_) | Error::RequestError(_) => ErrorCode::ServerError,
            Error::Timeout(_) => ErrorCode::Timeout,
            Error::InvalidFile(_) | Error::IOError(_) => ErrorCode::InvalidFile,
            Error::FileTooLarge(_) => ErrorCode::FileTooLarge,
            Error::UploadFailed(_) => ErrorCode::UploadFailed,
            Error::JsonError(_) | Error::UnknownError(_) => ErrorCode::UnknownError,
            Error::Cancelled => return None,
        };
        Some(code)
    }

    /// Whether the remote resource did not exist (yet)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Whether the operation ended because the caller cancelled it
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
