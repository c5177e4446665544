//! Error types for the Sheetgate session gate and upload pipeline.
//!
//! This module defines the error hierarchy:
//!
//! - [`AuthError`] - Credential collection and verification errors
//! - [`ParseError`] - Workbook reading errors
//! - [`TransformError`] - Delimited text writing errors
//! - [`IngestError`] - Persistence collaborator errors
//! - [`UploadError`] - User-visible upload failures (top-level for the pipeline)
//! - [`ConfigError`] - Environment configuration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Lower-level errors convert into [`UploadError`] via `From`, so `?` works
//! inside the pipeline while the displayed message stays verbatim.

use thiserror::Error;

/// Fallback message when an underlying error carries no text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

// =============================================================================
// Authentication Errors
// =============================================================================

/// Errors from the session gate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password left blank.
    #[error("Username and password are required")]
    MissingCredentials,

    /// The identity collaborator rejected the pair. Never says which field.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// An upload action was attempted from the logged-out view.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The identity collaborator itself failed.
    #[error("Identity provider error: {0}")]
    Provider(String),
}

// =============================================================================
// Workbook Parsing Errors
// =============================================================================

/// Errors while reading the uploaded workbook.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes are not a readable xlsx workbook.
    #[error("{0}")]
    Workbook(String),

    /// Workbook has no worksheet to read.
    #[error("Workbook contains no sheets")]
    NoSheets,
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while writing rows as delimited text.
#[derive(Debug, Error)]
pub enum TransformError {
    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writer produced bytes that are not UTF-8.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Writer buffer could not be recovered.
    #[error("Writer error: {0}")]
    Writer(String),
}

// =============================================================================
// Ingestion Errors
// =============================================================================

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Endpoint answered with a non-success status.
    #[error("Ingestion rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}

// =============================================================================
// Upload Errors (top-level for the pipeline)
// =============================================================================

/// User-visible upload failures.
///
/// Every variant ends the current attempt. `Display` is the banner text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// No file, or a file without the accepted extension.
    #[error("{0}")]
    InvalidFileSelection(String),

    /// Reading, parsing or transforming the file failed.
    #[error("{0}")]
    ReadOrParseFailure(String),

    /// The persistence collaborator failed.
    #[error("{0}")]
    SubmissionFailure(String),
}

impl UploadError {
    /// The text shown to the user.
    pub fn message(&self) -> &str {
        match self {
            UploadError::InvalidFileSelection(m)
            | UploadError::ReadOrParseFailure(m)
            | UploadError::SubmissionFailure(m) => m,
        }
    }
}

fn message_or_fallback(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

impl From<ParseError> for UploadError {
    fn from(err: ParseError) -> Self {
        UploadError::ReadOrParseFailure(message_or_fallback(err.to_string()))
    }
}

impl From<TransformError> for UploadError {
    fn from(err: TransformError) -> Self {
        UploadError::ReadOrParseFailure(message_or_fallback(err.to_string()))
    }
}

impl From<IngestError> for UploadError {
    fn from(err: IngestError) -> Self {
        UploadError::SubmissionFailure(message_or_fallback(err.to_string()))
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listening socket.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Server loop terminated with an error.
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for session gate operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type for workbook parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for delimited text writing.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for persistence collaborator calls.
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type for pipeline operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ParseError -> UploadError keeps the message verbatim
        let parse_err = ParseError::Workbook("invalid Zip archive".into());
        let upload_err: UploadError = parse_err.into();
        assert_eq!(
            upload_err,
            UploadError::ReadOrParseFailure("invalid Zip archive".into())
        );

        // IngestError -> UploadError
        let ingest_err = IngestError::Rejected {
            status: 503,
            body: "down".into(),
        };
        let upload_err: UploadError = ingest_err.into();
        assert!(matches!(upload_err, UploadError::SubmissionFailure(_)));
        assert!(upload_err.to_string().contains("503"));
    }

    #[test]
    fn test_empty_message_uses_fallback() {
        let upload_err: UploadError = ParseError::Workbook("  ".into()).into();
        assert_eq!(upload_err.message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_invalid_credentials_does_not_name_field() {
        let msg = AuthError::InvalidCredentials.to_string();
        assert_eq!(msg, "Invalid username or password");
    }

    #[test]
    fn test_config_error_format() {
        let err = ConfigError::Invalid {
            key: "SHEETGATE_PORT".into(),
            value: "abc".into(),
            reason: "not a port number".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SHEETGATE_PORT"));
        assert!(msg.contains("abc"));
    }
}
