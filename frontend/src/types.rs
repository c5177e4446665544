//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **View Types** - Which form is showing
//! - **Phase Types** - Discrete upload progress, mirrors the backend
//! - **Log Types** - Real-time log streaming
//! - **API Types** - Backend request/response structures
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ACCEPTED_EXTENSION, UNKNOWN_ERROR_MESSAGE};

// =============================================================================
// View Types
// =============================================================================

/// Top-level view switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    LoggedOut,
    LoggedIn,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::LoggedOut => "Log in to your account",
            View::LoggedIn => "Upload Excel File",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            View::LoggedOut => "Enter your credentials to access the system",
            View::LoggedIn => "Upload your Excel file to process",
        }
    }
}

// =============================================================================
// Phase Types
// =============================================================================

/// Upload phase as streamed by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "message", rename_all = "camelCase")]
pub enum UploadPhase {
    Idle,
    Reading,
    Parsing,
    Transforming,
    Submitting,
    Succeeded,
    Failed(String),
}

impl UploadPhase {
    pub const STEPS: u8 = 5;

    pub fn ordinal(&self) -> u8 {
        match self {
            UploadPhase::Idle => 0,
            UploadPhase::Reading => 1,
            UploadPhase::Parsing => 2,
            UploadPhase::Transforming => 3,
            UploadPhase::Submitting => 4,
            UploadPhase::Succeeded | UploadPhase::Failed(_) => Self::STEPS,
        }
    }

    /// Width of the progress bar in percent.
    pub fn percent(&self) -> u16 {
        u16::from(self.ordinal()) * 100 / u16::from(Self::STEPS)
    }

    /// Readout under the progress bar.
    pub fn label(&self) -> &'static str {
        match self {
            UploadPhase::Idle => "Ready",
            UploadPhase::Reading => "Reading file...",
            UploadPhase::Parsing => "Parsing workbook...",
            UploadPhase::Transforming => "Converting to CSV...",
            UploadPhase::Submitting => "Submitting...",
            UploadPhase::Succeeded => "Done",
            UploadPhase::Failed(_) => "Failed",
        }
    }
}

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

/// A single log entry from the backend SSE stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub indent: usize,
    #[serde(default)]
    pub phase: Option<UploadPhase>,
    /// RFC 3339 as sent by the backend
    #[serde(default)]
    pub timestamp: String,
}

impl LogEntry {
    /// `HH:MM:SS` in local time, or the raw value if it does not parse.
    pub fn display_time(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

// =============================================================================
// API Types
// =============================================================================

/// Body of `POST /api/login`.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Session snapshot returned by login/logout/session endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub title: String,
    pub subtitle: String,
    pub phase: Option<UploadPhase>,
    pub selected_file: Option<String>,
}

/// Receipt from the persistence collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgement {
    pub receipt: String,
    pub accepted_bytes: usize,
    pub received_at: String,
    pub detail: Option<String>,
    pub simulated: bool,
}

/// Response from the backend upload endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub status: String,
    pub file_name: String,
    pub row_count: usize,
    pub text: String,
    pub acknowledgement: Acknowledgement,
}

/// Error body returned by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Suffix check applied when a file is picked.
pub fn is_accepted_file_name(name: &str) -> bool {
    name.ends_with(ACCEPTED_EXTENSION)
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug)]
pub enum AppError {
    /// Login rejected.
    Auth(String),
    /// Upload rejected or failed on the backend.
    Upload(String),
    /// Network/HTTP error.
    Network(String),
}

impl AppError {
    /// Text for the error banner.
    pub fn message(&self) -> String {
        let msg = match self {
            AppError::Auth(m) | AppError::Upload(m) | AppError::Network(m) => m,
        };
        if msg.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            msg.clone()
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Auth(msg) => write!(f, "Auth error: {}", msg),
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
