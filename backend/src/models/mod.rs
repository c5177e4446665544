//! Domain models for the Sheetgate session gate and upload pipeline.
//!
//! This module contains the core data structures used throughout the crate:
//!
//! - [`Credentials`] - Ephemeral username/password pair
//! - [`UploadFile`] - A selected spreadsheet and where its bytes come from
//! - [`TabularData`] - Row-major cell values of the first sheet
//! - [`UploadPhase`] - Discrete pipeline phase shown as progress
//! - [`Acknowledgement`] - Receipt from the persistence collaborator
//! - [`UploadOutcome`] - Text payload plus submission result

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::AuthError;

/// Only file names with this suffix are accepted for upload.
pub const ACCEPTED_EXTENSION: &str = ".xlsx";

// =============================================================================
// Credentials
// =============================================================================

/// Username/password pair held only for the duration of a login attempt.
///
/// The password is wrapped in [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Build credentials, rejecting blank fields.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, AuthError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(Self {
            username,
            password: SecretString::from(password),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Borrow the plaintext password for verification.
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

// =============================================================================
// Upload File
// =============================================================================

/// Where the bytes of a selected file live until the Read phase.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on disk, read with `tokio::fs` during the Read phase.
    Path(PathBuf),
    /// Bytes already in memory (multipart upload).
    Bytes(Vec<u8>),
}

/// A user-selected spreadsheet.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Name as chosen by the user; validated by suffix only.
    pub name: String,
    pub source: FileSource,
}

impl UploadFile {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes),
        }
    }

    /// Use the path's file name as the selection name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    /// Whether the name ends with [`ACCEPTED_EXTENSION`].
    pub fn has_accepted_extension(&self) -> bool {
        is_accepted_file_name(&self.name)
    }
}

/// Suffix check applied at selection time. No content-type or size check.
pub fn is_accepted_file_name(name: &str) -> bool {
    name.ends_with(ACCEPTED_EXTENSION)
}

// =============================================================================
// Tabular Data
// =============================================================================

/// Rows of rendered cell values, header row included as ordinary data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularData {
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<&str>>> for TabularData {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}

// =============================================================================
// Upload Phase
// =============================================================================

/// Discrete phase of one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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
    /// Number of steps shown by a progress indicator.
    pub const STEPS: u8 = 5;

    /// Step index: 0 for Idle up to 5 for a terminal phase.
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

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            UploadPhase::Reading
                | UploadPhase::Parsing
                | UploadPhase::Transforming
                | UploadPhase::Submitting
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadPhase::Succeeded | UploadPhase::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadPhase::Failed(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadPhase::Idle => write!(f, "Idle"),
            UploadPhase::Reading => write!(f, "Reading"),
            UploadPhase::Parsing => write!(f, "Parsing"),
            UploadPhase::Transforming => write!(f, "Transforming"),
            UploadPhase::Submitting => write!(f, "Submitting"),
            UploadPhase::Succeeded => write!(f, "Succeeded"),
            UploadPhase::Failed(m) => write!(f, "Failed: {}", m),
        }
    }
}

// =============================================================================
// Submission Result
// =============================================================================

/// Receipt returned by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgement {
    /// Client-generated upload identifier.
    pub receipt: String,
    /// Size of the submitted text in bytes.
    pub accepted_bytes: usize,
    pub received_at: DateTime<Utc>,
    /// Response body from a real endpoint, if any.
    pub detail: Option<String>,
    /// True when no network call was made.
    pub simulated: bool,
}

/// Result of a successful upload attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub file_name: String,
    pub row_count: usize,
    /// Delimited text handed to the collaborator.
    pub text: String,
    pub acknowledgement: Acknowledgement,
}
