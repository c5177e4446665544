//! Application configuration.
//!
//! Centralized configuration for the Sheetgate frontend.
//! In development, these are hardcoded. In production, they could be
//! loaded from environment or a config file.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Only files whose name ends with this suffix can be selected.
pub const ACCEPTED_EXTENSION: &str = ".xlsx";

/// Banner shown when credentials are rejected, whatever the reason.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Banner shown when a selection has the wrong extension.
pub const INVALID_FILE_MESSAGE: &str = "Please select a valid .xlsx file";

/// Banner shown when upload is clicked with nothing selected.
pub const NO_FILE_MESSAGE: &str = "Please select a file first";

/// Banner shown after a successful upload.
pub const SUCCESS_MESSAGE: &str = "File successfully processed and uploaded to the database!";

/// Fallback when an error carries no text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Maximum log lines kept in memory.
pub const MAX_LOG_ENTRIES: usize = 100;
