//! # Sheetgate - authenticated xlsx upload to delimited text
//!
//! A user logs in through the session gate, then uploads an `.xlsx` file.
//! The first sheet is converted to comma-delimited text and handed to a
//! persistence collaborator (simulated by default).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  login  ┌──────────────────────────────────────────────────────────┐
//! │ Session Gate │────────▶│                     Upload Pipeline                       │
//! │ (identity)   │         │ select ─▶ read ─▶ parse ─▶ transform ─▶ submit (ingest)   │
//! └──────────────┘         └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetgate::{AppConfig, UploadFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = AppConfig::from_env()?.build_session()?;
//!     session.login("admin", "password").await?;
//!     let uploader = session.uploader()?;
//!     uploader.select(Some(UploadFile::from_path("catalog.xlsx")))?;
//!     println!("{}", uploader.submit().await?.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Credentials, UploadFile, UploadPhase)
//! - [`config`] - Environment configuration
//! - [`auth`] - Session gate and identity providers
//! - [`parser`] - xlsx first-sheet reader
//! - [`transform`] - Delimited text writer and upload pipeline
//! - [`ingest`] - Persistence collaborators
//! - [`session`] - View switch between login and upload
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;
pub mod config;

// Session gate
pub mod auth;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Persistence
pub mod ingest;

// View switch
pub mod session;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AuthError,
    ParseError,
    TransformError,
    IngestError,
    UploadError,
    ConfigError,
    ServerError,
    UNKNOWN_ERROR_MESSAGE,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Credentials,
    UploadFile,
    FileSource,
    TabularData,
    UploadPhase,
    Acknowledgement,
    UploadOutcome,
    ACCEPTED_EXTENSION,
    is_accepted_file_name,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{AppConfig, AuthConfig, IngestConfig};

// =============================================================================
// Re-exports - Session gate
// =============================================================================

pub use auth::{IdentityProvider, StaticIdentityProvider, SessionGate};

// =============================================================================
// Re-exports - Parsing and transformation
// =============================================================================

pub use parser::{parse_first_sheet, parse_first_sheet_file, sheet_names};

pub use transform::{to_delimited_text, Delimiting, UploadPipeline};

// =============================================================================
// Re-exports - Persistence
// =============================================================================

pub use ingest::{PersistenceCollaborator, SimulatedIngestion, HttpIngestion};

// =============================================================================
// Re-exports - Session
// =============================================================================

pub use session::{Session, ViewState, Heading};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{
    LoginRequest,
    SessionResponse,
    UploadResponse,
    error_response,
};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
