//! UI components for the Sheetgate application.
//!
//! # Layout Components
//! - [`Heading`] - Title and subtitle for the current view
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`LoginForm`] - Username/password form
//! - [`FileUploader`] - xlsx selection and upload
//! - [`PhaseIndicator`] - Discrete upload progress
//! - [`LogsPanel`] - Real-time processing logs (SSE)

mod footer;
mod heading;
mod login;
mod logs;
mod progress;
mod uploader;

pub use footer::*;
pub use heading::*;
pub use login::*;
pub use logs::*;
pub use progress::*;
pub use uploader::*;
