//! Backend services.
//!
//! # Services
//!
//! - [`auth`] - Login, logout and session snapshot
//! - [`upload`] - Multipart xlsx upload to the backend
//! - [`events`] - Server-sent log stream carrying upload phases

pub mod auth;
pub mod events;
pub mod upload;

pub use auth::*;
pub use events::*;
pub use upload::*;

use gloo_net::http::Response;

use crate::types::ErrorBody;

/// Pull the `error` field out of a failed response, falling back to the raw body.
pub(crate) async fn error_text(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => format!("Server error ({})", status),
        Err(_) => body,
    }
}
