//! REST API types for frontend integration.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{Acknowledgement, UploadOutcome, UploadPhase};
use crate::session::Session;

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Snapshot of the session for `GET /api/session` and login/logout replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub title: String,
    pub subtitle: String,
    /// Only present when logged in
    pub phase: Option<UploadPhase>,
    pub selected_file: Option<String>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        let heading = session.heading();
        let pipeline = session.pipeline();
        SessionResponse {
            authenticated: session.is_authenticated(),
            title: heading.title.to_string(),
            subtitle: heading.subtitle.to_string(),
            phase: pipeline.map(|p| p.phase().clone()),
            selected_file: pipeline.and_then(|p| p.selected()).map(|f| f.name.clone()),
        }
    }
}

/// Response sent to frontend after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always "succeeded"
    pub status: String,
    pub file_name: String,
    pub row_count: usize,
    /// Delimited text that was submitted
    pub text: String,
    pub acknowledgement: Acknowledgement,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        UploadResponse {
            status: "succeeded".to_string(),
            file_name: outcome.file_name,
            row_count: outcome.row_count,
            text: outcome.text,
            acknowledgement: outcome.acknowledgement,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}
