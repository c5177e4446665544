//! Session endpoints.

use gloo_net::http::Request;

use super::error_text;
use crate::config::INVALID_CREDENTIALS_MESSAGE;
use crate::types::{AppError, AppResult, LoginRequest, SessionResponse};

/// Submit credentials. Any rejection is reported with the same generic message.
pub async fn login(username: &str, password: &str, backend_url: &str) -> AppResult<SessionResponse> {
    let url = format!("{}/api/login", backend_url);
    let body = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };

    let response = Request::post(&url)
        .json(&body)
        .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    if !response.ok() {
        let detail = error_text(response).await;
        log::warn!("Login rejected: {}", detail);
        return Err(AppError::Auth(INVALID_CREDENTIALS_MESSAGE.to_string()));
    }

    let session = response
        .json::<SessionResponse>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))?;

    if session.authenticated {
        Ok(session)
    } else {
        Err(AppError::Auth(INVALID_CREDENTIALS_MESSAGE.to_string()))
    }
}

pub async fn logout(backend_url: &str) -> AppResult<SessionResponse> {
    let url = format!("{}/api/logout", backend_url);
    let response = Request::post(&url)
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    if !response.ok() {
        return Err(AppError::Network(error_text(response).await));
    }

    response
        .json::<SessionResponse>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))
}

/// Current server-side session, used to restore the view on reload.
pub async fn fetch_session(backend_url: &str) -> AppResult<SessionResponse> {
    let url = format!("{}/api/session", backend_url);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    if !response.ok() {
        return Err(AppError::Network(error_text(response).await));
    }

    response
        .json::<SessionResponse>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))
}
