//! HTTP Server for the Sheetgate API.
//!
//! Hosts exactly one process-local [`Session`]. The session is behind a
//! `tokio::sync::Mutex`; mutating endpoints take it with `try_lock`, so a
//! second upload while one is in flight is refused with 409 instead of
//! queueing.
//!
//! # API Endpoints
//!
//! | Method | Path           | Description                              |
//! |--------|----------------|------------------------------------------|
//! | GET    | `/health`      | Health check                             |
//! | GET    | `/api/session` | Current view, heading and upload phase   |
//! | POST   | `/api/login`   | Authenticate `{username, password}`      |
//! | POST   | `/api/logout`  | Return to the login view                 |
//! | POST   | `/api/upload`  | Multipart `file` field: select + submit  |
//! | GET    | `/api/logs`    | SSE stream for real-time logs and phases |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::{cors::CorsLayer, services::ServeDir};

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{error_response, LoginRequest, SessionResponse, UploadResponse};
use crate::config::{AppConfig, MAX_UPLOAD_BYTES};
use crate::error::{AuthError, ServerError, ServerResult, UploadError};
use crate::models::UploadFile;
use crate::session::Session;

type ApiError = (StatusCode, Json<Value>);

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Build the router. When `static_dir` is set the built frontend is served
/// for every unmatched path.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .route("/health", get(health))
        .route("/api/session", get(session_status))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/upload", post(upload))
        .route("/api/logs", get(sse_logs));

    let api = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api.route("/", get(health)),
    };

    api.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig) -> ServerResult<()> {
    let session = config.build_session()?;
    let app = router(AppState::new(session), config.static_dir.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    println!("🚀 Sheetgate server running on http://localhost:{}", config.port);
    println!("   POST /api/login   - Authenticate");
    println!("   POST /api/upload  - Upload .xlsx file");
    println!("   GET  /api/session - Current view");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");
    println!();
    match &config.ingest.endpoint {
        Some(url) => println!("📝 Ingestion: POST {}", url),
        None => println!("📝 Ingestion: simulated ({}ms)", config.ingest.delay.as_millis()),
    }
    if let Some(dir) = &config.static_dir {
        println!("📁 Serving frontend from {}", dir.display());
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "sheetgate",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "login": "POST /api/login",
            "upload": "POST /api/upload",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

fn busy() -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(error_response("An upload is already in progress")),
    )
}

fn auth_error(err: AuthError) -> ApiError {
    let status = match err {
        AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials | AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AuthError::Provider(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(error_response(&err.to_string())))
}

fn upload_error(err: UploadError) -> ApiError {
    let status = match err {
        UploadError::InvalidFileSelection(_) => StatusCode::BAD_REQUEST,
        UploadError::ReadOrParseFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
        UploadError::SubmissionFailure(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(error_response(err.message())))
}

/// Current view; `{ "busy": true }` while an operation holds the session
async fn session_status(State(state): State<AppState>) -> Response {
    match state.session.try_lock() {
        Ok(session) => Json(SessionResponse::from(&*session)).into_response(),
        Err(_) => Json(json!({ "busy": true })).into_response(),
    }
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut session = state.session.try_lock().map_err(|_| busy())?;
    session
        .login(&req.username, &req.password)
        .await
        .map_err(auth_error)?;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn logout(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    let mut session = state.session.try_lock().map_err(|_| busy())?;
    session.logout();
    Ok(Json(SessionResponse::from(&*session)))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: the `file` field becomes the selection, then it is submitted
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut session = state.session.try_lock().map_err(|_| busy())?;
    let pipeline = session.uploader().map_err(auth_error)?;

    let mut selection: Option<UploadFile> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("Multipart error: {}", e))),
        )
    })? {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("").to_string();
            let bytes = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(error_response(&format!("Read error: {}", e))),
                )
            })?;
            selection = Some(UploadFile::from_bytes(name, bytes.to_vec()));
        }
    }

    match selection {
        Some(file) => pipeline.select(Some(file)).map_err(upload_error)?,
        None => pipeline.clear(),
    }

    let outcome = pipeline.submit().await.map_err(|e| {
        log_error(format!("Upload failed: {}", e));
        upload_error(e)
    })?;

    Ok(Json(UploadResponse::from(outcome)))
}
