//! Sheetgate - Frontend Rust/Leptos Application
//!
//! A WebAssembly login form that, once authenticated, turns into an xlsx
//! uploader. Conversion and submission run on the backend; this crate
//! handles the two views, the client-side suffix check and progress.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Heading (title/subtitle for the current view)               │
//! │  LoginForm            when View::LoggedOut                   │
//! │  FileUploader         when View::LoggedIn                    │
//! │  └── PhaseIndicator                                          │
//! │  LogsPanel (SSE)                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (View, UploadPhase, LogEntry, etc.)
//! - [`components`] - UI components
//! - [`services`] - Backend communication (auth, upload, events)

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;

pub use types::{
    // View
    View,
    // Phases
    UploadPhase,
    // Logs
    LogEntry, LogLevel,
    // API
    Acknowledgement, SessionResponse, UploadResponse,
    // Errors
    AppError, AppResult,
};

pub use components::*;
pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (current, set_current) = create_signal(View::LoggedOut);
    let (phase, set_phase) = create_signal(UploadPhase::Idle);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    // SSE connection opened once at startup
    init_sse_logs(set_logs, set_phase);

    // Restore a session that survived a page reload
    spawn_local(async move {
        match fetch_session(BACKEND_URL).await {
            Ok(session) if session.authenticated => {
                set_phase.set(session.phase.unwrap_or(UploadPhase::Idle));
                set_current.set(View::LoggedIn);
            }
            Ok(_) => {}
            Err(e) => log::warn!("{}", e),
        }
    });

    view! {
        <Title text=move || format!("Sheetgate - {}", current.get().title())/>

        <div class="container">
            <Heading current=current/>

            <Show
                when=move || current.get() == View::LoggedIn
                fallback=move || view! { <LoginForm set_view=set_current set_phase=set_phase/> }
            >
                <FileUploader set_view=set_current phase=phase set_phase=set_phase/>
            </Show>

            <LogsPanel logs=logs set_logs=set_logs/>
        </div>

        <Footer/>
    }
}
