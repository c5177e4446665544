//! xlsx selection and upload.
//!
//! The suffix is checked as soon as a file is picked; a bad pick clears the
//! selection and shows the invalid-file banner. Upload is disabled while
//! nothing is selected or a request is in flight. The file stays selected
//! after an upload so it can be sent again. Progress between submit and
//! response comes from the phase entries on the log stream.

use leptos::*;
use web_sys::{Event, File, HtmlInputElement};

use crate::config::{ACCEPTED_EXTENSION, BACKEND_URL, INVALID_FILE_MESSAGE, NO_FILE_MESSAGE, SUCCESS_MESSAGE};
use crate::services::{logout, upload_xlsx};
use crate::types::{is_accepted_file_name, UploadPhase, View};

use super::PhaseIndicator;

/// Selection and banner state behind the uploader.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadForm<F> {
    pub file: Option<F>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl<F> Default for UploadForm<F> {
    fn default() -> Self {
        Self {
            file: None,
            error: None,
            success: None,
        }
    }
}

impl<F: Clone> UploadForm<F> {
    /// Replace the selection. Banners are cleared; a name without the
    /// accepted suffix drops the file and returns `false`.
    pub fn pick(&mut self, picked: Option<(F, &str)>) -> bool {
        self.error = None;
        self.success = None;
        match picked {
            Some((file, name)) if is_accepted_file_name(name) => {
                self.file = Some(file);
                true
            }
            Some(_) => {
                self.file = None;
                self.error = Some(INVALID_FILE_MESSAGE.to_string());
                false
            }
            None => {
                self.file = None;
                true
            }
        }
    }

    /// File to send, or `None` with the no-file banner set.
    pub fn start(&mut self) -> Option<F> {
        self.error = None;
        self.success = None;
        if self.file.is_none() {
            self.error = Some(NO_FILE_MESSAGE.to_string());
        }
        self.file.clone()
    }

    /// Record the upload result. The selection is kept either way.
    pub fn finish(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => self.success = Some(SUCCESS_MESSAGE.to_string()),
            Err(message) => self.error = Some(message),
        }
    }
}

#[component]
pub fn FileUploader(
    set_view: WriteSignal<View>,
    phase: ReadSignal<UploadPhase>,
    set_phase: WriteSignal<UploadPhase>,
) -> impl IntoView {
    let (form, set_form) = create_signal(UploadForm::<File>::default());
    let (is_loading, set_is_loading) = create_signal(false);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        set_phase.set(UploadPhase::Idle);

        let picked = input.files().and_then(|files| files.get(0));
        let name = picked.as_ref().map(File::name).unwrap_or_default();
        let mut kept = true;
        set_form.update(|f| kept = f.pick(picked.map(|file| (file, name.as_str()))));

        if kept {
            log::info!("📄 Selected {}", name);
        } else {
            log::warn!("Rejected selection {}", name);
            input.set_value("");
        }
    };

    let on_upload = move |_| {
        if is_loading.get_untracked() {
            return;
        }
        let mut selected = None;
        set_form.update(|f| selected = f.start());
        let Some(selected) = selected else {
            return;
        };

        set_is_loading.set(true);
        set_phase.set(UploadPhase::Reading);

        spawn_local(async move {
            match upload_xlsx(selected, BACKEND_URL).await {
                Ok(response) => {
                    log::info!(
                        "✅ {} rows submitted, receipt {}",
                        response.row_count,
                        response.acknowledgement.receipt
                    );
                    set_phase.set(UploadPhase::Succeeded);
                    set_form.update(|f| f.finish(Ok(())));
                }
                Err(e) => {
                    log::error!("{}", e);
                    let message = e.message();
                    set_phase.set(UploadPhase::Failed(message.clone()));
                    set_form.update(|f| f.finish(Err(message)));
                }
            }
            set_is_loading.set(false);
        });
    };

    let on_logout = move |_| {
        spawn_local(async move {
            if let Err(e) = logout(BACKEND_URL).await {
                log::warn!("{}", e);
            }
            set_phase.set(UploadPhase::Idle);
            set_view.set(View::LoggedOut);
        });
    };

    let error = move || form.with(|f| f.error.clone());
    let success = move || form.with(|f| f.success.clone());

    view! {
        <div class="upload-section">
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">
                {move || form.with(|f| match &f.file {
                    Some(file) => file.name(),
                    None => "No file selected".to_string(),
                })}
            </div>

            <input
                type="file"
                id="fileInput"
                accept=ACCEPTED_EXTENSION
                disabled=move || is_loading.get()
                on:change=on_file_change
            />

            <PhaseIndicator phase=phase/>

            <Show
                when=move || error().is_some()
                fallback=|| view! { }
            >
                <div class="error-message">{move || error().unwrap_or_default()}</div>
            </Show>

            <Show
                when=move || success().is_some()
                fallback=|| view! { }
            >
                <div class="success-message">{move || success().unwrap_or_default()}</div>
            </Show>

            <button
                class="upload-button"
                disabled=move || form.with(|f| f.file.is_none()) || is_loading.get()
                on:click=on_upload
            >
                {move || if is_loading.get() { "⏳ Uploading..." } else { "Upload" }}
            </button>

            <button class="logout-button" disabled=move || is_loading.get() on:click=on_logout>
                "Log out"
            </button>
        </div>
    }
}
