//! Login form.
//!
//! Both fields are required by the browser before submit fires. A rejected
//! login shows one generic message whatever the backend said.

use leptos::*;

use crate::config::{BACKEND_URL, INVALID_CREDENTIALS_MESSAGE};
use crate::services::login;
use crate::types::{UploadPhase, View};

#[component]
pub fn LoginForm(
    set_view: WriteSignal<View>,
    set_phase: WriteSignal<UploadPhase>,
) -> impl IntoView {
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (is_loading, set_is_loading) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }
        set_error.set(None);
        set_is_loading.set(true);

        let user = username.get_untracked();
        let pass = password.get_untracked();
        spawn_local(async move {
            match login(&user, &pass, BACKEND_URL).await {
                Ok(session) => {
                    log::info!("🔓 Logged in as {}", user);
                    set_phase.set(session.phase.unwrap_or(UploadPhase::Idle));
                    set_password.set(String::new());
                    set_view.set(View::LoggedIn);
                }
                Err(e) => {
                    log::warn!("{}", e);
                    set_error.set(Some(INVALID_CREDENTIALS_MESSAGE.to_string()));
                }
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <form class="login-form" on:submit=on_submit>
            <label for="username">"Username"</label>
            <input
                id="username"
                type="text"
                autocomplete="username"
                required=true
                prop:value=username
                on:input=move |ev| set_username.set(event_target_value(&ev))
            />

            <label for="password">"Password"</label>
            <input
                id="password"
                type="password"
                autocomplete="current-password"
                required=true
                prop:value=password
                on:input=move |ev| set_password.set(event_target_value(&ev))
            />

            <Show
                when=move || error.get().is_some()
                fallback=|| view! { }
            >
                <div class="error-message">{move || error.get().unwrap_or_default()}</div>
            </Show>

            <button type="submit" class="upload-button" disabled=move || is_loading.get()>
                {move || if is_loading.get() { "⏳ Logging in..." } else { "Log in" }}
            </button>
        </form>
    }
}
