//! Discrete progress bar driven by the upload phase.

use leptos::*;

use crate::types::UploadPhase;

#[component]
pub fn PhaseIndicator(phase: ReadSignal<UploadPhase>) -> impl IntoView {
    let fill_class = move || match phase.get() {
        UploadPhase::Failed(_) => "progress-fill failed",
        UploadPhase::Succeeded => "progress-fill done",
        _ => "progress-fill",
    };

    view! {
        <Show
            when=move || phase.get() != UploadPhase::Idle
            fallback=|| view! { }
        >
            <div class="progress-section show">
                <div class="progress-bar">
                    <div
                        class=fill_class
                        style=move || format!("width: {}%;", phase.get().percent())
                    ></div>
                </div>
                <div class="progress-label">
                    {move || {
                        let p = phase.get();
                        format!("{} ({}/{})", p.label(), p.ordinal(), UploadPhase::STEPS)
                    }}
                </div>
            </div>
        </Show>
    }
}
