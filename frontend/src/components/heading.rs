//! Heading for the current view

use leptos::*;

use crate::types::View;

#[component]
pub fn Heading(current: ReadSignal<View>) -> impl IntoView {
    view! {
        <div class="hero">
            <h1>{move || current.get().title()}</h1>
            <p class="subtitle">{move || current.get().subtitle()}</p>
        </div>
    }
}
