//! Audio Controls Component

use leptos::prelude::*;

use crate::context::AppContext;

/// Stop button and the enable/disable toggle
#[component]
pub fn AudioControls() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    view! {
        <footer class="audio-controls">
            <h3>"Music"</h3>
            <div class="audio-buttons">
                <button on:click=move |_| ctx.stop_audio()>"Stop"</button>
                <button on:click=move |_| ctx.toggle_audio()>
                    {move || if ctx.audio_enabled.get() { "Disable" } else { "Enable" }}
                </button>
            </div>
        </footer>
    }
}
