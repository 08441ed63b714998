//! ER Clicker Frontend App
//!
//! Root component: builds the backend and audio coordinator, provides them
//! with the store, and switches between the two pages.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;
use reactive_stores::Store;

use crate::commands;
use crate::components::{AudioControls, HomePage, StatsTable};
use crate::context::AppContext;
use crate::store::{AppState, AppStateStoreFields};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Page {
    Home,
    Stats,
}

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new(commands::connect_backend(), commands::browser_audio());
    let store = Store::new(AppState::default());
    let (page, set_page) = signal(Page::Home);

    // Provide context to all children
    provide_context(ctx);
    provide_context(store);

    // Cues are played for as long as the app is mounted
    let _cue_listener = StoredValue::new_local(ctx.listen_for_cues());

    // Load bosses on mount
    let backend = ctx.backend();
    spawn_local(async move {
        match backend.store.list_bosses().await {
            Ok(bosses) => store.bosses().set(bosses),
            Err(e) => error!("failed to load bosses: {}", e),
        }
    });

    let nav_class = move |target: Page| move || if page.get() == target { "nav-btn active" } else { "nav-btn" };

    view! {
        <div class="app-layout">
            <nav class="nav-bar">
                <button class=nav_class(Page::Home) on:click=move |_| set_page.set(Page::Home)>"Home"</button>
                <button class=nav_class(Page::Stats) on:click=move |_| set_page.set(Page::Stats)>"Stats"</button>
            </nav>

            <main class="main-content">
                <h1>"ER Clicker"</h1>
                {move || match page.get() {
                    Page::Home => view! { <HomePage /> }.into_any(),
                    Page::Stats => view! { <StatsTable /> }.into_any(),
                }}
            </main>

            <AudioControls />
        </div>
    }
}
