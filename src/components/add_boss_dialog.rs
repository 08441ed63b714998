//! Add Boss Dialog Component
//!
//! Inline form creating a boss together with its counter and timer rows.
//! The form keeps its input when creation fails.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, warn};

use clicker_core::catalog;

use crate::context::AppContext;
use crate::models::NewBoss;
use crate::store::{store_add_boss, use_app_store};

#[component]
pub fn AddBossDialog() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    let (open, set_open) = signal(false);
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (saving, set_saving) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let new_boss = match NewBoss::new(&name.get_untracked(), &description.get_untracked()) {
            Ok(boss) => boss,
            Err(e) => {
                warn!("{}", e);
                return;
            }
        };
        set_saving.set(true);
        let backend = ctx.backend();
        spawn_local(async move {
            match catalog::create_boss(backend.store.as_ref(), &new_boss).await {
                Ok(boss) => {
                    store_add_boss(&store, boss);
                    set_name.set(String::new());
                    set_description.set(String::new());
                    set_open.set(false);
                }
                Err(e) => error!("could not create boss {}: {}", new_boss.name, e),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Show
            when=move || open.get()
            fallback=move || view! {
                <button class="add-boss-btn" on:click=move |_| set_open.set(true)>"Add boss"</button>
            }
        >
            <form class="add-boss-dialog" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Boss name"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="Description (optional)"
                    prop:value=move || description.get()
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                />
                <div class="dialog-actions">
                    <button type="submit" disabled=move || saving.get() || name.with(|n| n.trim().is_empty())>
                        "Create"
                    </button>
                    <button type="button" on:click=move |_| set_open.set(false)>"Cancel"</button>
                </div>
            </form>
        </Show>
    }
}
