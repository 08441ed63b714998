//! Boss Select Menu Component
//!
//! Dropdown over the store's boss list plus the add-boss dialog.

use leptos::prelude::*;

use crate::components::AddBossDialog;
use crate::store::{store_select_boss, use_app_store, AppStateStoreFields};

#[component]
pub fn BossSelectMenu() -> impl IntoView {
    let store = use_app_store();

    let on_change = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        store_select_boss(&store, value.parse().ok());
    };

    view! {
        <div class="boss-select-menu">
            <select
                on:change=on_change
                prop:value=move || {
                    store.selected_boss_id().get().map(|id| id.to_string()).unwrap_or_default()
                }
            >
                <option value="" disabled=true>"Select a boss"</option>
                <For
                    each=move || store.bosses().get()
                    key=|boss| boss.id
                    children=move |boss| {
                        view! { <option value=boss.id.to_string()>{boss.name.clone()}</option> }
                    }
                />
            </select>
            <AddBossDialog />
        </div>
    }
}
