//! Death Tally Component
//!
//! Shows the selected boss's death count and follows its counter row.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use clicker_core::cue::Cue;
use clicker_core::repository::Subscription;
use clicker_core::tally::{self, Step};

use crate::context::AppContext;
use crate::models::DeathCounter;
use crate::store::{is_selected, use_app_store, AppStateStoreFields};

#[component]
pub fn DeathTally() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    // Load the counter and follow its updates; re-runs on selection change,
    // dropping the previous boss's subscription.
    Effect::new(move |_previous: Option<Option<Subscription>>| {
        let boss_id = store.selected_boss_id().get()?;
        let backend = ctx.backend();

        let loader = backend.clone();
        spawn_local(async move {
            match loader.store.death_counter_for(boss_id).await {
                Ok(row) if is_selected(&store, boss_id) => store.death_counter().set(row),
                Ok(_) => {}
                Err(e) => error!("failed to load death counter of boss {}: {}", boss_id, e),
            }
        });

        Some(backend.feed.watch_death_counter(
            boss_id,
            Rc::new(move |row: DeathCounter| store.death_counter().set(Some(row))),
        ))
    });

    let on_step = move |step: Step| {
        let Some(counter) = store.death_counter().get_untracked() else {
            return;
        };
        let backend = ctx.backend();
        spawn_local(async move {
            match tally::step(backend.store.as_ref(), &counter, step).await {
                Ok(Some(row)) => {
                    if is_selected(&store, row.boss_id) {
                        store.death_counter().set(Some(row));
                    }
                    ctx.announce_cue(Cue::Random);
                }
                Ok(None) => {}
                Err(e) => error!("failed to update death count: {}", e),
            }
        });
    };

    let count = move || {
        store
            .death_counter()
            .with(|counter| counter.as_ref().map(|c| c.death_count).unwrap_or(0))
    };

    view! {
        <div class="death-tally">
            <button class="tally-btn" on:click=move |_| on_step(Step::Decrement)>"−"</button>
            <h2 class="death-count">{count}</h2>
            <button class="tally-btn" on:click=move |_| on_step(Step::Increment)>"+"</button>
        </div>
    }
}
