//! Stats Table Component
//!
//! Leaderboard of every boss: one fetch of the three tables, joined and
//! then filtered and sorted on the client.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use clicker_core::format::format_time;
use clicker_core::stats::{build_rows, visible_rows, FILTER_DEBOUNCE_MS};

use crate::components::use_debounced;
use crate::context::AppContext;
use crate::models::{SortKey, SortState, StatsRow};

#[component]
pub fn StatsTable() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let (rows, set_rows) = signal(Vec::<StatsRow>::new());
    let (sort, set_sort) = signal(SortState::default());
    let (filter, set_filter) = signal(String::new());
    let needle = use_debounced(filter, FILTER_DEBOUNCE_MS);

    let backend = ctx.backend();
    spawn_local(async move {
        let bosses = match backend.store.list_bosses().await {
            Ok(bosses) => bosses,
            Err(e) => {
                error!("failed to load bosses: {}", e);
                return;
            }
        };
        // A missing table degrades to zero values for every boss
        let counters = backend.store.list_death_counters().await.unwrap_or_else(|e| {
            error!("failed to load death counters: {}", e);
            Vec::new()
        });
        let timers = backend.store.list_timers().await.unwrap_or_else(|e| {
            error!("failed to load timers: {}", e);
            Vec::new()
        });
        set_rows.set(build_rows(&bosses, &counters, &timers));
    });

    let visible = Memo::new(move |_| rows.with(|rows| visible_rows(rows, &needle.get(), sort.get())));

    let header = move |label: &'static str, key: SortKey| {
        let marker = move || {
            let current = sort.get();
            match (current.key == key, current.descending) {
                (false, _) => "",
                (true, false) => " ▲",
                (true, true) => " ▼",
            }
        };
        view! {
            <th class="sortable" on:click=move |_| set_sort.update(|s| s.toggle(key))>
                {label}{marker}
            </th>
        }
    };

    view! {
        <section class="stats-page">
            <input
                type="search"
                class="stats-filter"
                placeholder="Filter by name"
                prop:value=move || filter.get()
                on:input=move |ev| set_filter.set(event_target_value(&ev))
            />
            <table class="stats-table">
                <thead>
                    <tr>
                        {header("Boss", SortKey::Name)}
                        {header("Deaths", SortKey::DeathCount)}
                        {header("Time", SortKey::ElapsedTime)}
                        {header("Status", SortKey::Status)}
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || visible.with(|rows| rows.is_empty())>
                        <tr class="no-data"><td colspan="4">"No data"</td></tr>
                    </Show>
                    <For
                        each=move || visible.get()
                        key=|row| (row.boss_id, row.death_count, row.elapsed_time, row.outcome)
                        children=move |row| view! {
                            <tr>
                                <td>{row.name.clone()}</td>
                                <td>{row.death_count}</td>
                                <td>{format_time(row.elapsed_time)}</td>
                                <td class=format!("status-{}", row.outcome)>{row.outcome.to_string()}</td>
                            </tr>
                        }
                    />
                </tbody>
            </table>
        </section>
    }
}
