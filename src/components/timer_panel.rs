//! Timer Panel Component
//!
//! Stopwatch of the selected boss: loads and follows its timer row, ticks
//! the display once per second while running and issues transitions.

use std::rc::Rc;

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use clicker_core::clock::{Clock, SystemClock};
use clicker_core::format::format_time;
use clicker_core::repository::Subscription;
use clicker_core::stopwatch::{self, Transition, TICK_INTERVAL_MS};

use crate::context::AppContext;
use crate::models::{Stopwatch, Timer};
use crate::store::{is_selected, use_app_store, AppStore, AppStateStoreFields};

/// Plan and persist `transition` for the selected boss, then commit it
pub fn run_transition(ctx: AppContext, store: AppStore, transition: Transition) {
    let Some(boss_id) = store.selected_boss_id().get_untracked() else {
        return;
    };
    let snapshot = store.stopwatch().get_untracked();
    let now = SystemClock.now_secs();
    let backend = ctx.backend();
    spawn_local(async move {
        match stopwatch::transition(backend.store.as_ref(), boss_id, &snapshot, transition, now).await {
            Ok(Some(patch)) if is_selected(&store, boss_id) => store.stopwatch().write().commit(&patch, now),
            Ok(_) => {}
            Err(e) => error!("timer {:?} failed for boss {}: {}", transition, boss_id, e),
        }
    });
}

#[component]
pub fn TimerPanel() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    // Initial load plus realtime reconciliation of the selected boss's row
    Effect::new(move |_previous: Option<Option<Subscription>>| {
        let boss_id = store.selected_boss_id().get()?;
        let backend = ctx.backend();

        let loader = backend.clone();
        spawn_local(async move {
            match loader.store.timer_for(boss_id).await {
                Ok(row) if is_selected(&store, boss_id) => {
                    let loaded = row
                        .map(|row| Stopwatch::from_row(&row, SystemClock.now_secs()))
                        .unwrap_or_default();
                    store.stopwatch().set(loaded);
                }
                Ok(_) => {}
                Err(e) => error!("failed to load timer of boss {}: {}", boss_id, e),
            }
        });

        Some(backend.feed.watch_timer(
            boss_id,
            Rc::new(move |row: Timer| store.stopwatch().write().reconcile(&row, SystemClock.now_secs())),
        ))
    });

    // Restart the tick whenever status or segment start change
    let tick_key = Memo::new(move |_| store.stopwatch().with(|sw| (sw.is_ticking(), sw.segment_start())));
    Effect::new(move |_previous: Option<Option<Interval>>| {
        let (ticking, _) = tick_key.get();
        ticking.then(|| {
            Interval::new(TICK_INTERVAL_MS, move || {
                store.stopwatch().write().tick(SystemClock.now_secs());
            })
        })
    });

    let finished = move || store.stopwatch().with(|sw| sw.is_finished());
    let running = move || store.stopwatch().with(|sw| sw.is_ticking());

    view! {
        <div class="timer-panel">
            <span class="timer-display">
                {move || store.stopwatch().with(|sw| format_time(sw.displayed()))}
            </span>
            <Show when=move || !finished()>
                <div class="timer-controls">
                    <Show
                        when=running
                        fallback=move || view! {
                            <button on:click=move |_| run_transition(ctx, store, Transition::Start)>"Start"</button>
                        }
                    >
                        <button on:click=move |_| run_transition(ctx, store, Transition::Pause)>"Pause"</button>
                    </Show>
                    <button on:click=move |_| run_transition(ctx, store, Transition::Reset)>"Reset"</button>
                </div>
            </Show>
        </div>
    }
}
