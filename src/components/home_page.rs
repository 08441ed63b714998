//! Home Page Component
//!
//! Boss selection, the selected boss's stopwatch and tally, and the victory
//! button.

use leptos::prelude::*;

use clicker_core::cue::Cue;
use clicker_core::stopwatch::Transition;

use crate::components::{run_transition, BossSelectMenu, DeathTally, TimerPanel};
use crate::context::AppContext;
use crate::store::{has_selection, selected_boss, use_app_store};

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    // Finishing the timer and the victory cue are independent
    let declare_victory = move |_: web_sys::MouseEvent| {
        run_transition(ctx, store, Transition::Finish);
        ctx.announce_cue(Cue::Victory);
    };

    // The panel only remounts when a selection appears or goes away; boss
    // list edits must not rebuild the stopwatch from the stored row.
    let selected = Memo::new(move |_| has_selection(&store));
    let boss = Memo::new(move |_| selected_boss(&store));

    view! {
        <section class="home-page">
            <BossSelectMenu />
            <Show
                when=move || selected.get()
                fallback=|| view! { <p class="hint">"Select a boss to start."</p> }
            >
                <div class="boss-panel">
                    <h2>{move || boss.get().map(|b| b.name).unwrap_or_default()}</h2>
                    <p class="boss-description">
                        {move || boss.get().and_then(|b| b.description).unwrap_or_default()}
                    </p>
                    <TimerPanel />
                    <DeathTally />
                    <button class="victory-btn" on:click=declare_victory>"Victory"</button>
                </div>
            </Show>
        </section>
    }
}
