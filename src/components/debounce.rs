//! Debounced signal hook

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Follows `source`, but only after it stayed unchanged for `delay_ms`
pub fn use_debounced(source: ReadSignal<String>, delay_ms: u32) -> ReadSignal<String> {
    let (debounced, set_debounced) = signal(source.get_untracked());
    // Returning the new timeout drops (and cancels) the pending one.
    Effect::new(move |_pending: Option<Timeout>| {
        let value = source.get();
        Timeout::new(delay_ms, move || set_debounced.set(value))
    });
    debounced
}
