//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{Boss, BossId, DeathCounter, Stopwatch};

/// Home page state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Every known boss, in fetch order
    pub bosses: Vec<Boss>,
    /// Drives the counter and timer subscriptions
    pub selected_boss_id: Option<BossId>,
    /// `None` until loaded, or when the boss has no counter row
    pub death_counter: Option<DeathCounter>,
    pub stopwatch: Stopwatch,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_add_boss(store: &AppStore, boss: Boss) {
    store.bosses().write().push(boss);
}

/// Select a boss by id; unknown ids clear the selection.
/// Per-boss state is reset until the new boss's rows arrive.
pub fn store_select_boss(store: &AppStore, boss_id: Option<BossId>) {
    let known = boss_id.filter(|id| store.bosses().with_untracked(|bosses| bosses.iter().any(|b| b.id == *id)));
    if known == store.selected_boss_id().get_untracked() {
        return;
    }
    store.death_counter().set(None);
    store.stopwatch().set(Stopwatch::new());
    store.selected_boss_id().set(known);
}

/// Whether any boss is selected; tracks the selection only
pub fn has_selection(store: &AppStore) -> bool {
    store.selected_boss_id().with(Option::is_some)
}

/// The selected boss, tracked
pub fn selected_boss(store: &AppStore) -> Option<Boss> {
    let id = store.selected_boss_id().get()?;
    store.bosses().with(|bosses| clicker_core::catalog::find_boss(bosses, id).cloned())
}

/// True while `boss_id` is still the selection; async results for an older
/// selection are dropped.
pub fn is_selected(store: &AppStore, boss_id: BossId) -> bool {
    store.selected_boss_id().get_untracked() == Some(boss_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn boss(id: BossId, name: &str) -> Boss {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "created_at": "2024-03-01T12:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_adding_a_boss_leaves_the_selection_untouched() {
        let store = Store::new(AppState::default());
        store_add_boss(&store, boss(1, "Margit"));
        store_select_boss(&store, Some(1));

        let runs = Arc::new(AtomicUsize::new(0));
        let counted = runs.clone();
        let selected = Memo::new(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
            has_selection(&store)
        });
        assert!(selected.get_untracked());

        store_add_boss(&store, boss(2, "Godrick"));
        assert!(selected.get_untracked());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(store.bosses().with_untracked(Vec::len), 2);
    }

    #[test]
    fn test_select_unknown_boss_clears_selection() {
        let store = Store::new(AppState::default());
        store_add_boss(&store, boss(1, "Margit"));
        store_select_boss(&store, Some(1));
        assert!(is_selected(&store, 1));

        store_select_boss(&store, Some(42));
        assert_eq!(store.selected_boss_id().get_untracked(), None);
        assert_eq!(store.stopwatch().get_untracked(), Stopwatch::new());
    }
}
