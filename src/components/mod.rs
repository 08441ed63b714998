//! UI Components
//!
//! Leptos components of the home and statistics pages.

mod add_boss_dialog;
mod audio_controls;
mod boss_select_menu;
mod death_tally;
mod debounce;
mod home_page;
mod stats_table;
mod timer_panel;

pub use add_boss_dialog::AddBossDialog;
pub use audio_controls::AudioControls;
pub use boss_select_menu::BossSelectMenu;
pub use death_tally::DeathTally;
pub use debounce::use_debounced;
pub use home_page::HomePage;
pub use stats_table::StatsTable;
pub use timer_panel::{run_transition, TimerPanel};
