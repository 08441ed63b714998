//! ER Clicker Frontend Entry Point

mod models;
mod commands;
mod context;
mod store;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

fn main() {
    // Panics also dump the recent log trail
    std::panic::set_hook(Box::new(|info| {
        console_error_panic_hook::hook(info);
        let trail = rolling_logger::recent_entries().join("\n");
        web_sys::console::error_1(&format!("recent log:\n{}", trail).into());
    }));
    if let Err(e) = rolling_logger::init_logger("ERClicker", log::LevelFilter::Info) {
        web_sys::console::warn_1(&format!("logger not installed: {}", e).into());
    }
    mount_to_body(App);
}
