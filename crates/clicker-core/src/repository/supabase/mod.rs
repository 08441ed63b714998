//! Supabase collaborator
//!
//! PostgREST table access over `reqwest` and the Realtime (Phoenix channel)
//! wire codec. The WebSocket transport itself lives with the UI since it
//! needs the browser's socket.

mod config;
mod rest;
pub mod realtime;

/// Table names shared by PostgREST paths and realtime filters
pub const BOSSES: &str = "bosses";
pub const DEATH_COUNTERS: &str = "death_counters";
pub const TIMERS: &str = "timers";

pub use config::{ConfigError, SupabaseConfig};
pub use rest::{eq_filter, SupabaseRest};
