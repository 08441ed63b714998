//! Frontend Models
//!
//! Row types and view state shared with the core crate.

pub use clicker_core::domain::{Boss, BossId, DeathCounter, NewBoss, Timer};
pub use clicker_core::stats::{SortKey, SortState, StatsRow};
pub use clicker_core::stopwatch::Stopwatch;
