//! Domain Layer
//!
//! Rows of the three remote tables (`bosses`, `death_counters`, `timers`)
//! and the small value types built on them.
//! This layer has NO I/O (only serde and chrono).

mod entity;
mod boss;
mod death_counter;
mod timer;

pub use entity::{Entity, DomainError, DomainResult};
pub use boss::{Boss, BossId, NewBoss};
pub use death_counter::{DeathCounter, NewDeathCounter};
pub use timer::{Timer, TimerPatch, TimerStatus};
