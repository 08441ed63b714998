//! ER Clicker Core
//!
//! Everything of the death counter that does not need a browser:
//! - domain: rows of the remote tables
//! - repository: the remote collaborator contract, Supabase and in-process backends
//! - stopwatch / tally / catalog: state machines and operations behind the home page
//! - audio / cue: playback coordination and the cross-client cue protocol
//! - stats: the leaderboard derivation
//! - format / clock: small shared helpers

pub mod domain;
pub mod repository;
pub mod clock;
pub mod format;
pub mod stopwatch;
pub mod tally;
pub mod catalog;
pub mod audio;
pub mod cue;
pub mod stats;
