//! Statistics table derivation
//!
//! Left-joins bosses with their counters and timers, then filters and sorts
//! the joined rows on the client.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::domain::{Boss, BossId, DeathCounter, Timer};

/// Quiet period before the name filter is applied
pub const FILTER_DEBOUNCE_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Alive,
    Defeated,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Alive => write!(f, "alive"),
            Outcome::Defeated => write!(f, "defeated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRow {
    pub boss_id: BossId,
    pub name: String,
    pub death_count: u32,
    pub elapsed_time: u64,
    pub outcome: Outcome,
}

/// Join the three tables. Missing counters read as 0, missing timers as
/// 0 seconds and alive.
pub fn build_rows(bosses: &[Boss], counters: &[DeathCounter], timers: &[Timer]) -> Vec<StatsRow> {
    let counts: HashMap<BossId, u32> = counters.iter().map(|c| (c.boss_id, c.death_count)).collect();
    let timers: HashMap<BossId, &Timer> = timers.iter().map(|t| (t.boss_id, t)).collect();

    bosses
        .iter()
        .map(|boss| {
            let timer = timers.get(&boss.id);
            StatsRow {
                boss_id: boss.id,
                name: boss.name.clone(),
                death_count: counts.get(&boss.id).copied().unwrap_or(0),
                elapsed_time: timer.map(|t| t.elapsed_time).unwrap_or(0),
                outcome: match timer {
                    Some(t) if t.status.is_finished() => Outcome::Defeated,
                    _ => Outcome::Alive,
                },
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    DeathCount,
    ElapsedTime,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::DeathCount,
            descending: true,
        }
    }
}

impl SortState {
    /// Header click: same column flips direction, a new column starts ascending
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.descending = !self.descending;
        } else {
            self.key = key;
            self.descending = false;
        }
    }

    fn compare(&self, a: &StatsRow, b: &StatsRow) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::DeathCount => a.death_count.cmp(&b.death_count),
            SortKey::ElapsedTime => a.elapsed_time.cmp(&b.elapsed_time),
            SortKey::Status => a.outcome.cmp(&b.outcome),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Case-insensitive substring match on the boss name
pub fn matches_filter(row: &StatsRow, needle: &str) -> bool {
    needle.is_empty() || row.name.to_lowercase().contains(&needle.to_lowercase())
}

/// Filtered and sorted copy of `rows`; ties keep their fetched order
pub fn visible_rows(rows: &[StatsRow], needle: &str, sort: SortState) -> Vec<StatsRow> {
    let mut visible: Vec<StatsRow> = rows.iter().filter(|row| matches_filter(row, needle)).cloned().collect();
    visible.sort_by(|a, b| sort.compare(a, b));
    visible
}
