//! Stopwatch Reconciler
//!
//! Local view of a boss's timer row. Holds the accumulated seconds as of the
//! last transition plus the start of the open running segment, derives the
//! ticking display value, and re-bases itself on every row it receives from
//! the store.
//!
//! Transitions are two-phase: [`Stopwatch::plan`] yields the patch to write
//! (or `None` for a no-op) and [`Stopwatch::commit`] applies it once the
//! write succeeded, on whatever the live state is by then.

use log::{debug, info};

use crate::domain::{BossId, Timer, TimerPatch, TimerStatus};
use crate::repository::{RemoteStore, StoreResult};

/// Tick period of the display refresh
pub const TICK_INTERVAL_MS: u32 = 1_000;

/// User-level stopwatch actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Pause,
    Reset,
    /// Side effect of declaring victory
    Finish,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stopwatch {
    accumulated: u64,
    segment_start: Option<i64>,
    status: TimerStatus,
    displayed: u64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// State right after loading `row`
    pub fn from_row(row: &Timer, now: i64) -> Self {
        let mut stopwatch = Self::new();
        stopwatch.reconcile(row, now);
        stopwatch
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn displayed(&self) -> u64 {
        self.displayed
    }

    pub fn accumulated(&self) -> u64 {
        self.accumulated
    }

    pub fn segment_start(&self) -> Option<i64> {
        self.segment_start
    }

    /// True while the display should tick
    pub fn is_ticking(&self) -> bool {
        self.status == TimerStatus::Running && self.segment_start.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Accumulated time plus the open segment; a clock that went backwards counts as zero
    pub fn total_at(&self, now: i64) -> u64 {
        let open = self
            .segment_start
            .map(|start| now.saturating_sub(start).max(0) as u64)
            .unwrap_or(0);
        self.accumulated + open
    }

    /// The patch `transition` would write, or `None` when it is a no-op
    pub fn plan(&self, transition: Transition, now: i64) -> Option<TimerPatch> {
        if self.is_finished() {
            return None;
        }
        match transition {
            Transition::Start => (!self.is_ticking()).then_some(TimerPatch {
                elapsed_time: None,
                status: TimerStatus::Running,
            }),
            Transition::Pause => self.segment_start.map(|_| TimerPatch {
                elapsed_time: Some(self.total_at(now)),
                status: TimerStatus::Paused,
            }),
            Transition::Reset => Some(TimerPatch {
                elapsed_time: Some(0),
                status: TimerStatus::Stopped,
            }),
            Transition::Finish => Some(TimerPatch {
                elapsed_time: Some(self.total_at(now)),
                status: TimerStatus::Finished,
            }),
        }
    }

    /// Apply a persisted patch. `now` is the instant the transition was planned.
    pub fn commit(&mut self, patch: &TimerPatch, now: i64) {
        if self.is_finished() {
            debug!("stopwatch finished, ignoring {:?}", patch.status);
            return;
        }
        if let Some(elapsed) = patch.elapsed_time {
            self.accumulated = elapsed;
            self.displayed = elapsed;
        }
        self.status = patch.status;
        self.segment_start = (patch.status == TimerStatus::Running).then_some(now);
    }

    /// Refresh the display value; never touches the store
    pub fn tick(&mut self, now: i64) {
        if self.is_ticking() {
            self.displayed = self.total_at(now);
        }
    }

    /// Take `row` as ground truth. A running row restarts local ticking from `now`.
    pub fn reconcile(&mut self, row: &Timer, now: i64) {
        self.accumulated = row.elapsed_time;
        self.status = row.status;
        self.displayed = row.elapsed_time;
        self.segment_start = (row.status == TimerStatus::Running).then_some(now);
    }
}

/// Persist `transition` for `boss_id`. Returns the written patch for the
/// caller to [`Stopwatch::commit`], or `None` when nothing was written.
pub async fn transition<S>(
    store: &S,
    boss_id: BossId,
    stopwatch: &Stopwatch,
    transition: Transition,
    now: i64,
) -> StoreResult<Option<TimerPatch>>
where
    S: RemoteStore + ?Sized,
{
    let Some(patch) = stopwatch.plan(transition, now) else {
        debug!("{:?} is a no-op in status {}", transition, stopwatch.status().as_str());
        return Ok(None);
    };
    store.update_timer(boss_id, &patch).await?;
    info!("timer of boss {} is now {}", boss_id, patch.status.as_str());
    Ok(Some(patch))
}
