//! Repository Layer - Core Traits
//!
//! Abstract contract of the remote data collaborator: table reads and
//! writes, a row-level change feed and the out-of-band cue channel.
//! All futures are `?Send`: the client runs on a single UI thread.

use std::rc::Rc;

use async_trait::async_trait;

use crate::cue::CuePayload;
use crate::domain::{Boss, BossId, DeathCounter, NewBoss, Timer, TimerPatch};

use super::{StoreResult, Subscription};

/// Callback invoked for every delivered notification
pub type Handler<T> = Rc<dyn Fn(T)>;

/// Table access
#[async_trait(?Send)]
pub trait RemoteStore {
    /// Fetch every boss
    async fn list_bosses(&self) -> StoreResult<Vec<Boss>>;

    /// Insert a boss and return the stored row
    async fn insert_boss(&self, boss: &NewBoss) -> StoreResult<Boss>;

    async fn list_death_counters(&self) -> StoreResult<Vec<DeathCounter>>;

    /// Counter for one boss; `None` when no row exists
    async fn death_counter_for(&self, boss_id: BossId) -> StoreResult<Option<DeathCounter>>;

    /// Overwrite `death_count` of the row with primary key `id`, returning the row
    async fn update_death_count(&self, id: i64, death_count: u32) -> StoreResult<DeathCounter>;

    /// Insert the zeroed counter of a freshly created boss
    async fn insert_death_counter(&self, boss_id: BossId) -> StoreResult<DeathCounter>;

    async fn list_timers(&self) -> StoreResult<Vec<Timer>>;

    /// Timer for one boss; `None` when no row exists
    async fn timer_for(&self, boss_id: BossId) -> StoreResult<Option<Timer>>;

    /// Apply a partial update to the timer of `boss_id`
    async fn update_timer(&self, boss_id: BossId, patch: &TimerPatch) -> StoreResult<()>;

    /// Insert the stopped timer of a freshly created boss
    async fn insert_timer(&self, boss_id: BossId) -> StoreResult<Timer>;
}

/// Row-level UPDATE notifications filtered by boss
pub trait ChangeFeed {
    fn watch_death_counter(&self, boss_id: BossId, on_update: Handler<DeathCounter>) -> Subscription;

    fn watch_timer(&self, boss_id: BossId, on_update: Handler<Timer>) -> Subscription;
}

/// Fire-and-forget broadcast of audio cues, delivered to the sender too
#[async_trait(?Send)]
pub trait CueChannel {
    fn listen(&self, on_cue: Handler<CuePayload>) -> Subscription;

    async fn send(&self, cue: &CuePayload) -> StoreResult<()>;
}
