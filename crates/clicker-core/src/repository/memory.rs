//! In-Process Backend
//!
//! Implements the whole collaborator contract over in-memory tables.
//! Clones share the same tables and listeners, so two clones behave like two
//! viewers connected to one store. Used for tests and the offline mode.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use chrono::Utc;

use crate::cue::CuePayload;
use crate::domain::{Boss, BossId, DeathCounter, Entity, NewBoss, Timer, TimerPatch};

use super::traits::{ChangeFeed, CueChannel, Handler, RemoteStore};
use super::supabase::DEATH_COUNTERS;
use super::{StoreError, StoreResult, Subscription};

#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    bosses: Vec<Boss>,
    death_counters: Vec<DeathCounter>,
    timers: Vec<Timer>,
    next_row_id: i64,
    next_listener_id: u64,
    counter_watchers: Vec<Watcher<DeathCounter>>,
    timer_watchers: Vec<Watcher<Timer>>,
    cue_listeners: Vec<(u64, Handler<CuePayload>)>,
    writes: usize,
    cues_sent: usize,
    reject_writes: bool,
    disconnected: bool,
}

struct Watcher<T> {
    id: u64,
    boss_id: BossId,
    handler: Handler<T>,
}

impl MemoryState {
    fn next_row_id(&mut self) -> i64 {
        self.next_row_id += 1;
        self.next_row_id
    }

    fn next_listener_id(&mut self) -> u64 {
        self.next_listener_id += 1;
        self.next_listener_id
    }

    fn begin_write(&mut self) -> StoreResult<()> {
        if self.reject_writes {
            return Err(StoreError::Rejected("writes are disabled".to_string()));
        }
        self.writes += 1;
        Ok(())
    }

    fn insert_boss_rows(&mut self, boss: &NewBoss) -> Boss {
        let row = Boss {
            id: self.next_row_id(),
            name: boss.name.clone(),
            description: boss.description.clone(),
            image_url: None,
            created_at: Utc::now(),
        };
        self.bosses.push(row.clone());
        row
    }

    fn insert_counter_row(&mut self, boss_id: BossId) -> DeathCounter {
        let row = DeathCounter {
            id: self.next_row_id(),
            boss_id,
            death_count: 0,
            updated_at: Utc::now(),
        };
        self.death_counters.push(row.clone());
        row
    }

    fn insert_timer_row(&mut self, boss_id: BossId) -> Timer {
        let row = Timer::new(boss_id);
        self.timers.push(row.clone());
        row
    }
}

fn find_mut<T: Entity>(rows: &mut [T], id: T::Id) -> Option<&mut T> {
    rows.iter_mut().find(|row| row.id() == id)
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a boss with its counter and timer without counting writes
    pub fn seed_boss(&self, name: &str) -> Boss {
        let mut state = self.state.borrow_mut();
        let boss = state.insert_boss_rows(&NewBoss {
            name: name.to_string(),
            description: None,
        });
        state.insert_counter_row(boss.id);
        state.insert_timer_row(boss.id);
        boss
    }

    /// Number of successful table writes so far
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    pub fn cues_sent(&self) -> usize {
        self.state.borrow().cues_sent
    }

    /// Make every subsequent write fail with [`StoreError::Rejected`]
    pub fn set_reject_writes(&self, reject: bool) {
        self.state.borrow_mut().reject_writes = reject;
    }

    /// Simulate a dropped broadcast connection; cues sent meanwhile are lost
    pub fn set_disconnected(&self, disconnected: bool) {
        self.state.borrow_mut().disconnected = disconnected;
    }

    /// Active change-feed and cue listeners
    pub fn listener_count(&self) -> usize {
        let state = self.state.borrow();
        state.counter_watchers.len() + state.timer_watchers.len() + state.cue_listeners.len()
    }

    fn notify_counter(&self, row: &DeathCounter) {
        let handlers: Vec<_> = self
            .state
            .borrow()
            .counter_watchers
            .iter()
            .filter(|w| w.boss_id == row.boss_id)
            .map(|w| w.handler.clone())
            .collect();
        for handler in handlers {
            handler(row.clone());
        }
    }

    fn notify_timer(&self, row: &Timer) {
        let handlers: Vec<_> = self
            .state
            .borrow()
            .timer_watchers
            .iter()
            .filter(|w| w.boss_id == row.boss_id)
            .map(|w| w.handler.clone())
            .collect();
        for handler in handlers {
            handler(row.clone());
        }
    }
}

#[async_trait(?Send)]
impl RemoteStore for MemoryBackend {
    async fn list_bosses(&self) -> StoreResult<Vec<Boss>> {
        Ok(self.state.borrow().bosses.clone())
    }

    async fn insert_boss(&self, boss: &NewBoss) -> StoreResult<Boss> {
        let mut state = self.state.borrow_mut();
        state.begin_write()?;
        Ok(state.insert_boss_rows(boss))
    }

    async fn list_death_counters(&self) -> StoreResult<Vec<DeathCounter>> {
        Ok(self.state.borrow().death_counters.clone())
    }

    async fn death_counter_for(&self, boss_id: BossId) -> StoreResult<Option<DeathCounter>> {
        Ok(self
            .state
            .borrow()
            .death_counters
            .iter()
            .find(|c| c.boss_id == boss_id)
            .cloned())
    }

    async fn update_death_count(&self, id: i64, death_count: u32) -> StoreResult<DeathCounter> {
        let row = {
            let mut state = self.state.borrow_mut();
            state.begin_write()?;
            let row = find_mut(&mut state.death_counters, id).ok_or_else(|| StoreError::MissingRow {
                table: DEATH_COUNTERS,
                filter: format!("id=eq.{}", id),
            })?;
            row.death_count = death_count;
            row.updated_at = Utc::now();
            row.clone()
        };
        self.notify_counter(&row);
        Ok(row)
    }

    async fn insert_death_counter(&self, boss_id: BossId) -> StoreResult<DeathCounter> {
        let mut state = self.state.borrow_mut();
        state.begin_write()?;
        Ok(state.insert_counter_row(boss_id))
    }

    async fn list_timers(&self) -> StoreResult<Vec<Timer>> {
        Ok(self.state.borrow().timers.clone())
    }

    async fn timer_for(&self, boss_id: BossId) -> StoreResult<Option<Timer>> {
        Ok(self
            .state
            .borrow()
            .timers
            .iter()
            .find(|t| t.boss_id == boss_id)
            .cloned())
    }

    async fn update_timer(&self, boss_id: BossId, patch: &TimerPatch) -> StoreResult<()> {
        let row = {
            let mut state = self.state.borrow_mut();
            state.begin_write()?;
            // Same as PostgREST: a filter matching no row is not an error.
            find_mut(&mut state.timers, boss_id).map(|row| {
                row.apply(patch);
                row.clone()
            })
        };
        if let Some(row) = row {
            self.notify_timer(&row);
        }
        Ok(())
    }

    async fn insert_timer(&self, boss_id: BossId) -> StoreResult<Timer> {
        let mut state = self.state.borrow_mut();
        state.begin_write()?;
        Ok(state.insert_timer_row(boss_id))
    }
}

impl ChangeFeed for MemoryBackend {
    fn watch_death_counter(&self, boss_id: BossId, on_update: Handler<DeathCounter>) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener_id();
            state.counter_watchers.push(Watcher { id, boss_id, handler: on_update });
            id
        };
        let weak: Weak<RefCell<MemoryState>> = Rc::downgrade(&self.state);
        Subscription::new(format!("death_counters:boss_id=eq.{}", boss_id), move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().counter_watchers.retain(|w| w.id != id);
            }
        })
    }

    fn watch_timer(&self, boss_id: BossId, on_update: Handler<Timer>) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener_id();
            state.timer_watchers.push(Watcher { id, boss_id, handler: on_update });
            id
        };
        let weak = Rc::downgrade(&self.state);
        Subscription::new(format!("timers:boss_id=eq.{}", boss_id), move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().timer_watchers.retain(|w| w.id != id);
            }
        })
    }
}

#[async_trait(?Send)]
impl CueChannel for MemoryBackend {
    fn listen(&self, on_cue: Handler<CuePayload>) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener_id();
            state.cue_listeners.push((id, on_cue));
            id
        };
        let weak = Rc::downgrade(&self.state);
        Subscription::new("broadcast:current_audio", move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().cue_listeners.retain(|(listener, _)| *listener != id);
            }
        })
    }

    async fn send(&self, cue: &CuePayload) -> StoreResult<()> {
        let listeners: Vec<_> = {
            let mut state = self.state.borrow_mut();
            if state.disconnected {
                return Err(StoreError::Channel("realtime:current_audio is not connected".to_string()));
            }
            state.cues_sent += 1;
            state.cue_listeners.iter().map(|(_, handler)| handler.clone()).collect()
        };
        for listener in listeners {
            listener(cue.clone());
        }
        Ok(())
    }
}
