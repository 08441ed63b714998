//! Death tally mutations.
//!
//! The next value is computed from the locally held row and written by
//! primary key. Concurrent writers can overwrite each other; the store has no
//! atomic increment and none is emulated here.

use log::{debug, info};

use crate::domain::DeathCounter;
use crate::repository::{RemoteStore, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increment,
    Decrement,
}

/// Count to write for `step`, or `None` when the step would go below zero
pub fn next_count(counter: &DeathCounter, step: Step) -> Option<u32> {
    match step {
        Step::Increment => Some(counter.death_count.saturating_add(1)),
        Step::Decrement => counter.death_count.checked_sub(1),
    }
}

/// Write `step` against `counter`. Returns the row as stored, or `None`
/// when no write was issued.
pub async fn step<S>(store: &S, counter: &DeathCounter, step: Step) -> StoreResult<Option<DeathCounter>>
where
    S: RemoteStore + ?Sized,
{
    let Some(next) = next_count(counter, step) else {
        debug!("death count of boss {} already at zero", counter.boss_id);
        return Ok(None);
    };
    let row = store.update_death_count(counter.id, next).await?;
    info!("death count of boss {} is now {}", row.boss_id, row.death_count);
    Ok(Some(row))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::repository::{ChangeFeed, MemoryBackend};

    async fn counter_of(store: &MemoryBackend, boss_id: i64) -> DeathCounter {
        store.death_counter_for(boss_id).await.unwrap().unwrap()
    }

    #[test]
    fn test_next_count_floors_at_zero() {
        let mut counter = DeathCounter {
            id: 1,
            boss_id: 1,
            death_count: 0,
            updated_at: chrono::Utc::now(),
        };
        assert_eq!(next_count(&counter, Step::Decrement), None);
        assert_eq!(next_count(&counter, Step::Increment), Some(1));
        counter.death_count = 7;
        assert_eq!(next_count(&counter, Step::Decrement), Some(6));
    }

    #[tokio::test]
    async fn test_sequence_tracks_server_value() {
        let store = MemoryBackend::new();
        let boss = store.seed_boss("Godfrey");
        let mut local = counter_of(&store, boss.id).await;

        for s in [Step::Increment, Step::Increment, Step::Decrement, Step::Decrement, Step::Decrement] {
            if let Some(row) = step(&store, &local, s).await.unwrap() {
                local = row;
            }
            assert_eq!(local, counter_of(&store, boss.id).await);
        }
        assert_eq!(local.death_count, 0);
    }

    #[tokio::test]
    async fn test_decrement_at_zero_writes_nothing() {
        let store = MemoryBackend::new();
        let boss = store.seed_boss("Maliketh");
        let local = counter_of(&store, boss.id).await;

        assert_eq!(step(&store, &local, Step::Decrement).await.unwrap(), None);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_local_row() {
        let store = MemoryBackend::new();
        let boss = store.seed_boss("Mohg");
        let local = counter_of(&store, boss.id).await;
        store.set_reject_writes(true);

        assert!(step(&store, &local, Step::Increment).await.is_err());
        assert_eq!(counter_of(&store, boss.id).await.death_count, 0);
    }

    #[tokio::test]
    async fn test_second_client_follows_change_feed() {
        let store = MemoryBackend::new();
        let boss = store.seed_boss("Rykard");
        let client_one = store.clone();
        let client_two = store.clone();

        let seen: Rc<RefCell<Option<DeathCounter>>> = Rc::default();
        let sink = seen.clone();
        let _subscription = client_two.watch_death_counter(
            boss.id,
            Rc::new(move |row| {
                *sink.borrow_mut() = Some(row);
            }),
        );

        let local = counter_of(&client_one, boss.id).await;
        step(&client_one, &local, Step::Increment).await.unwrap();

        assert_eq!(seen.borrow().as_ref().map(|c| c.death_count), Some(1));
        assert_eq!(store.write_count(), 1);
    }
}
