//! Repository Integration Tests
//!
//! Tests for the collaborator contract against the in-process backend.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::cue::CuePayload;
    use crate::domain::{NewBoss, Timer, TimerPatch, TimerStatus};
    use crate::repository::{Backend, ChangeFeed, CueChannel, MemoryBackend, RemoteStore, StoreError};

    fn collect<T: 'static>() -> (Rc<RefCell<Vec<T>>>, Rc<dyn Fn(T)>) {
        let seen: Rc<RefCell<Vec<T>>> = Rc::default();
        let sink = seen.clone();
        (seen, Rc::new(move |value| sink.borrow_mut().push(value)))
    }

    #[tokio::test]
    async fn test_insert_and_list_bosses() {
        let store = MemoryBackend::new();
        store.insert_boss(&NewBoss::new("Mimic Tear", "").unwrap()).await.unwrap();
        store.insert_boss(&NewBoss::new("Loretta", "").unwrap()).await.unwrap();

        let bosses = store.list_bosses().await.expect("List failed");
        assert_eq!(bosses.len(), 2);
        assert!(bosses[0].id > 0);
        assert_ne!(bosses[0].id, bosses[1].id);
    }

    #[tokio::test]
    async fn test_missing_rows_read_as_none() {
        let store = MemoryBackend::new();
        assert!(store.death_counter_for(42).await.unwrap().is_none());
        assert!(store.timer_for(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_counter_fails() {
        let store = MemoryBackend::new();
        let err = store.update_death_count(99, 1).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingRow { table: "death_counters", .. }));
    }

    #[tokio::test]
    async fn test_update_timer_notifies_only_its_boss() {
        let store = MemoryBackend::new();
        let a = store.seed_boss("A");
        let b = store.seed_boss("B");
        let (seen, handler) = collect::<Timer>();
        let _watch = store.watch_timer(a.id, handler);

        let running = TimerPatch { elapsed_time: None, status: TimerStatus::Running };
        store.update_timer(b.id, &running).await.unwrap();
        assert!(seen.borrow().is_empty());

        store.update_timer(a.id, &running).await.unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].status, TimerStatus::Running);
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_delivery() {
        let store = MemoryBackend::new();
        let boss = store.seed_boss("Fire Giant");
        let counter = store.death_counter_for(boss.id).await.unwrap().unwrap();
        let (seen, handler) = collect();

        let watch = store.watch_death_counter(boss.id, handler);
        assert_eq!(store.listener_count(), 1);
        store.update_death_count(counter.id, 1).await.unwrap();
        drop(watch);
        assert_eq!(store.listener_count(), 0);
        store.update_death_count(counter.id, 2).await.unwrap();

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].death_count, 1);
    }

    #[tokio::test]
    async fn test_switching_boss_moves_subscription() {
        let store = MemoryBackend::new();
        let first = store.seed_boss("Draconic Tree Sentinel");
        let second = store.seed_boss("Commander Niall");
        let (seen, handler) = collect::<Timer>();

        let mut slot = Some(store.watch_timer(first.id, handler.clone()));
        assert!(slot.is_some());
        slot = Some(store.watch_timer(second.id, handler));
        assert_eq!(store.listener_count(), 1);

        let stopped = TimerPatch { elapsed_time: Some(0), status: TimerStatus::Stopped };
        store.update_timer(first.id, &stopped).await.unwrap();
        assert!(seen.borrow().is_empty());
        drop(slot);
        assert_eq!(store.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_cue_reaches_sender_and_peers() {
        let viewer_one = MemoryBackend::new();
        let viewer_two = viewer_one.clone();
        let (heard_one, one) = collect::<CuePayload>();
        let (heard_two, two) = collect::<CuePayload>();
        let _a = viewer_one.listen(one);
        let _b = viewer_two.listen(two);

        viewer_one.send(&CuePayload::track("/audio/track5.mp3")).await.unwrap();

        assert_eq!(heard_one.borrow().len(), 1);
        assert_eq!(heard_two.borrow()[0].message, "/audio/track5.mp3");
    }

    #[tokio::test]
    async fn test_cue_sent_while_disconnected_is_dropped() {
        let sender = MemoryBackend::new();
        let viewer = sender.clone();
        let (heard, sink) = collect::<CuePayload>();
        let _listening = viewer.listen(sink);

        sender.set_disconnected(true);
        let result = sender.send(&CuePayload::track("/audio/track2.mp3")).await;
        assert!(matches!(result, Err(StoreError::Channel(_))));

        // Nothing is replayed once the connection is back
        sender.set_disconnected(false);
        sender.send(&CuePayload::track("/audio/track3.mp3")).await.unwrap();
        assert_eq!(sender.cues_sent(), 1);
        let messages: Vec<_> = heard.borrow().iter().map(|c| c.message.clone()).collect();
        assert_eq!(messages, vec!["/audio/track3.mp3"]);
    }

    #[tokio::test]
    async fn test_rejected_writes_leave_rows() {
        let store = MemoryBackend::new();
        let boss = store.seed_boss("Elden Beast");
        store.set_reject_writes(true);

        let patch = TimerPatch { elapsed_time: Some(10), status: TimerStatus::Paused };
        assert!(matches!(store.update_timer(boss.id, &patch).await, Err(StoreError::Rejected(_))));
        assert_eq!(store.timer_for(boss.id).await.unwrap().unwrap(), Timer::new(boss.id));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_backend_bundle_shares_state() {
        let memory = MemoryBackend::new();
        let boss = memory.seed_boss("Godskin Duo");
        let backend = Backend::in_memory(memory.clone());

        let (seen, handler) = collect();
        let _watch = backend.feed.watch_death_counter(boss.id, handler);
        let counter = backend.store.death_counter_for(boss.id).await.unwrap().unwrap();
        backend.store.update_death_count(counter.id, 5).await.unwrap();

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(memory.write_count(), 1);
    }
}
