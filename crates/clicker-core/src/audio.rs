//! Audio Coordinator
//!
//! Owns the "audio enabled" flag and the single active playback handle.
//! Playback and flag persistence go through [`AudioBackend`] and
//! [`FlagStore`], so the browser implementations live in the UI crate and
//! tests drive fakes.

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Pool for `play_random`; the victory track is not part of it
pub const RANDOM_TRACKS: [&str; 8] = [
    "/audio/track1.mp3",
    "/audio/track2.mp3",
    "/audio/track3.mp3",
    "/audio/track4.mp3",
    "/audio/track5.mp3",
    "/audio/track6.mp3",
    "/audio/track7.mp3",
    "/audio/track8.mp3",
];

pub const VICTORY_TRACK: &str = "/audio/gimn.mp3";

/// Local storage key of the persisted flag (JSON boolean text)
pub const AUDIO_ENABLED_KEY: &str = "isAudioEnabled";

/// Catalog lookup; returns the canonical `'static` identifier
pub fn known_track(identifier: &str) -> Option<&'static str> {
    RANDOM_TRACKS
        .iter()
        .copied()
        .chain(std::iter::once(VICTORY_TRACK))
        .find(|track| *track == identifier)
}

/// Starts and halts playback of a track identifier
pub trait AudioBackend {
    type Handle;

    /// Begin playback; `None` when the platform refused to create a player
    fn start(&self, track: &str) -> Option<Self::Handle>;

    /// Pause and rewind
    fn halt(&self, handle: &Self::Handle);
}

/// Raw text persistence of the enabled flag
pub trait FlagStore {
    fn load(&self) -> Option<String>;
    fn save(&self, raw: &str);
}

fn parse_flag(raw: Option<String>) -> bool {
    raw.and_then(|text| serde_json::from_str::<bool>(&text).ok())
        .unwrap_or(false)
}

pub struct AudioCoordinator<B: AudioBackend, S: FlagStore> {
    backend: B,
    flags: S,
    enabled: bool,
    current: Option<(&'static str, B::Handle)>,
    rng: SmallRng,
}

impl<B: AudioBackend, S: FlagStore> AudioCoordinator<B, S> {
    /// Reads the persisted flag once; absent or unparsable means disabled.
    pub fn new(backend: B, flags: S, seed: u64) -> Self {
        let enabled = parse_flag(flags.load());
        debug!("audio enabled on startup: {}", enabled);
        Self {
            backend,
            flags,
            enabled,
            current: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Identifier of the active track
    pub fn current(&self) -> Option<&'static str> {
        self.current.as_ref().map(|(track, _)| *track)
    }

    /// Flip and persist the flag. Playback in progress is left alone.
    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.flags.save(if self.enabled { "true" } else { "false" });
        info!("audio {}", if self.enabled { "enabled" } else { "disabled" });
        self.enabled
    }

    pub fn play_random(&mut self) -> Option<&'static str> {
        if !self.enabled {
            return None;
        }
        let track = RANDOM_TRACKS[self.rng.random_range(0..RANDOM_TRACKS.len())];
        self.replace_with(track);
        Some(track)
    }

    pub fn play_victory(&mut self) -> Option<&'static str> {
        if !self.enabled {
            return None;
        }
        self.replace_with(VICTORY_TRACK);
        Some(VICTORY_TRACK)
    }

    /// Play a track named by a cue. Returns whether playback was started.
    pub fn play_track(&mut self, identifier: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(track) = known_track(identifier) else {
            warn!("ignoring unknown track {:?}", identifier);
            return false;
        };
        self.replace_with(track);
        self.current.is_some()
    }

    pub fn stop(&mut self) {
        if let Some((track, handle)) = self.current.take() {
            self.backend.halt(&handle);
            debug!("stopped {}", track);
        }
    }

    fn replace_with(&mut self, track: &'static str) {
        self.stop();
        match self.backend.start(track) {
            Some(handle) => self.current = Some((track, handle)),
            None => warn!("could not start {}", track),
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{AudioBackend, FlagStore};

    #[derive(Debug, Default)]
    pub(crate) struct Player {
        pub started: Vec<String>,
        pub halted: Vec<usize>,
        pub playing: Vec<usize>,
    }

    #[derive(Clone, Default)]
    pub(crate) struct FakeBackend(pub Rc<RefCell<Player>>);

    impl AudioBackend for FakeBackend {
        type Handle = usize;

        fn start(&self, track: &str) -> Option<usize> {
            let mut player = self.0.borrow_mut();
            player.started.push(track.to_string());
            let handle = player.started.len();
            player.playing.push(handle);
            Some(handle)
        }

        fn halt(&self, handle: &usize) {
            let mut player = self.0.borrow_mut();
            player.halted.push(*handle);
            player.playing.retain(|h| h != handle);
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct FakeStorage(pub Rc<RefCell<Option<String>>>);

    impl FlagStore for FakeStorage {
        fn load(&self) -> Option<String> {
            self.0.borrow().clone()
        }

        fn save(&self, raw: &str) {
            *self.0.borrow_mut() = Some(raw.to_string());
        }
    }

    impl FakeStorage {
        pub fn with(raw: &str) -> Self {
            Self(Rc::new(RefCell::new(Some(raw.to_string()))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{FakeBackend, FakeStorage};
    use super::*;

    fn enabled_coordinator(backend: &FakeBackend) -> AudioCoordinator<FakeBackend, FakeStorage> {
        let storage = FakeStorage::with("true");
        AudioCoordinator::new(backend.clone(), storage, 7)
    }

    #[test]
    fn test_disabled_plays_nothing() {
        let backend = FakeBackend::default();
        let mut audio = AudioCoordinator::new(backend.clone(), FakeStorage::default(), 1);
        assert!(!audio.is_enabled());
        assert_eq!(audio.play_random(), None);
        assert_eq!(audio.play_victory(), None);
        assert!(!audio.play_track("/audio/track1.mp3"));
        assert!(backend.0.borrow().started.is_empty());
    }

    #[test]
    fn test_single_active_handle() {
        let backend = FakeBackend::default();
        let mut audio = enabled_coordinator(&backend);

        let first = audio.play_random().unwrap();
        assert!(RANDOM_TRACKS.contains(&first));
        audio.play_victory();

        let player = backend.0.borrow();
        assert_eq!(player.halted, vec![1]);
        assert_eq!(player.playing, vec![2]);
        assert_eq!(audio.current(), Some(VICTORY_TRACK));
    }

    #[test]
    fn test_random_never_picks_victory() {
        let backend = FakeBackend::default();
        let mut audio = enabled_coordinator(&backend);
        for _ in 0..200 {
            assert_ne!(audio.play_random(), Some(VICTORY_TRACK));
        }
        assert_eq!(backend.0.borrow().playing.len(), 1);
    }

    #[test]
    fn test_flag_survives_reload() {
        let storage = FakeStorage::default();
        let mut audio = AudioCoordinator::new(FakeBackend::default(), storage.clone(), 1);
        assert!(audio.toggle_enabled());
        assert_eq!(storage.load().as_deref(), Some("true"));
        drop(audio);

        let reloaded = AudioCoordinator::new(FakeBackend::default(), storage, 2);
        assert!(reloaded.is_enabled());
    }

    #[test]
    fn test_garbage_flag_defaults_to_disabled() {
        let storage = FakeStorage::with("yes please");
        assert!(!AudioCoordinator::new(FakeBackend::default(), storage, 1).is_enabled());
    }

    #[test]
    fn test_unknown_track_is_ignored() {
        let backend = FakeBackend::default();
        let mut audio = enabled_coordinator(&backend);
        audio.play_track("/audio/track2.mp3");
        assert!(!audio.play_track("/etc/passwd"));
        assert_eq!(audio.current(), Some("/audio/track2.mp3"));
        assert!(backend.0.borrow().halted.is_empty());
    }

    #[test]
    fn test_stop_rewinds_and_clears() {
        let backend = FakeBackend::default();
        let mut audio = enabled_coordinator(&backend);
        audio.play_victory();
        audio.stop();
        audio.stop();
        assert_eq!(audio.current(), None);
        assert_eq!(backend.0.borrow().halted, vec![1]);
    }
}
