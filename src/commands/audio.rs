//! Browser audio and local storage
//!
//! `HtmlAudioElement` playback and the `localStorage` flag behind the
//! audio coordinator.

use leptos::task::spawn_local;
use log::warn;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAudioElement, Storage};

use clicker_core::audio::{AudioBackend, AudioCoordinator, FlagStore, AUDIO_ENABLED_KEY};

pub type BrowserAudio = AudioCoordinator<WebAudio, LocalFlagStore>;

/// Coordinator backed by the page's audio elements and storage
pub fn browser_audio() -> BrowserAudio {
    let seed = js_sys::Date::now() as u64;
    AudioCoordinator::new(WebAudio, LocalFlagStore, seed)
}

pub struct WebAudio;

impl AudioBackend for WebAudio {
    type Handle = HtmlAudioElement;

    fn start(&self, track: &str) -> Option<HtmlAudioElement> {
        let audio = match HtmlAudioElement::new_with_src(track) {
            Ok(audio) => audio,
            Err(e) => {
                warn!("cannot create audio element for {}: {:?}", track, e);
                return None;
            }
        };
        match audio.play() {
            Ok(promise) => {
                let track = track.to_string();
                spawn_local(async move {
                    // Autoplay policy rejects playback before the first user gesture.
                    if let Err(e) = JsFuture::from(promise).await {
                        warn!("playback of {} refused: {:?}", track, e);
                    }
                });
            }
            Err(e) => warn!("playback of {} failed: {:?}", track, e),
        }
        Some(audio)
    }

    fn halt(&self, audio: &HtmlAudioElement) {
        if let Err(e) = audio.pause() {
            warn!("pause failed: {:?}", e);
        }
        audio.set_current_time(0.0);
    }
}

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub struct LocalFlagStore;

impl FlagStore for LocalFlagStore {
    fn load(&self) -> Option<String> {
        local_storage().and_then(|s| s.get_item(AUDIO_ENABLED_KEY).ok().flatten())
    }

    fn save(&self, raw: &str) {
        match local_storage() {
            Some(storage) => {
                if let Err(e) = storage.set_item(AUDIO_ENABLED_KEY, raw) {
                    warn!("could not persist {}: {:?}", AUDIO_ENABLED_KEY, e);
                }
            }
            None => warn!("localStorage unavailable, {} not persisted", AUDIO_ENABLED_KEY),
        }
    }
}
