//! Application Context
//!
//! Shared state provided via Leptos Context API: the remote backend and the
//! audio coordinator, both constructed once by the app root.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use clicker_core::cue::{self, Cue, CuePayload};
use clicker_core::repository::{Backend, Subscription};

use crate::commands::BrowserAudio;

#[derive(Clone, Copy)]
pub struct AppContext {
    backend: StoredValue<Backend, LocalStorage>,
    audio: StoredValue<BrowserAudio, LocalStorage>,
    /// Mirror of the coordinator's enabled flag - read
    pub audio_enabled: ReadSignal<bool>,
    /// Mirror of the coordinator's enabled flag - write
    set_audio_enabled: WriteSignal<bool>,
}

impl AppContext {
    pub fn new(backend: Backend, audio: BrowserAudio) -> Self {
        let (audio_enabled, set_audio_enabled) = signal(audio.is_enabled());
        Self {
            backend: StoredValue::new_local(backend),
            audio: StoredValue::new_local(audio),
            audio_enabled,
            set_audio_enabled,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend.get_value()
    }

    pub fn toggle_audio(&self) {
        if let Some(enabled) = self.audio.try_update_value(|audio| audio.toggle_enabled()) {
            self.set_audio_enabled.set(enabled);
        }
    }

    pub fn stop_audio(&self) {
        self.audio.update_value(|audio| audio.stop());
    }

    /// Play `cue` here and broadcast the chosen track to the other viewers
    pub fn announce_cue(&self, cue: Cue) {
        let payload = self
            .audio
            .try_update_value(|audio| cue::select(audio, cue))
            .flatten();
        let backend = self.backend();
        spawn_local(async move {
            cue::announce(backend.cues.as_ref(), payload).await;
        });
    }

    /// Play every cue broadcast on the shared channel, own cues included
    pub fn listen_for_cues(&self) -> Subscription {
        let audio = self.audio;
        self.backend().cues.listen(Rc::new(move |payload: CuePayload| {
            audio.update_value(|audio| {
                cue::receive(audio, &payload);
            });
        }))
    }
}
