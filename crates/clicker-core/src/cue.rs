//! Cross-client audio cues.
//!
//! The client that mutates the tally (or declares victory) picks a track,
//! plays it, and broadcasts the identifier. Every listener, the sender
//! included, plays what it receives. Delivery is fire-and-forget.

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::audio::{AudioBackend, AudioCoordinator, FlagStore};
use crate::repository::CueChannel;

/// Broadcast channel name
pub const CUE_CHANNEL: &str = "current_audio";
/// Broadcast event name
pub const CUE_EVENT: &str = "new-audio";

/// Broadcast payload: `{ "message": "<track identifier>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuePayload {
    pub message: String,
}

impl CuePayload {
    pub fn track(identifier: &str) -> Self {
        Self { message: identifier.to_string() }
    }
}

/// What triggered the cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Death count changed
    Random,
    /// Boss defeated
    Victory,
}

/// Play the cue locally; returns the payload to broadcast, or `None` when
/// audio is disabled on this client.
pub fn select<B, S>(audio: &mut AudioCoordinator<B, S>, cue: Cue) -> Option<CuePayload>
where
    B: AudioBackend,
    S: FlagStore,
{
    let track = match cue {
        Cue::Random => audio.play_random(),
        Cue::Victory => audio.play_victory(),
    };
    track.map(CuePayload::track)
}

/// Send `payload` if there is one. Failures are logged and dropped.
pub async fn announce<C>(channel: &C, payload: Option<CuePayload>)
where
    C: CueChannel + ?Sized,
{
    let Some(payload) = payload else {
        debug!("no track selected, nothing to broadcast");
        return;
    };
    if let Err(e) = channel.send(&payload).await {
        error!("failed to broadcast {}: {}", payload.message, e);
    }
}

/// Handle an incoming cue
pub fn receive<B, S>(audio: &mut AudioCoordinator<B, S>, payload: &CuePayload) -> bool
where
    B: AudioBackend,
    S: FlagStore,
{
    audio.play_track(&payload.message)
}
