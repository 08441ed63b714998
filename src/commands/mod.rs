//! Browser Bindings
//!
//! Platform side of the collaborator seams: the realtime WebSocket, audio
//! playback, local storage and backend selection.

mod audio;
mod backend;
mod realtime;

pub use audio::{browser_audio, BrowserAudio};
pub use backend::connect_backend;
