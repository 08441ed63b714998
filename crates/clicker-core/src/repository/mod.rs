//! Repository Layer
//!
//! Contract of the remote data collaborator plus its implementations:
//! Supabase (PostgREST + Realtime) and an in-process backend.

mod traits;
mod error;
mod subscription;
mod memory;
pub mod supabase;

#[cfg(test)]
mod tests;

use std::rc::Rc;

pub use traits::{ChangeFeed, CueChannel, Handler, RemoteStore};
pub use error::{StoreError, StoreResult};
pub use subscription::Subscription;
pub use memory::MemoryBackend;

/// The three collaborator seams bundled for the views
#[derive(Clone)]
pub struct Backend {
    pub store: Rc<dyn RemoteStore>,
    pub feed: Rc<dyn ChangeFeed>,
    pub cues: Rc<dyn CueChannel>,
}

impl Backend {
    pub fn new(store: Rc<dyn RemoteStore>, feed: Rc<dyn ChangeFeed>, cues: Rc<dyn CueChannel>) -> Self {
        Self { store, feed, cues }
    }

    /// Everything served by one in-process backend
    pub fn in_memory(memory: MemoryBackend) -> Self {
        let shared = Rc::new(memory);
        Self {
            store: shared.clone(),
            feed: shared.clone(),
            cues: shared,
        }
    }
}
