//! Backend wiring: Supabase when configured at build time, otherwise the
//! in-process backend.

use std::rc::Rc;

use log::{info, warn};

use clicker_core::repository::supabase::{SupabaseConfig, SupabaseRest};
use clicker_core::repository::{Backend, MemoryBackend};

use super::realtime::RealtimeSocket;

pub fn connect_backend() -> Backend {
    let config = match SupabaseConfig::from_build_env() {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; running offline with an in-memory store", e);
            return Backend::in_memory(MemoryBackend::new());
        }
    };
    let rest = match SupabaseRest::new(&config) {
        Ok(rest) => rest,
        Err(e) => {
            warn!("{}; running offline with an in-memory store", e);
            return Backend::in_memory(MemoryBackend::new());
        }
    };
    let socket = Rc::new(RealtimeSocket::open(&config));
    info!("using Supabase project {}", config.url);
    Backend::new(Rc::new(rest), socket.clone(), socket)
}
