//! Realtime Socket
//!
//! Browser WebSocket transport for Supabase Realtime. Channels are joined on
//! first listener and left when the last listener's handle drops; every open
//! (first connect and reconnects) re-joins whatever is still listened to.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use gloo_timers::callback::{Interval, Timeout};
use log::{debug, error, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use clicker_core::cue::{CuePayload, CUE_CHANNEL, CUE_EVENT};
use clicker_core::domain::{BossId, DeathCounter, Timer};
use clicker_core::repository::supabase::realtime::{
    self, broadcast_frame, heartbeat_frame, join_frame, leave_frame, ChannelSpec, Frame, Incoming,
    HEARTBEAT_INTERVAL_MS, RECONNECT_DELAY_MS,
};
use clicker_core::repository::supabase::SupabaseConfig;
use clicker_core::repository::{ChangeFeed, CueChannel, Handler, StoreError, StoreResult, Subscription};

#[derive(Clone)]
enum Route {
    Counter(Handler<DeathCounter>),
    Timer(Handler<Timer>),
    Cue(Handler<CuePayload>),
}

struct Channel {
    spec: ChannelSpec,
    listeners: Vec<(u64, Route)>,
}

/// JS callbacks of the current socket, kept alive alongside it
struct SocketCallbacks {
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

struct SocketState {
    url: String,
    access_token: String,
    socket: Option<WebSocket>,
    callbacks: Option<SocketCallbacks>,
    open: bool,
    next_ref: u64,
    next_listener: u64,
    channels: HashMap<String, Channel>,
    heartbeat: Option<Interval>,
    reconnect: Option<Timeout>,
}

impl SocketState {
    fn next_ref(&mut self) -> u64 {
        self.next_ref += 1;
        self.next_ref
    }

    /// Write a frame if the socket is open; returns whether it went out
    fn transmit(&self, frame: &Frame) -> bool {
        let Some(socket) = self.socket.as_ref().filter(|_| self.open) else {
            return false;
        };
        match socket.send_with_str(&frame.to_text()) {
            Ok(()) => true,
            Err(e) => {
                warn!("realtime send on {} failed: {:?}", frame.topic, e);
                false
            }
        }
    }

    fn join(&mut self, spec: &ChannelSpec) {
        let reference = self.next_ref();
        let frame = join_frame(spec, &self.access_token, reference);
        if self.transmit(&frame) {
            debug!("joining {}", spec.topic);
        }
    }

    fn routes(&self, topic: &str) -> Vec<Route> {
        self.channels
            .get(topic)
            .map(|channel| channel.listeners.iter().map(|(_, route)| route.clone()).collect())
            .unwrap_or_default()
    }
}

/// One multiplexed realtime connection
#[derive(Clone)]
pub struct RealtimeSocket {
    inner: Rc<RefCell<SocketState>>,
}

impl RealtimeSocket {
    /// Start connecting; listeners can be added right away
    pub fn open(config: &SupabaseConfig) -> Self {
        let socket = Self {
            inner: Rc::new(RefCell::new(SocketState {
                url: config.realtime_url(),
                access_token: config.anon_key.clone(),
                socket: None,
                callbacks: None,
                open: false,
                next_ref: 0,
                next_listener: 0,
                channels: HashMap::new(),
                heartbeat: None,
                reconnect: None,
            })),
        };
        connect(&socket.inner);
        socket
    }

    fn add_listener(&self, spec: ChannelSpec, route: Route) -> Subscription {
        let topic = spec.topic.clone();
        let id = {
            let mut state = self.inner.borrow_mut();
            state.next_listener += 1;
            let id = state.next_listener;
            if !state.channels.contains_key(&topic) {
                state.join(&spec);
                state.channels.insert(
                    topic.clone(),
                    Channel {
                        spec,
                        listeners: Vec::new(),
                    },
                );
            }
            if let Some(channel) = state.channels.get_mut(&topic) {
                channel.listeners.push((id, route));
            }
            id
        };

        let weak: Weak<RefCell<SocketState>> = Rc::downgrade(&self.inner);
        Subscription::new(topic.clone(), move || {
            if let Some(inner) = weak.upgrade() {
                remove_listener(&inner, &topic, id);
            }
        })
    }
}

fn remove_listener(inner: &Rc<RefCell<SocketState>>, topic: &str, id: u64) {
    let mut state = inner.borrow_mut();
    let now_empty = match state.channels.get_mut(topic) {
        Some(channel) => {
            channel.listeners.retain(|(listener, _)| *listener != id);
            channel.listeners.is_empty()
        }
        None => false,
    };
    if now_empty {
        state.channels.remove(topic);
        let reference = state.next_ref();
        state.transmit(&leave_frame(topic, reference));
        debug!("left {}", topic);
    }
}

fn connect(inner: &Rc<RefCell<SocketState>>) {
    let url = inner.borrow().url.clone();
    let socket = match WebSocket::new(&url) {
        Ok(socket) => socket,
        Err(e) => {
            error!("could not open realtime socket: {:?}", e);
            schedule_reconnect(inner);
            return;
        }
    };

    let weak = Rc::downgrade(inner);
    let on_open = {
        let weak = weak.clone();
        Closure::wrap(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                handle_open(&inner);
            }
        }) as Box<dyn FnMut()>)
    };
    let on_message = {
        let weak = weak.clone();
        Closure::wrap(Box::new(move |event: MessageEvent| {
            let Some(text) = event.data().as_string() else {
                return;
            };
            if let Some(inner) = weak.upgrade() {
                handle_message(&inner, &text);
            }
        }) as Box<dyn FnMut(MessageEvent)>)
    };
    let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
        if let Some(inner) = weak.upgrade() {
            handle_close(&inner, event.code());
        }
    }) as Box<dyn FnMut(CloseEvent)>);

    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    let mut state = inner.borrow_mut();
    state.socket = Some(socket);
    state.callbacks = Some(SocketCallbacks {
        _on_open: on_open,
        _on_message: on_message,
        _on_close: on_close,
    });
}

fn handle_open(inner: &Rc<RefCell<SocketState>>) {
    let weak = Rc::downgrade(inner);
    let heartbeat = Interval::new(HEARTBEAT_INTERVAL_MS, move || {
        if let Some(inner) = weak.upgrade() {
            let mut state = inner.borrow_mut();
            let reference = state.next_ref();
            state.transmit(&heartbeat_frame(reference));
        }
    });

    let mut state = inner.borrow_mut();
    state.open = true;
    state.heartbeat = Some(heartbeat);
    let specs: Vec<ChannelSpec> = state.channels.values().map(|c| c.spec.clone()).collect();
    for spec in &specs {
        state.join(spec);
    }
    info!("realtime connected, {} channel(s) joined", specs.len());
}

fn handle_close(inner: &Rc<RefCell<SocketState>>, code: u16) {
    {
        let mut state = inner.borrow_mut();
        state.open = false;
        state.heartbeat = None;
        state.socket = None;
    }
    warn!("realtime socket closed (code {}), reconnecting", code);
    schedule_reconnect(inner);
}

fn schedule_reconnect(inner: &Rc<RefCell<SocketState>>) {
    let weak = Rc::downgrade(inner);
    let timeout = Timeout::new(RECONNECT_DELAY_MS, move || {
        if let Some(inner) = weak.upgrade() {
            connect(&inner);
        }
    });
    inner.borrow_mut().reconnect = Some(timeout);
}

fn handle_message(inner: &Rc<RefCell<SocketState>>, text: &str) {
    let frame = match Frame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("unreadable realtime frame: {}", e);
            return;
        }
    };
    match realtime::classify(frame) {
        Incoming::RowChange { topic, record, .. } => {
            let routes = inner.borrow().routes(&topic);
            for route in routes {
                deliver_row(route, record.clone());
            }
        }
        Incoming::Broadcast { topic, event, payload } => {
            if event != CUE_EVENT {
                debug!("ignoring broadcast {} on {}", event, topic);
                return;
            }
            let cue: CuePayload = match realtime::decode(payload) {
                Ok(cue) => cue,
                Err(e) => {
                    warn!("malformed cue on {}: {}", topic, e);
                    return;
                }
            };
            let routes = inner.borrow().routes(&topic);
            for route in routes {
                if let Route::Cue(handler) = route {
                    handler(cue.clone());
                }
            }
        }
        Incoming::Reply { topic, ok: false, .. } => warn!("realtime rejected a request on {}", topic),
        Incoming::ChannelClosed { topic, reason } => warn!("channel {} closed: {}", topic, reason),
        Incoming::Reply { .. } | Incoming::Ignored { .. } => {}
    }
}

fn deliver_row(route: Route, record: serde_json::Value) {
    match route {
        Route::Counter(handler) => match realtime::decode::<DeathCounter>(record) {
            Ok(row) => handler(row),
            Err(e) => warn!("malformed death counter row: {}", e),
        },
        Route::Timer(handler) => match realtime::decode::<Timer>(record) {
            Ok(row) => handler(row),
            Err(e) => warn!("malformed timer row: {}", e),
        },
        Route::Cue(_) => {}
    }
}

impl ChangeFeed for RealtimeSocket {
    fn watch_death_counter(&self, boss_id: BossId, on_update: Handler<DeathCounter>) -> Subscription {
        self.add_listener(ChannelSpec::death_counter_updates(boss_id), Route::Counter(on_update))
    }

    fn watch_timer(&self, boss_id: BossId, on_update: Handler<Timer>) -> Subscription {
        self.add_listener(ChannelSpec::timer_updates(boss_id), Route::Timer(on_update))
    }
}

#[async_trait(?Send)]
impl CueChannel for RealtimeSocket {
    fn listen(&self, on_cue: Handler<CuePayload>) -> Subscription {
        self.add_listener(ChannelSpec::broadcast(CUE_CHANNEL), Route::Cue(on_cue))
    }

    async fn send(&self, cue: &CuePayload) -> StoreResult<()> {
        let topic = realtime::topic_name(CUE_CHANNEL);
        let mut state = self.inner.borrow_mut();
        if !state.channels.contains_key(&topic) {
            return Err(StoreError::Channel(format!("{} is not joined", topic)));
        }
        let reference = state.next_ref();
        let frame = broadcast_frame(&topic, CUE_EVENT, cue, reference);
        // Cues are at-most-once: a closed socket drops them
        if !state.transmit(&frame) {
            return Err(StoreError::Channel(format!("{} is not connected", topic)));
        }
        Ok(())
    }
}
