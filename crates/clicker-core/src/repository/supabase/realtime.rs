//! Supabase Realtime wire codec
//!
//! Phoenix channel frames (`{topic, event, payload, ref}`) for joining
//! `postgres_changes` and broadcast channels, heartbeats, outgoing broadcasts
//! and the classification of incoming frames. Transport-free so it can be
//! tested off the browser.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::BossId;

use super::{DEATH_COUNTERS, TIMERS};

/// Interval between `heartbeat` frames on the `phoenix` topic
pub const HEARTBEAT_INTERVAL_MS: u32 = 30_000;
/// Delay before reopening a closed socket
pub const RECONNECT_DELAY_MS: u32 = 5_000;

const PHOENIX_TOPIC: &str = "phoenix";
const EVENT_JOIN: &str = "phx_join";
const EVENT_LEAVE: &str = "phx_leave";
const EVENT_REPLY: &str = "phx_reply";
const EVENT_ERROR: &str = "phx_error";
const EVENT_CLOSE: &str = "phx_close";
const EVENT_HEARTBEAT: &str = "heartbeat";
const EVENT_BROADCAST: &str = "broadcast";
const EVENT_POSTGRES_CHANGES: &str = "postgres_changes";

/// One Phoenix message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

impl Frame {
    pub fn to_text(&self) -> String {
        // Frame holds only strings and JSON values, serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// What a channel listens to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKind {
    /// Row UPDATEs of `table` narrowed by a PostgREST-style `filter`
    RowUpdates { table: String, filter: String },
    /// Broadcast messages, echoed back to the sender
    Broadcast,
}

/// A channel to join: `realtime:<name>` plus its subscription config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub topic: String,
    pub kind: ChannelKind,
}

impl ChannelSpec {
    /// UPDATE events of `table` for one boss
    pub fn row_updates(table: &str, boss_id: BossId) -> Self {
        Self {
            topic: topic_name(&format!("{}_changes_{}", table, boss_id)),
            kind: ChannelKind::RowUpdates {
                table: table.to_string(),
                filter: format!("boss_id=eq.{}", boss_id),
            },
        }
    }

    pub fn death_counter_updates(boss_id: BossId) -> Self {
        Self::row_updates(DEATH_COUNTERS, boss_id)
    }

    pub fn timer_updates(boss_id: BossId) -> Self {
        Self::row_updates(TIMERS, boss_id)
    }

    pub fn broadcast(channel: &str) -> Self {
        Self {
            topic: topic_name(channel),
            kind: ChannelKind::Broadcast,
        }
    }

    fn join_config(&self) -> Value {
        match &self.kind {
            ChannelKind::RowUpdates { table, filter } => json!({
                "broadcast": { "ack": false, "self": false },
                "presence": { "key": "" },
                "postgres_changes": [{
                    "event": "UPDATE",
                    "schema": "public",
                    "table": table,
                    "filter": filter,
                }],
            }),
            ChannelKind::Broadcast => json!({
                "broadcast": { "ack": false, "self": true },
                "presence": { "key": "" },
                "postgres_changes": [],
            }),
        }
    }
}

pub fn topic_name(channel: &str) -> String {
    format!("realtime:{}", channel)
}

pub fn join_frame(spec: &ChannelSpec, access_token: &str, reference: u64) -> Frame {
    Frame {
        topic: spec.topic.clone(),
        event: EVENT_JOIN.to_string(),
        payload: json!({
            "config": spec.join_config(),
            "access_token": access_token,
        }),
        reference: Some(reference.to_string()),
    }
}

pub fn leave_frame(topic: &str, reference: u64) -> Frame {
    Frame {
        topic: topic.to_string(),
        event: EVENT_LEAVE.to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
    }
}

pub fn heartbeat_frame(reference: u64) -> Frame {
    Frame {
        topic: PHOENIX_TOPIC.to_string(),
        event: EVENT_HEARTBEAT.to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
    }
}

/// Outgoing broadcast of `payload` under `event` on a joined topic
pub fn broadcast_frame<P: Serialize>(topic: &str, event: &str, payload: &P, reference: u64) -> Frame {
    Frame {
        topic: topic.to_string(),
        event: EVENT_BROADCAST.to_string(),
        payload: json!({
            "type": "broadcast",
            "event": event,
            "payload": payload,
        }),
        reference: Some(reference.to_string()),
    }
}

/// Decoded meaning of an incoming frame
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// A row changed; `record` is the full new row
    RowChange { topic: String, table: String, kind: String, record: Value },
    /// A broadcast message on a joined topic
    Broadcast { topic: String, event: String, payload: Value },
    /// Server reply to a join/leave/heartbeat
    Reply { topic: String, ok: bool, reference: Option<String> },
    /// The server closed or errored a channel
    ChannelClosed { topic: String, reason: String },
    /// Anything else (presence, system notices)
    Ignored { topic: String, event: String },
}

pub fn classify(frame: Frame) -> Incoming {
    let Frame { topic, event, payload, reference } = frame;
    match event.as_str() {
        EVENT_POSTGRES_CHANGES => {
            let data = payload.get("data").cloned().unwrap_or(Value::Null);
            Incoming::RowChange {
                topic,
                table: string_field(&data, "table"),
                kind: string_field(&data, "type"),
                record: data.get("record").cloned().unwrap_or(Value::Null),
            }
        }
        EVENT_BROADCAST => Incoming::Broadcast {
            topic,
            event: string_field(&payload, "event"),
            payload: payload.get("payload").cloned().unwrap_or(Value::Null),
        },
        EVENT_REPLY => Incoming::Reply {
            topic,
            ok: payload.get("status").and_then(Value::as_str) == Some("ok"),
            reference,
        },
        EVENT_ERROR | EVENT_CLOSE => Incoming::ChannelClosed {
            topic,
            reason: event,
        },
        _ => Incoming::Ignored { topic, event },
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Decode a row or broadcast payload into its typed form
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Timer, TimerStatus};

    #[test]
    fn test_row_update_join_frame() {
        let spec = ChannelSpec::timer_updates(4);
        let frame = join_frame(&spec, "anon", 1);
        assert_eq!(frame.topic, "realtime:timers_changes_4");
        assert_eq!(frame.event, "phx_join");
        assert_eq!(frame.reference.as_deref(), Some("1"));
        let change = &frame.payload["config"]["postgres_changes"][0];
        assert_eq!(change["event"], "UPDATE");
        assert_eq!(change["table"], "timers");
        assert_eq!(change["filter"], "boss_id=eq.4");
        assert_eq!(frame.payload["access_token"], "anon");
    }

    #[test]
    fn test_broadcast_join_echoes_to_self() {
        let frame = join_frame(&ChannelSpec::broadcast("current_audio"), "anon", 2);
        assert_eq!(frame.topic, "realtime:current_audio");
        assert_eq!(frame.payload["config"]["broadcast"]["self"], true);
    }

    #[test]
    fn test_broadcast_frame_shape() {
        let frame = broadcast_frame(
            "realtime:current_audio",
            "new-audio",
            &json!({ "message": "/audio/track3.mp3" }),
            9,
        );
        let text = frame.to_text();
        let parsed = Frame::parse(&text).unwrap();
        assert_eq!(parsed.event, "broadcast");
        assert_eq!(parsed.payload["event"], "new-audio");
        assert_eq!(parsed.payload["payload"]["message"], "/audio/track3.mp3");
    }

    #[test]
    fn test_classify_postgres_change() {
        let text = r#"{"event":"postgres_changes","payload":{"data":{"columns":[],"commit_timestamp":"2025-01-01T00:00:00Z","errors":null,"old_record":{"boss_id":4},"record":{"boss_id":4,"elapsed_time":90,"status":"paused"},"schema":"public","table":"timers","type":"UPDATE"},"ids":[17]},"ref":null,"topic":"realtime:timers_changes_4"}"#;
        let incoming = classify(Frame::parse(text).unwrap());
        let Incoming::RowChange { topic, table, kind, record } = incoming else {
            panic!("expected a row change");
        };
        assert_eq!(topic, "realtime:timers_changes_4");
        assert_eq!(table, "timers");
        assert_eq!(kind, "UPDATE");
        let timer: Timer = decode(record).unwrap();
        assert_eq!(timer.elapsed_time, 90);
        assert_eq!(timer.status, TimerStatus::Paused);
    }

    #[test]
    fn test_classify_broadcast_and_reply() {
        let text = r#"{"event":"broadcast","payload":{"event":"new-audio","payload":{"message":"/audio/gimn.mp3"},"type":"broadcast"},"ref":null,"topic":"realtime:current_audio"}"#;
        match classify(Frame::parse(text).unwrap()) {
            Incoming::Broadcast { event, payload, .. } => {
                assert_eq!(event, "new-audio");
                assert_eq!(payload["message"], "/audio/gimn.mp3");
            }
            other => panic!("unexpected {:?}", other),
        }

        let reply = r#"{"event":"phx_reply","payload":{"response":{},"status":"ok"},"ref":"1","topic":"realtime:current_audio"}"#;
        assert_eq!(
            classify(Frame::parse(reply).unwrap()),
            Incoming::Reply {
                topic: "realtime:current_audio".to_string(),
                ok: true,
                reference: Some("1".to_string()),
            }
        );
    }

    #[test]
    fn test_heartbeat_and_leave() {
        let heartbeat = heartbeat_frame(5);
        assert_eq!(heartbeat.topic, "phoenix");
        assert_eq!(heartbeat.event, "heartbeat");
        let leave = leave_frame("realtime:timers_changes_1", 6);
        assert_eq!(leave.event, "phx_leave");
        assert!(matches!(
            classify(Frame { event: "phx_close".into(), ..leave }),
            Incoming::ChannelClosed { .. }
        ));
    }
}
