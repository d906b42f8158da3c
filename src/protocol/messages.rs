//! Application-level message schema.
//!
//! Every text frame carries one JSON object. Objects whose `type` matches a
//! control variant below drive room membership; any other object is an
//! opaque relay payload and is forwarded verbatim, extra fields included.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The control message types the relay recognizes.
pub const CONTROL_TYPES: &[&str] = &["join", "room", "subscribe", "leave", "ping"];

/// Control messages sent by clients to manage room membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlMessage {
    /// Join the named room, leaving the current one if any.
    Join { room: String },
    /// Alias for `join` used by older clients.
    Room { room: String },
    /// Topic-style join. Only the first topic is honored; additional topics
    /// are silently ignored (documented behavior of the known client, which
    /// only ever subscribes to a single room).
    Subscribe { topics: Vec<String> },
    /// Leave the current room.
    Leave,
    /// Application-level heartbeat, distinct from WS-protocol ping frames.
    Ping,
}

/// Replies the relay itself originates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelayReply {
    /// Answer to an application-level ping.
    Pong,
}

/// Outcome of classifying one inbound JSON text payload.
#[derive(Debug)]
pub enum InboundMessage {
    /// A well-formed control message.
    Control(ControlMessage),
    /// A recognized control `type` with missing or ill-typed fields. Dropped
    /// rather than relayed, so a typo'd `join` never leaks into a room.
    InvalidControl { error: String },
    /// Anything else: relay verbatim to the sender's room.
    Relay,
}

/// Classify a parsed JSON value by its `type` discriminator.
#[must_use]
pub fn classify(value: &Value) -> InboundMessage {
    let is_control = value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| CONTROL_TYPES.contains(&t));

    if !is_control {
        return InboundMessage::Relay;
    }

    match serde_json::from_value::<ControlMessage>(value.clone()) {
        Ok(control) => InboundMessage::Control(control),
        Err(err) => InboundMessage::InvalidControl {
            error: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_and_room_parse_with_room_name() {
        match classify(&json!({"type": "join", "room": "doc-1"})) {
            InboundMessage::Control(ControlMessage::Join { room }) => assert_eq!(room, "doc-1"),
            other => panic!("expected join control, got {other:?}"),
        }
        match classify(&json!({"type": "room", "room": "doc-2"})) {
            InboundMessage::Control(ControlMessage::Room { room }) => assert_eq!(room, "doc-2"),
            other => panic!("expected room control, got {other:?}"),
        }
    }

    #[test]
    fn subscribe_carries_all_topics() {
        match classify(&json!({"type": "subscribe", "topics": ["x", "y"]})) {
            InboundMessage::Control(ControlMessage::Subscribe { topics }) => {
                assert_eq!(topics, vec!["x", "y"]);
            }
            other => panic!("expected subscribe control, got {other:?}"),
        }
    }

    #[test]
    fn control_type_with_bad_fields_is_invalid_not_relay() {
        assert!(matches!(
            classify(&json!({"type": "join"})),
            InboundMessage::InvalidControl { .. }
        ));
        assert!(matches!(
            classify(&json!({"type": "subscribe", "topics": "x"})),
            InboundMessage::InvalidControl { .. }
        ));
    }

    #[test]
    fn unknown_type_is_relay_payload() {
        assert!(matches!(
            classify(&json!({"type": "awareness", "clients": [1, 2]})),
            InboundMessage::Relay
        ));
        assert!(matches!(
            classify(&json!({"payload": "no type at all"})),
            InboundMessage::Relay
        ));
    }

    #[test]
    fn pong_reply_serializes_to_expected_shape() {
        let text = serde_json::to_string(&RelayReply::Pong).unwrap();
        assert_eq!(text, r#"{"type":"pong"}"#);
    }
}
