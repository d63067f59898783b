//! Protocol message model and command dispatch types.
//!
//! On the wire every message is a JSON object with a `command` string.
//! [`Inbound`] lifts the commands this client understands into a sum
//! type; anything else lands in [`Inbound::Unknown`], so there are no panics on
//! unknown values.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value, json};

/// A decoded JSON object, keys kept in wire order.
pub type Message = Map<String, Value>;

// ── Command names ────────────────────────────────────────────────

pub const CMD_AUTH: &str = "auth";
pub const CMD_VALUE_CHANGE: &str = "valueChange";
pub const CMD_AUTH_FAILED: &str = "auth-failed";
pub const CMD_SESSION_COMPLETE: &str = "sessionComplete";

/// Build the outbound `{"command": "auth", "apiKey": ...}` message.
pub fn auth_message(api_key: &str) -> Message {
    let mut message = Message::new();
    message.insert("command".into(), json!(CMD_AUTH));
    message.insert("apiKey".into(), json!(api_key));
    message
}

/// The `command` field, if present and a string.
pub fn command_of(message: &Message) -> Option<&str> {
    message.get("command").and_then(Value::as_str)
}

// ── ValueChange ──────────────────────────────────────────────────

/// Body of a `valueChange` message. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueChange {
    /// Metric name as sent by the server; may be one we do not track.
    pub key: String,
    pub value: f64,
}

// ── Inbound ──────────────────────────────────────────────────────

/// Server → client commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A live metric changed.
    ValueChange(ValueChange),
    /// A `valueChange` whose `key` / `value` were missing or mistyped.
    MalformedValueChange,
    /// The server rejected our API key.
    AuthFailed,
    /// The server finished the recording session.
    SessionComplete,
    /// Any other command, or no string `command` at all.
    Unknown(Option<String>),
}

impl Inbound {
    /// Classify a decoded message by its `command` field.
    pub fn from_message(message: &Message) -> Self {
        match command_of(message) {
            Some(CMD_VALUE_CHANGE) => {
                let body = Value::Object(message.clone());
                match ValueChange::deserialize(body) {
                    Ok(change) => Self::ValueChange(change),
                    Err(_) => Self::MalformedValueChange,
                }
            }
            Some(CMD_AUTH_FAILED) => Self::AuthFailed,
            Some(CMD_SESSION_COMPLETE) => Self::SessionComplete,
            other => Self::Unknown(other.map(str::to_owned)),
        }
    }
}

impl fmt::Display for Inbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueChange(change) => {
                write!(f, "{CMD_VALUE_CHANGE}({}={})", change.key, change.value)
            }
            Self::MalformedValueChange => write!(f, "{CMD_VALUE_CHANGE}(malformed)"),
            Self::AuthFailed => write!(f, "{CMD_AUTH_FAILED}"),
            Self::SessionComplete => write!(f, "{CMD_SESSION_COMPLETE}"),
            Self::Unknown(Some(cmd)) => write!(f, "unknown({cmd})"),
            Self::Unknown(None) => write!(f, "unknown(<no command>)"),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(value: Value) -> Message {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn auth_message_shape_and_order() {
        let message = auth_message("secret");
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"command":"auth","apiKey":"secret"}"#
        );
    }

    #[test]
    fn value_change_parsed() {
        let m = msg(json!({"command": "valueChange", "key": "focus", "value": 0.77}));
        assert_eq!(
            Inbound::from_message(&m),
            Inbound::ValueChange(ValueChange {
                key: "focus".into(),
                value: 0.77
            })
        );
    }

    #[test]
    fn value_change_accepts_integer_and_extra_fields() {
        let m = msg(json!({"command": "valueChange", "key": "heart_rate", "value": 72, "ts": 1}));
        match Inbound::from_message(&m) {
            Inbound::ValueChange(change) => assert_eq!(change.value, 72.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn value_change_missing_value_is_malformed() {
        let m = msg(json!({"command": "valueChange", "key": "focus"}));
        assert_eq!(Inbound::from_message(&m), Inbound::MalformedValueChange);

        let m = msg(json!({"command": "valueChange", "key": "focus", "value": "high"}));
        assert_eq!(Inbound::from_message(&m), Inbound::MalformedValueChange);
    }

    #[test]
    fn control_commands_ignore_extra_fields() {
        let m = msg(json!({"command": "auth-failed", "reason": "bad key"}));
        assert_eq!(Inbound::from_message(&m), Inbound::AuthFailed);

        let m = msg(json!({"command": "sessionComplete", "duration": 600}));
        assert_eq!(Inbound::from_message(&m), Inbound::SessionComplete);
    }

    #[test]
    fn unknown_commands_fall_through() {
        let m = msg(json!({"command": "something-else"}));
        assert_eq!(
            Inbound::from_message(&m),
            Inbound::Unknown(Some("something-else".into()))
        );

        let m = msg(json!({"key": "focus"}));
        assert_eq!(Inbound::from_message(&m), Inbound::Unknown(None));

        let m = msg(json!({"command": 7}));
        assert_eq!(Inbound::from_message(&m), Inbound::Unknown(None));
    }

    #[test]
    fn display_names_command() {
        assert_eq!(Inbound::AuthFailed.to_string(), "auth-failed");
        assert_eq!(
            Inbound::Unknown(Some("x".into())).to_string(),
            "unknown(x)"
        );
    }
}
