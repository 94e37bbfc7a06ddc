//! Message types carried on the control bus
//!
//! The registry is a closed enum resolved once at startup; unrecognized
//! type names resolve to `Unknown` rather than erroring so that one
//! misconfigured channel never prevents the rest from coming up.

use crate::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The set of payload types a channel can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    Text,
    Int32,
    Float32,
    /// Sentinel for any type name absent from the registry.
    Unknown,
}

impl MessageType {
    /// Resolve a configured type-name string to a registry entry.
    ///
    /// Never fails: names not in the registry (including the literal
    /// "Unknown") resolve to `MessageType::Unknown`.
    pub fn resolve(type_name: &str) -> MessageType {
        match type_name {
            "String" => MessageType::Text,
            "Int32" => MessageType::Int32,
            "Float32" => MessageType::Float32,
            _ => MessageType::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, MessageType::Unknown)
    }

    /// Wire name of the type, as reported by publisher handles.
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::Text => "String",
            MessageType::Int32 => "Int32",
            MessageType::Float32 => "Float32",
            MessageType::Unknown => "Unknown",
        }
    }
}

/// A constructed payload ready to emit on a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    Text(String),
    Int32(i32),
    Float32(f32),
}

impl Message {
    /// Construct a typed payload from a raw configuration scalar.
    ///
    /// A value whose shape does not match the resolved type is a fatal
    /// configuration error; it is not defaulted or coerced. Numeric
    /// values are preserved exactly at the declared width.
    pub fn from_raw(msg_type: MessageType, channel: &str, raw: &Value) -> Result<Message> {
        match msg_type {
            MessageType::Text => match raw.as_str() {
                Some(s) => Ok(Message::Text(s.to_owned())),
                None => Err(mismatch(channel, "String", raw)),
            },
            MessageType::Int32 => match raw.as_i64() {
                Some(n) => i32::try_from(n)
                    .map(Message::Int32)
                    .map_err(|_| mismatch(channel, "Int32", raw)),
                None => Err(mismatch(channel, "Int32", raw)),
            },
            MessageType::Float32 => match raw.as_f64() {
                Some(f) => Ok(Message::Float32(f as f32)),
                None => Err(mismatch(channel, "Float32", raw)),
            },
            MessageType::Unknown => Err(ParleyError::TypeMismatch {
                channel: channel.to_owned(),
                detail: "cannot construct a message of unknown type".to_owned(),
            }),
        }
    }

    /// The registry entry this payload was constructed under.
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Text(_) => MessageType::Text,
            Message::Int32(_) => MessageType::Int32,
            Message::Float32(_) => MessageType::Float32,
        }
    }
}

fn mismatch(channel: &str, expected: &str, raw: &Value) -> ParleyError {
    ParleyError::TypeMismatch {
        channel: channel.to_owned(),
        detail: format!("expected {} value, got {}", expected, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(MessageType::resolve("String"), MessageType::Text);
        assert_eq!(MessageType::resolve("Int32"), MessageType::Int32);
        assert_eq!(MessageType::resolve("Float32"), MessageType::Float32);
    }

    #[test]
    fn test_resolve_unknown_names() {
        assert_eq!(MessageType::resolve("Unknown"), MessageType::Unknown);
        assert_eq!(MessageType::resolve("NotAType"), MessageType::Unknown);
        assert_eq!(MessageType::resolve(""), MessageType::Unknown);
    }

    #[test]
    fn test_from_raw_text() {
        let msg = Message::from_raw(MessageType::Text, "t", &json!("output")).unwrap();
        assert_eq!(msg, Message::Text("output".to_string()));
    }

    #[test]
    fn test_from_raw_int_exact() {
        let msg = Message::from_raw(MessageType::Int32, "t", &json!(42)).unwrap();
        assert_eq!(msg, Message::Int32(42));

        let msg = Message::from_raw(MessageType::Int32, "t", &json!(i32::MIN)).unwrap();
        assert_eq!(msg, Message::Int32(i32::MIN));
    }

    #[test]
    fn test_from_raw_int_out_of_width() {
        let result = Message::from_raw(MessageType::Int32, "t", &json!(i64::from(i32::MAX) + 1));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_raw_float_bit_exact_at_width() {
        let msg = Message::from_raw(MessageType::Float32, "t", &json!(3.14159)).unwrap();
        assert_eq!(msg, Message::Float32(3.14159_f32));
    }

    #[test]
    fn test_from_raw_shape_mismatch_is_fatal() {
        let err = Message::from_raw(MessageType::Int32, "t", &json!("not a number"));
        assert!(err.is_err());
        assert!(!err.unwrap_err().is_recoverable());

        assert!(Message::from_raw(MessageType::Text, "t", &json!(1)).is_err());
    }

    #[test]
    fn test_from_raw_unknown_is_error() {
        assert!(Message::from_raw(MessageType::Unknown, "t", &json!("x")).is_err());
    }

    #[test]
    fn test_message_type_roundtrip() {
        assert_eq!(Message::Text("a".into()).message_type(), MessageType::Text);
        assert_eq!(Message::Int32(1).message_type(), MessageType::Int32);
        assert_eq!(Message::Float32(1.0).message_type(), MessageType::Float32);
    }
}
