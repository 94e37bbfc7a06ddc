//! Publisher handles and the in-process message bus
//!
//! A `Publisher` is a long-lived handle bound to exactly one channel and
//! one message type. Creating one registers the (channel, type) pair with
//! the bus; emissions flow over a crossbeam channel to whatever sink owns
//! the receiving end.

use crate::bus::message::{Message, MessageType};
use crate::{ParleyError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// One message delivered to the bus sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub channel: String,
    pub message: Message,
}

/// A (channel, type) pair registered with the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub channel: String,
    pub msg_type: MessageType,
}

/// Handle for emitting messages on one channel.
///
/// Bound at creation to a channel name and message type; owned for the
/// process lifetime and never recreated per message. Emitting from
/// concurrent readers is safe.
pub struct Publisher {
    channel: String,
    msg_type: MessageType,
    tx: Sender<Emission>,
}

impl Publisher {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn msg_type(&self) -> MessageType {
        self.msg_type
    }

    /// Emit one message on this publisher's channel.
    ///
    /// Emitting a payload of a different type than the handle was bound
    /// to is a caller error.
    pub fn emit(&self, message: Message) -> Result<()> {
        if message.message_type() != self.msg_type {
            return Err(ParleyError::TypeMismatch {
                channel: self.channel.clone(),
                detail: format!(
                    "publisher bound to {} cannot emit {}",
                    self.msg_type.name(),
                    message.message_type().name()
                ),
            });
        }

        debug!(channel = %self.channel, "emitting message");
        self.tx
            .send(Emission {
                channel: self.channel.clone(),
                message,
            })
            .map_err(|e| ParleyError::BusError(format!("Failed to emit: {}", e)))
    }
}

/// In-process stand-in for the robot control bus transport.
///
/// Hands out publisher handles and records every registration; the
/// emission stream is exposed as a crossbeam receiver for the dispatch
/// glue (and tests) to drain.
pub struct MessageBus {
    tx: Sender<Emission>,
    rx: Receiver<Emission>,
    registrations: Arc<Mutex<Vec<Registration>>>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            registrations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a fresh publisher handle bound to (channel, type).
    ///
    /// Each call registers the pair with the bus; callers are expected
    /// to create at most one handle per channel.
    pub fn advertise(&self, channel: &str, msg_type: MessageType) -> Publisher {
        debug!(channel, msg_type = msg_type.name(), "advertising channel");
        self.registrations.lock().push(Registration {
            channel: channel.to_owned(),
            msg_type,
        });

        Publisher {
            channel: channel.to_owned(),
            msg_type,
            tx: self.tx.clone(),
        }
    }

    /// Receiver side of the emission stream.
    pub fn emissions(&self) -> Receiver<Emission> {
        self.rx.clone()
    }

    /// Snapshot of every (channel, type) pair registered so far.
    pub fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().clone()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advertise_records_registration() {
        let bus = MessageBus::new();
        let publisher = bus.advertise("cmd_vel", MessageType::Float32);

        assert_eq!(publisher.channel(), "cmd_vel");
        assert_eq!(publisher.msg_type(), MessageType::Float32);

        let regs = bus.registrations();
        assert_eq!(regs.len(), 1);
        assert_eq!(regs[0].channel, "cmd_vel");
        assert_eq!(regs[0].msg_type, MessageType::Float32);
    }

    #[test]
    fn test_emit_delivers_to_sink() {
        let bus = MessageBus::new();
        let publisher = bus.advertise("greeting", MessageType::Text);

        publisher.emit(Message::Text("hello".into())).unwrap();

        let emission = bus.emissions().try_recv().unwrap();
        assert_eq!(emission.channel, "greeting");
        assert_eq!(emission.message, Message::Text("hello".into()));
    }

    #[test]
    fn test_emit_wrong_type_is_error() {
        let bus = MessageBus::new();
        let publisher = bus.advertise("counter", MessageType::Int32);

        let result = publisher.emit(Message::Text("nope".into()));
        assert!(result.is_err());
        assert!(bus.emissions().try_recv().is_err());
    }
}
