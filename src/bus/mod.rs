//! Control-bus collaborator surface
//!
//! Typed message payloads, the type-name registry, and publisher handles
//! bound to named channels of an in-process message bus.

pub mod message;
pub mod publisher;

pub use message::{Message, MessageType};
pub use publisher::{Emission, MessageBus, Publisher};
