//! Language-to-message translation
//!
//! Compiles the control configuration into the two process-lifetime
//! lookup tables the voice dispatch path runs on: a phrase -> (channel,
//! message) command table, and a channel -> publisher handle table.
//! Both are built once at construction and read-only afterwards.

use crate::bus::{Message, MessageBus, MessageType, Publisher};
use crate::config::ControlConfig;
use crate::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Phrase -> (channel, constructed message).
pub type CommandTable = HashMap<String, (String, Message)>;

/// Channel -> publisher handle.
pub type PublisherTable = HashMap<String, Publisher>;

/// Turn one channel's phrase mapping into command-table entries.
///
/// An unrecognized type name yields an empty table, never an error, so
/// callers can merge results unconditionally; a raw value whose shape
/// does not match a recognized type is a fatal configuration error.
pub fn parse_command_mapping(
    channel: &str,
    type_name: &str,
    commands: &Map<String, Value>,
) -> Result<CommandTable> {
    parse_resolved_mapping(channel, MessageType::resolve(type_name), commands)
}

fn parse_resolved_mapping(
    channel: &str,
    msg_type: MessageType,
    commands: &Map<String, Value>,
) -> Result<CommandTable> {
    let mut table = CommandTable::new();
    if msg_type.is_unknown() {
        return Ok(table);
    }

    for (phrase, raw) in commands {
        let message = Message::from_raw(msg_type, channel, raw)?;
        table.insert(phrase.clone(), (channel.to_owned(), message));
    }
    Ok(table)
}

/// Obtain the publisher-table contribution for one channel: a single
/// entry keyed by the channel, or nothing if the type name does not
/// resolve.
pub fn get_publisher(bus: &MessageBus, channel: &str, type_name: &str) -> PublisherTable {
    make_publisher(bus, channel, MessageType::resolve(type_name))
}

fn make_publisher(bus: &MessageBus, channel: &str, msg_type: MessageType) -> PublisherTable {
    let mut table = PublisherTable::new();
    if msg_type.is_unknown() {
        return table;
    }

    table.insert(channel.to_owned(), bus.advertise(channel, msg_type));
    table
}

/// Translates recognized phrases into typed messages on named channels.
///
/// Construction walks every channel descriptor, resolves its type name
/// exactly once, and builds both tables from that single resolution, so
/// every phrase in the command table has a matching publisher.
pub struct Translator {
    command_table: CommandTable,
    publisher_table: PublisherTable,
}

impl Translator {
    /// Compile the configuration snapshot into the two lookup tables.
    ///
    /// Channels with unrecognized types contribute nothing to either
    /// table; channels missing from the nested dictionary contribute an
    /// empty command set. On phrase or channel collision the
    /// later-processed descriptor wins.
    pub fn new(config: &ControlConfig, bus: &MessageBus) -> Result<Self> {
        let mut command_table = CommandTable::new();
        let mut publisher_table = PublisherTable::new();

        for descriptor in config.descriptors() {
            let channel = descriptor.channel.as_str();
            let msg_type = MessageType::resolve(&descriptor.type_name);
            if msg_type.is_unknown() {
                warn!(
                    channel,
                    type_name = %descriptor.type_name,
                    "unrecognized message type, skipping channel"
                );
                continue;
            }

            let commands = config.commands_for(channel);
            if commands.is_empty() {
                debug!(channel, "no commands configured");
            }

            for (phrase, entry) in parse_resolved_mapping(channel, msg_type, &commands)? {
                if let Some((previous, _)) = command_table.insert(phrase.clone(), entry) {
                    debug!(phrase = %phrase, previous = %previous, channel, "phrase overwritten");
                }
            }
            publisher_table.extend(make_publisher(bus, channel, msg_type));
        }

        info!(
            commands = command_table.len(),
            publishers = publisher_table.len(),
            "translator ready"
        );

        Ok(Self {
            command_table,
            publisher_table,
        })
    }

    pub fn command_table(&self) -> &CommandTable {
        &self.command_table
    }

    pub fn publisher_table(&self) -> &PublisherTable {
        &self.publisher_table
    }

    /// Look up the (channel, message) pair for a phrase.
    pub fn command(&self, phrase: &str) -> Option<&(String, Message)> {
        self.command_table.get(phrase)
    }

    /// Look up the publisher handle for a channel.
    pub fn publisher(&self, channel: &str) -> Option<&Publisher> {
        self.publisher_table.get(channel)
    }

    /// Dispatch one recognized phrase: resolve it to a (channel, message)
    /// pair and emit the message on that channel's publisher.
    ///
    /// Returns `Ok(true)` if a message was emitted, `Ok(false)` for a
    /// phrase with no mapping. Unknown phrases are expected during normal
    /// operation and only logged.
    pub fn handle_phrase(&self, phrase: &str) -> Result<bool> {
        let Some((channel, message)) = self.command(phrase) else {
            debug!(phrase, "no command mapped to phrase");
            return Ok(false);
        };

        match self.publisher(channel) {
            Some(publisher) => {
                info!(phrase, channel = %channel, "dispatching command");
                publisher.emit(message.clone())?;
                Ok(true)
            }
            None => {
                // Unreachable when both tables came from the same
                // resolution, but a lookup miss must not panic the node.
                warn!(channel = %channel, "no publisher for mapped channel");
                Ok(false)
            }
        }
    }
}
