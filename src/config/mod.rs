//! Control configuration
//!
//! A configuration document declares the set of channels under a `topics`
//! list (one single-entry map of channel name to type name each), and the
//! command phrases for every channel as a nested dictionary whose keys
//! mirror the slash-delimited channel path.

use crate::{ParleyError, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// One declared channel: a slash-delimited name plus a type-name string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDescriptor {
    pub channel: String,
    pub type_name: String,
}

/// Parsed configuration snapshot the translator is built from.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Declared channels, in document order.
    descriptors: Vec<ChannelDescriptor>,

    /// Nested command dictionary, keyed by channel path segments.
    tree: Value,
}

impl ControlConfig {
    /// Parse a configuration document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| ParleyError::ConfigError(format!("Invalid JSON: {}", e)))?;
        Self::from_value(root)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Build a configuration from an already-parsed tree.
    ///
    /// The tree must be an object with a `topics` list of single-entry
    /// maps; everything else in the tree is the nested command
    /// dictionary. Unknown type names and channels with no commands are
    /// valid here; they are handled downstream.
    pub fn from_value(root: Value) -> Result<Self> {
        let obj = root
            .as_object()
            .ok_or_else(|| ParleyError::ConfigError("Top level must be an object".into()))?;

        let no_topics = Vec::new();
        let topics = match obj.get("topics") {
            Some(v) => v
                .as_array()
                .ok_or_else(|| ParleyError::ConfigError("'topics' must be a list".into()))?,
            None => &no_topics,
        };

        let mut descriptors = Vec::with_capacity(topics.len());
        for entry in topics {
            let (channel, type_name) = entry
                .as_object()
                .and_then(|m| if m.len() == 1 { m.iter().next() } else { None })
                .ok_or_else(|| {
                    ParleyError::ConfigError(
                        "Each 'topics' entry must be a single-entry map of channel to type".into(),
                    )
                })?;
            let type_name = type_name.as_str().ok_or_else(|| {
                ParleyError::ConfigError(format!("Type name for '{}' must be a string", channel))
            })?;
            descriptors.push(ChannelDescriptor {
                channel: channel.clone(),
                type_name: type_name.to_owned(),
            });
        }

        Ok(Self {
            descriptors,
            tree: root,
        })
    }

    pub fn descriptors(&self) -> &[ChannelDescriptor] {
        &self.descriptors
    }

    /// Locate the command mapping for a channel by walking its
    /// slash-delimited path through the nested dictionary.
    ///
    /// A missing segment (or a non-object leaf) is a soft miss: the
    /// channel simply has no commands. Never an error.
    pub fn commands_for(&self, channel: &str) -> Map<String, Value> {
        let mut node = &self.tree;
        for segment in channel.split('/') {
            match node.get(segment) {
                Some(child) => node = child,
                None => return Map::new(),
            }
        }
        node.as_object().cloned().unwrap_or_default()
    }
}
