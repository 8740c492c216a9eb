use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents different types of messages in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Human,
    AI,
    System,
    Tool,
}

impl MessageType {
    /// Speaker label used when a conversation is flattened into plain text.
    pub fn label(&self) -> &'static str {
        match self {
            MessageType::Human => "Human",
            MessageType::AI => "Assistant",
            MessageType::System => "System",
            MessageType::Tool => "Observation",
        }
    }
}

/// A single chat turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub message_type: MessageType,
    pub content: String,
}

impl Message {
    pub fn new(message_type: MessageType, content: impl Into<String>) -> Self {
        Self {
            message_type,
            content: content.into(),
        }
    }

    /// Creates a new human message
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(MessageType::Human, content)
    }

    /// Creates a new AI message
    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(MessageType::AI, content)
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageType::System, content)
    }

    /// Creates a new tool message
    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(MessageType::Tool, content)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message_type.label(), self.content)
    }
}
