//! Inbound event model
//!
//! Types for the webhook payloads delivered by the messaging platform. The
//! platform attaches per-event context (source, reply token, timestamp, ...)
//! that Courier never interprets; those fields are captured in flattened maps
//! and round-trip to the worker untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event kinds delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Message,
    Follow,
    Unfollow,
    Join,
    Leave,
    MemberJoined,
    MemberLeft,
    Postback,
    Beacon,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::MemberJoined => "memberJoined",
            Self::MemberLeft => "memberLeft",
            Self::Postback => "postback",
            Self::Beacon => "beacon",
        }
    }
}

/// Message subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    Audio,
    File,
    Location,
    Sticker,
}

impl MessageType {
    /// Every message subtype the platform can deliver. Routing tables are
    /// built over this set so lookups are total.
    pub const ALL: [MessageType; 7] = [
        Self::Text,
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::File,
        Self::Location,
        Self::Sticker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
            Self::Location => "location",
            Self::Sticker => "sticker",
        }
    }
}

/// One platform message. Only `message_type` is inspected; the remaining
/// fields are an opaque blob that serializes back to the original object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

/// One webhook event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Present only for `EventKind::Message`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessagePayload>,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl InboundEvent {
    /// The message payload, when this event actually is a message.
    pub fn message_payload(&self) -> Option<&MessagePayload> {
        match self.kind {
            EventKind::Message => self.message.as_ref(),
            _ => None,
        }
    }
}

/// The inbound webhook payload: an ordered sequence of events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookBatch {
    pub events: Vec<InboundEvent>,
    /// Envelope fields the platform sends alongside `events` (e.g. the bot
    /// destination id)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
