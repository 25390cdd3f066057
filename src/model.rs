//! Chat data model — registered participants and the append-only message log.
//!
//! `Participant.last_status` is Unix epoch milliseconds, refreshed by the
//! heartbeat endpoint and compared against a cutoff by the sweeper. Message
//! `time` is the wall-clock `HH:MM:SS` string the wire format uses;
//! chronological order comes from the store's row ids, not from `time`.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

/// Recipient name for public notices (join/leave and room-wide messages).
pub const EVERYONE: &str = "Todos";

/// A named chat session holder with a liveness timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(rename = "lastStatus")]
    pub last_status: i64,
}

/// Message kinds. `Status` is reserved for synthetic join/leave notices;
/// clients may only post `Message` and `PrivateMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::PrivateMessage => "private_message",
            MessageKind::Status => "status",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "message" => Some(MessageKind::Message),
            "private_message" => Some(MessageKind::PrivateMessage),
            "status" => Some(MessageKind::Status),
            _ => None,
        }
    }
}

/// A chat message. Immutable once stored; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub time: String,
}

impl Message {
    /// Synthetic join notice appended on registration.
    pub fn joined(name: &str) -> Self {
        Self::notice(name, "entra na sala...")
    }

    /// Synthetic leave notice appended by the sweeper.
    pub fn left(name: &str) -> Self {
        Self::notice(name, "sai da sala...")
    }

    fn notice(name: &str, text: &str) -> Self {
        Self {
            from: name.to_string(),
            to: EVERYONE.to_string(),
            text: text.to_string(),
            kind: MessageKind::Status,
            time: wall_clock_time(),
        }
    }
}

/// Current time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current local wall-clock time in the `HH:MM:SS` wire format.
pub fn wall_clock_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
