//! Wire protocol between the editor and the backend.

use serde::{Deserialize, Serialize};

use lpedit_types::{BackendCommand, NamedEvent};

/// Identifier the backend assigns to each connected editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u64);

impl ClientId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// An attached device the backend can open a session on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Identifier passed back in `BackendCommand::Start`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

/// Messages sent from editor to backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Initial handshake.
    Hello { client_name: String },
    /// Fire-and-forget request for the device.
    Command(BackendCommand),
    /// Clean disconnection.
    Goodbye,
    /// Keepalive ping.
    Ping,
}

/// Messages sent from backend to editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Handshake accepted.
    Welcome { client_id: ClientId },
    /// A named event from the device session.
    Event(NamedEvent),
    /// Answer to `BackendCommand::ListDevices`.
    Devices { devices: Vec<DeviceInfo> },
    /// Response to Ping.
    Pong,
    /// Backend is shutting down.
    Shutdown,
    /// Error message.
    Error { message: String },
}
