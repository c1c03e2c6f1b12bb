//! Transport between the editor and the backend process that owns the device.
//!
//! The backend side runs a [`BackendServer`]; the editor connects with a
//! [`RemoteBackend`], which sends commands and collects pushed events on a
//! background thread until the caller polls them.

pub mod client;
pub mod framing;
pub mod protocol;
pub mod server;

pub use client::RemoteBackend;
pub use protocol::{ClientId, ClientMessage, DeviceInfo, ServerMessage};
pub use server::BackendServer;
