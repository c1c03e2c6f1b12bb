//! In-process backend used by tests and offline tools.

use std::io;

use lpedit_types::{Backend, BackendCommand};

/// Backend that records every command instead of sending it anywhere.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub sent: Vec<BackendCommand>,
    /// When set, every send fails with this error kind.
    pub failure: Option<io::ErrorKind>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose sends always fail, as if the connection dropped.
    pub fn disconnected() -> Self {
        Self {
            sent: Vec::new(),
            failure: Some(io::ErrorKind::NotConnected),
        }
    }

    pub fn take(&mut self) -> Vec<BackendCommand> {
        std::mem::take(&mut self.sent)
    }
}

impl Backend for RecordingBackend {
    fn send(&mut self, command: BackendCommand) -> io::Result<()> {
        if let Some(kind) = self.failure {
            return Err(io::Error::new(kind, format!("cannot send {}", command.name())));
        }
        self.sent.push(command);
        Ok(())
    }
}
