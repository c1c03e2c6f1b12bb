//! Dispatch abstraction for backend commands.

use std::io;

use crate::BackendCommand;

/// Trait for sending commands to the backend process.
///
/// Implementations can be remote (network transport) or in-process
/// (recording or scripted backends used by tests and tools). Sending never
/// waits for the backend to act on the command.
pub trait Backend {
    fn send(&mut self, command: BackendCommand) -> io::Result<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn send(&mut self, command: BackendCommand) -> io::Result<()> {
        (**self).send(command)
    }
}
