#![allow(dead_code)]
//! Harness for lpedit-net integration tests.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::thread;
use std::time::{Duration, Instant};

use lpedit_net::framing::{read_message, write_message};
use lpedit_net::protocol::{ClientId, ClientMessage, ServerMessage};
use lpedit_net::{BackendServer, RemoteBackend};
use lpedit_types::{BackendCommand, NamedEvent};

pub const TIMEOUT: Duration = Duration::from_secs(2);

pub fn bind() -> (BackendServer, String) {
    let server = BackendServer::bind("127.0.0.1:0").unwrap();
    let addr = server.local_addr().unwrap().to_string();
    (server, addr)
}

/// Drive the server until the expected client count is reached, or panic.
pub fn drive_until_clients(server: &mut BackendServer, expected: usize, timeout: Duration) {
    let start = Instant::now();
    while start.elapsed() < timeout {
        server.accept_connections();
        server.poll_commands();
        if server.client_count() >= expected {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!(
        "timed out waiting for {} clients (have {})",
        expected,
        server.client_count()
    );
}

/// Drive the server and return commands once at least `expected` arrived.
pub fn drive_and_collect_commands(
    server: &mut BackendServer,
    expected: usize,
    timeout: Duration,
) -> Vec<(ClientId, BackendCommand)> {
    let start = Instant::now();
    let mut all = Vec::new();
    while start.elapsed() < timeout {
        server.accept_connections();
        all.extend(server.poll_commands());
        if all.len() >= expected {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    all
}

/// Connect a [`RemoteBackend`] on a helper thread while this thread drives
/// the server through the handshake.
pub fn connect_remote(server: &mut BackendServer, addr: &str, name: &str) -> RemoteBackend {
    let expected = server.client_count() + 1;
    let addr = addr.to_string();
    let name = name.to_string();
    let handle = thread::spawn(move || RemoteBackend::connect(&addr, &name));
    drive_until_clients(server, expected, TIMEOUT);
    handle.join().unwrap().unwrap()
}

/// Poll the remote until `expected` events arrived.
pub fn poll_events(remote: &mut RemoteBackend, expected: usize, timeout: Duration) -> Vec<NamedEvent> {
    let start = Instant::now();
    let mut all = Vec::new();
    while start.elapsed() < timeout {
        all.extend(remote.poll_events());
        if all.len() >= expected {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    all
}

/// A raw TCP client for protocol-level tests.
///
/// Handshakes are split because the tests are single-threaded:
/// `send_hello`, then drive the server, then `recv` the Welcome.
pub struct RawClient {
    pub reader: BufReader<TcpStream>,
    pub writer: BufWriter<TcpStream>,
}

impl RawClient {
    pub fn connect(addr: &str) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(Some(Duration::from_secs(5)))?;
        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    pub fn send(&mut self, msg: &ClientMessage) -> std::io::Result<()> {
        write_message(&mut self.writer, msg)
    }

    pub fn recv(&mut self) -> std::io::Result<ServerMessage> {
        read_message(&mut self.reader)
    }

    pub fn send_hello(&mut self, name: &str) -> std::io::Result<()> {
        self.send(&ClientMessage::Hello {
            client_name: name.to_string(),
        })
    }
}
