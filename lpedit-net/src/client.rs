//! Editor-side connection to a backend.
//!
//! Commands are written straight to the socket. Pushed events are read on a
//! background thread and queued until [`RemoteBackend::poll_events`] drains
//! them, so the caller's loop decides when state changes.

use std::io::{self, BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{error, info, warn};

use lpedit_types::{Backend, BackendCommand, NamedEvent};

use crate::framing::{read_message, write_message};
use crate::protocol::{ClientId, ClientMessage, DeviceInfo, ServerMessage};

/// Messages received from the backend via background thread.
enum BackendUpdate {
    Event(NamedEvent),
    Devices(Vec<DeviceInfo>),
    Error(String),
    Shutdown,
}

pub struct RemoteBackend {
    writer: BufWriter<TcpStream>,
    update_rx: Receiver<BackendUpdate>,
    client_id: ClientId,
    devices: Vec<DeviceInfo>,
    devices_fresh: bool,
    last_error: Option<String>,
    server_shutdown: bool,
}

impl RemoteBackend {
    /// Connect to a backend and complete the handshake.
    pub fn connect(addr: &str, client_name: &str) -> io::Result<Self> {
        info!(target: "net", "connecting to backend at {}", addr);

        let stream = TcpStream::connect(addr)?;
        let read_stream = stream.try_clone()?;

        let mut writer = BufWriter::new(stream);
        let mut reader = BufReader::new(read_stream.try_clone()?);

        write_message(
            &mut writer,
            &ClientMessage::Hello {
                client_name: client_name.to_string(),
            },
        )?;

        let client_id = match read_message::<_, ServerMessage>(&mut reader)? {
            ServerMessage::Welcome { client_id } => client_id,
            ServerMessage::Error { message } => {
                return Err(io::Error::new(io::ErrorKind::ConnectionRefused, message));
            }
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("expected Welcome, got {:?}", other),
                ));
            }
        };

        info!(target: "net", "connected as client {:?}", client_id);

        let (update_tx, update_rx) = mpsc::channel();
        thread::spawn(move || {
            backend_reader_thread(read_stream, update_tx);
        });

        Ok(Self {
            writer,
            update_rx,
            client_id,
            devices: Vec::new(),
            devices_fresh: false,
            last_error: None,
            server_shutdown: false,
        })
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Devices from the most recent `ListDevices` answer.
    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    /// The device list, once per answer received.
    pub fn take_devices(&mut self) -> Option<Vec<DeviceInfo>> {
        if !self.devices_fresh {
            return None;
        }
        self.devices_fresh = false;
        Some(self.devices.clone())
    }

    /// True once the backend announced shutdown or the connection dropped.
    pub fn server_shutdown(&self) -> bool {
        self.server_shutdown
    }

    /// Get and clear the last error the backend reported.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    pub fn ping(&mut self) -> io::Result<()> {
        write_message(&mut self.writer, &ClientMessage::Ping)
    }

    /// Drain everything received since the last poll. Device lists and
    /// errors are absorbed here; session events are returned in arrival order.
    pub fn poll_events(&mut self) -> Vec<NamedEvent> {
        let mut events = Vec::new();

        loop {
            match self.update_rx.try_recv() {
                Ok(BackendUpdate::Event(event)) => events.push(event),
                Ok(BackendUpdate::Devices(devices)) => {
                    info!(target: "net", "backend reports {} device(s)", devices.len());
                    self.devices = devices;
                    self.devices_fresh = true;
                }
                Ok(BackendUpdate::Error(message)) => {
                    warn!(target: "net", "backend error: {}", message);
                    self.last_error = Some(message);
                }
                Ok(BackendUpdate::Shutdown) => {
                    info!(target: "net", "backend shutdown received");
                    self.server_shutdown = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.server_shutdown {
                        warn!(target: "net", "backend connection lost");
                    }
                    self.server_shutdown = true;
                    break;
                }
            }
        }

        events
    }

    /// Send goodbye and disconnect.
    pub fn disconnect(mut self) -> io::Result<()> {
        write_message(&mut self.writer, &ClientMessage::Goodbye)
    }
}

impl Backend for RemoteBackend {
    fn send(&mut self, command: BackendCommand) -> io::Result<()> {
        if self.server_shutdown {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "backend is gone",
            ));
        }
        write_message(&mut self.writer, &ClientMessage::Command(command))
    }
}

fn backend_reader_thread(stream: TcpStream, update_tx: mpsc::Sender<BackendUpdate>) {
    let mut reader = BufReader::new(stream);

    loop {
        match read_message::<_, ServerMessage>(&mut reader) {
            Ok(msg) => {
                let update = match msg {
                    ServerMessage::Event(event) => BackendUpdate::Event(event),
                    ServerMessage::Devices { devices } => BackendUpdate::Devices(devices),
                    ServerMessage::Error { message } => BackendUpdate::Error(message),
                    ServerMessage::Shutdown => {
                        let _ = update_tx.send(BackendUpdate::Shutdown);
                        break;
                    }
                    ServerMessage::Pong | ServerMessage::Welcome { .. } => continue,
                };

                if update_tx.send(update).is_err() {
                    break;
                }
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::UnexpectedEof {
                    error!(target: "net", "backend read error: {}", e);
                }
                let _ = update_tx.send(BackendUpdate::Shutdown);
                break;
            }
        }
    }

    info!(target: "net", "backend reader thread exiting");
}
