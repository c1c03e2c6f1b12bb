//! Backend-side listener.
//!
//! Accepts editor connections, collects their commands, and pushes session
//! events to every editor that completed the handshake.

use std::collections::HashMap;
use std::io::{self, BufReader, BufWriter};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::{error, info, warn};

use lpedit_types::{BackendCommand, NamedEvent, PodEvent};

use crate::framing::{read_message, write_message};
use crate::protocol::{ClientId, ClientMessage, DeviceInfo, ServerMessage};

struct ClientConnection {
    name: String,
    writer: BufWriter<TcpStream>,
}

impl ClientConnection {
    fn send(&mut self, msg: &ServerMessage) -> io::Result<()> {
        write_message(&mut self.writer, msg)
    }
}

/// A connection awaiting its Hello.
struct PendingConnection {
    writer: BufWriter<TcpStream>,
}

pub struct BackendServer {
    listener: TcpListener,
    clients: HashMap<ClientId, ClientConnection>,
    pending: HashMap<ClientId, PendingConnection>,
    message_rx: Receiver<(ClientId, ClientMessage)>,
    message_tx: Sender<(ClientId, ClientMessage)>,
    next_client_id: u64,
}

impl BackendServer {
    pub fn bind(addr: &str) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;

        let (message_tx, message_rx) = mpsc::channel();

        info!(target: "net", "backend listening on {}", addr);

        Ok(Self {
            listener,
            clients: HashMap::new(),
            pending: HashMap::new(),
            message_rx,
            message_tx,
            next_client_id: 0,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept waiting TCP connections. They become clients after Hello.
    pub fn accept_connections(&mut self) {
        loop {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    let client_id = ClientId::new(self.next_client_id);
                    self.next_client_id += 1;

                    // Accepted sockets may inherit non-blocking mode.
                    if let Err(e) = stream.set_nonblocking(false) {
                        error!(target: "net", "failed to configure stream from {}: {}", addr, e);
                        continue;
                    }
                    let read_stream = match stream.try_clone() {
                        Ok(s) => s,
                        Err(e) => {
                            error!(target: "net", "failed to clone stream: {}", e);
                            continue;
                        }
                    };

                    let message_tx = self.message_tx.clone();
                    thread::spawn(move || {
                        client_reader_thread(client_id, read_stream, message_tx);
                    });

                    self.pending.insert(
                        client_id,
                        PendingConnection {
                            writer: BufWriter::new(stream),
                        },
                    );

                    info!(target: "net", "client {:?} connected from {}, awaiting Hello", client_id, addr);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    error!(target: "net", "accept error: {}", e);
                    break;
                }
            }
        }
    }

    /// Process queued client messages and return the commands received, in
    /// arrival order.
    pub fn poll_commands(&mut self) -> Vec<(ClientId, BackendCommand)> {
        let mut commands = Vec::new();

        while let Ok((client_id, msg)) = self.message_rx.try_recv() {
            match msg {
                ClientMessage::Hello { client_name } => self.complete_handshake(client_id, client_name),
                ClientMessage::Command(command) => {
                    if self.clients.contains_key(&client_id) {
                        commands.push((client_id, command));
                    } else {
                        warn!(target: "net", "dropping {} from {:?} before Hello", command.name(), client_id);
                    }
                }
                ClientMessage::Goodbye => {
                    self.pending.remove(&client_id);
                    if let Some(client) = self.clients.remove(&client_id) {
                        info!(target: "net", "client {:?} '{}' disconnected", client_id, client.name);
                    }
                }
                ClientMessage::Ping => {
                    if let Some(client) = self.clients.get_mut(&client_id) {
                        if let Err(e) = client.send(&ServerMessage::Pong) {
                            warn!(target: "net", "failed to send pong to {:?}: {}", client_id, e);
                        }
                    }
                }
            }
        }

        commands
    }

    fn complete_handshake(&mut self, client_id: ClientId, client_name: String) {
        let Some(mut pending) = self.pending.remove(&client_id) else {
            warn!(target: "net", "client {:?} sent Hello twice", client_id);
            return;
        };
        if let Err(e) = write_message(&mut pending.writer, &ServerMessage::Welcome { client_id }) {
            error!(target: "net", "failed to welcome {:?}: {}", client_id, e);
            return;
        }
        info!(target: "net", "client {:?} '{}' completed handshake", client_id, client_name);
        self.clients.insert(
            client_id,
            ClientConnection {
                name: client_name,
                writer: pending.writer,
            },
        );
    }

    /// Push a session event to every client.
    pub fn emit(&mut self, event: &PodEvent) {
        self.broadcast_event(event.encode());
    }

    /// Push an already-encoded event to every client.
    pub fn broadcast_event(&mut self, event: NamedEvent) {
        self.broadcast(&ServerMessage::Event(event));
    }

    /// Send one event to a single client, e.g. to replay state to a late joiner.
    pub fn send_event(&mut self, client_id: ClientId, event: NamedEvent) -> io::Result<()> {
        self.send_to(client_id, &ServerMessage::Event(event))
    }

    pub fn send_devices(&mut self, client_id: ClientId, devices: Vec<DeviceInfo>) -> io::Result<()> {
        self.send_to(client_id, &ServerMessage::Devices { devices })
    }

    pub fn send_error(&mut self, client_id: ClientId, message: &str) -> io::Result<()> {
        self.send_to(
            client_id,
            &ServerMessage::Error {
                message: message.to_string(),
            },
        )
    }

    pub fn broadcast_shutdown(&mut self) {
        self.broadcast(&ServerMessage::Shutdown);
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    fn send_to(&mut self, client_id: ClientId, msg: &ServerMessage) -> io::Result<()> {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no client {:?}", client_id),
            ));
        };
        let result = client.send(msg);
        if result.is_err() {
            self.clients.remove(&client_id);
        }
        result
    }

    fn broadcast(&mut self, msg: &ServerMessage) {
        let mut disconnected = Vec::new();

        for (id, client) in &mut self.clients {
            if let Err(e) = client.send(msg) {
                warn!(target: "net", "failed to send to client {:?}: {}", id, e);
                disconnected.push(*id);
            }
        }

        for id in disconnected {
            self.clients.remove(&id);
        }
    }
}

fn client_reader_thread(
    client_id: ClientId,
    stream: TcpStream,
    message_tx: Sender<(ClientId, ClientMessage)>,
) {
    let mut reader = BufReader::new(stream);

    loop {
        match read_message::<_, ClientMessage>(&mut reader) {
            Ok(msg) => {
                let is_goodbye = matches!(msg, ClientMessage::Goodbye);
                if message_tx.send((client_id, msg)).is_err() || is_goodbye {
                    break;
                }
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::UnexpectedEof {
                    warn!(target: "net", "client {:?} read error: {}", client_id, e);
                }
                // implicit goodbye
                let _ = message_tx.send((client_id, ClientMessage::Goodbye));
                break;
            }
        }
    }

    info!(target: "net", "client {:?} reader thread exiting", client_id);
}
