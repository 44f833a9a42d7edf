//! Single-request Gopher transport.
//!
//! Gopher has no length framing: the client writes one selector line and the
//! server answers with a byte stream that ends when it closes the connection.
//! A [`GopherConnection`] therefore carries exactly one request; every
//! navigation step reconnects.

use burrow_types::address::Address;
use burrow_types::error::{BurrowError, Result};

use crate::backend::{NetworkBackend, NetworkStream};

/// Size of each read from the socket.
pub const READ_CHUNK_SIZE: usize = 4096;

/// State of the session's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection open (never connected, or closed after a response).
    Disconnected,
    /// Connected and ready to send a selector.
    Connected,
    /// The last connect or exchange failed.
    Failed,
}

/// The one connection a client session may hold.
pub struct GopherConnection {
    stream: Option<Box<dyn NetworkStream>>,
    state: ConnectionState,
    peer: Option<Address>,
}

impl GopherConnection {
    pub fn new() -> Self {
        Self {
            stream: None,
            state: ConnectionState::Disconnected,
            peer: None,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The `host:port` of the last connect attempt.
    pub fn peer(&self) -> Option<(&str, u16)> {
        self.peer.as_ref().map(|a| (a.host.as_str(), a.port))
    }

    /// Open a connection to `host:port`, closing any connection held before.
    pub fn connect(
        &mut self,
        backend: &mut dyn NetworkBackend,
        host: &str,
        port: u16,
    ) -> Result<()> {
        self.disconnect();
        self.peer = Some(Address::root(host, port));
        match backend.connect(host, port) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = ConnectionState::Connected;
                Ok(())
            },
            Err(e) => {
                self.state = ConnectionState::Failed;
                Err(e)
            },
        }
    }

    /// Whether a request can be sent right now.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected && self.stream.is_some()
    }

    /// Whether a request can be sent right now to the server of `address`.
    pub fn is_connected_to(&self, address: &Address) -> bool {
        self.is_connected() && self.peer.as_ref().is_some_and(|p| p.same_server(address))
    }

    /// Send `selector` and read the whole response.
    ///
    /// The connection is closed afterwards whether or not the exchange
    /// succeeded.
    pub fn request(&mut self, selector: &str) -> Result<String> {
        let mut stream = self.stream.take().ok_or(BurrowError::NotConnected)?;

        log::debug!("sending selector {selector:?}");
        let result = exchange(stream.as_mut(), selector);
        if let Err(e) = stream.close() {
            log::debug!("close after response: {e}");
        }

        match result {
            Ok(raw) => {
                self.state = ConnectionState::Disconnected;
                let text = decode_response(&raw);
                log::debug!(
                    "received {} bytes: {:?}",
                    raw.len(),
                    text.chars().take(100).collect::<String>()
                );
                Ok(text)
            },
            Err(e) => {
                self.state = ConnectionState::Failed;
                Err(e)
            },
        }
    }

    /// Close the connection, if any.
    pub fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.close();
        }
        self.state = ConnectionState::Disconnected;
    }
}

impl Default for GopherConnection {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a response body, replacing invalid UTF-8 with U+FFFD.
pub fn decode_response(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Write the request line, then read until the peer closes.
fn exchange(stream: &mut dyn NetworkStream, selector: &str) -> Result<Vec<u8>> {
    let request = format!("{selector}\r\n");
    let mut pending = request.as_bytes();
    while !pending.is_empty() {
        let n = stream.write(pending)?;
        if n == 0 {
            return Err(BurrowError::transport(
                "send request",
                std::io::ErrorKind::WriteZero.into(),
            ));
        }
        pending = &pending[n..];
    }

    let mut body = Vec::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match stream.read(&mut chunk)? {
            0 => break,
            n => body.extend_from_slice(&chunk[..n]),
        }
    }
    Ok(body)
}
