//! Byte-stream backend traits and the `std::net` TCP implementation.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use burrow_types::error::{BurrowError, Result};

/// Opens outbound connections.
///
/// The navigation engine only ever talks to this trait, so tests can swap
/// in scripted servers without touching the network.
pub trait NetworkBackend {
    /// Open an outbound TCP connection.
    fn connect(&mut self, host: &str, port: u16) -> Result<Box<dyn NetworkStream>>;
}

/// A bidirectional byte stream (TCP connection).
pub trait NetworkStream: Send {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn write(&mut self, data: &[u8]) -> Result<usize>;
    fn close(&mut self) -> Result<()>;
}

/// Plain TCP backend with a bounded connect timeout.
#[derive(Debug, Clone)]
pub struct TcpBackend {
    connect_timeout: Duration,
}

impl TcpBackend {
    /// Default connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Default for TcpBackend {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CONNECT_TIMEOUT)
    }
}

impl NetworkBackend for TcpBackend {
    fn connect(&mut self, host: &str, port: u16) -> Result<Box<dyn NetworkStream>> {
        let connection_error = |source: io::Error| BurrowError::Connection {
            host: host.to_string(),
            port,
            source,
        };

        let addrs = (host, port).to_socket_addrs().map_err(connection_error)?;

        // Try every resolved address; report the last failure.
        let mut last_err = io::Error::new(
            io::ErrorKind::NotFound,
            format!("no addresses for {host}:{port}"),
        );
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => {
                    log::debug!("connected to {host}:{port} via {addr}");
                    return Ok(Box::new(TcpNetworkStream::new(stream)));
                },
                Err(e) => {
                    log::debug!("connect to {addr} failed: {e}");
                    last_err = e;
                },
            }
        }
        Err(connection_error(last_err))
    }
}

/// [`NetworkStream`] over a `std::net::TcpStream`.
pub struct TcpNetworkStream {
    stream: TcpStream,
}

impl TcpNetworkStream {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl NetworkStream for TcpNetworkStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.stream.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other.map_err(|e| BurrowError::transport("read response", e)),
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        loop {
            match self.stream.write(data) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other.map_err(|e| BurrowError::transport("send request", e)),
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            // The peer closing first is the normal end of a Gopher response.
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other.map_err(|e| BurrowError::transport("close", e)),
        }
    }
}
