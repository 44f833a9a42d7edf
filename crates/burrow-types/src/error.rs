//! Error types for burrow.

use std::io;

/// Errors produced by burrow.
#[derive(Debug, thiserror::Error)]
pub enum BurrowError {
    /// The TCP connection could not be established (DNS failure, refused,
    /// timed out).
    #[error("connection error: {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// The connection was established but failed during send or receive.
    #[error("transport error: {context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// A request was issued without an open connection.
    #[error("not connected")]
    NotConnected,

    /// A menu entry carried a port field that is not a number.
    #[error("invalid port: {0:?}")]
    InvalidPort(String),

    /// A typed-in address could not be understood.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Reading or writing a persisted file failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BurrowError {
    /// Wrap a socket-level failure that happened after connecting.
    pub fn transport(context: &'static str, source: io::Error) -> Self {
        Self::Transport { context, source }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BurrowError>;
