//! Gopher resource addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BurrowError;

/// The well-known Gopher port.
pub const DEFAULT_PORT: u16 = 70;

/// A retrievable Gopher resource: which server to ask and what to ask it for.
///
/// Addresses compare structurally; the history stack relies on this to
/// suppress duplicate consecutive entries. An empty selector names the
/// server's root listing and is never replaced by anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub selector: String,
}

impl Address {
    pub fn new(host: impl Into<String>, port: u16, selector: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            selector: selector.into(),
        }
    }

    /// The root listing of `host:port`.
    pub fn root(host: impl Into<String>, port: u16) -> Self {
        Self::new(host, port, "")
    }

    /// The same server with the selector dropped.
    pub fn server(&self) -> Self {
        Self::root(self.host.clone(), self.port)
    }

    /// Whether both addresses live on the same `host:port`.
    pub fn same_server(&self, other: &Address) -> bool {
        self.port == other.port && self.host.eq_ignore_ascii_case(&other.host)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gopher://{}:{}/{}", self.host, self.port, self.selector)
    }
}

impl FromStr for Address {
    type Err = BurrowError;

    /// Parse `host`, `host:port`, `host/selector` or the `gopher://` URL
    /// form produced by `Display`. The port defaults to 70.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let rest = trimmed.strip_prefix("gopher://").unwrap_or(trimmed);
        let (authority, selector) = rest.split_once('/').unwrap_or((rest, ""));
        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| BurrowError::InvalidPort(port.to_string()))?;
                (host, port)
            },
            None => (authority, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(BurrowError::InvalidAddress(s.to_string()));
        }
        Ok(Self::new(host, port, selector))
    }
}

/// Validate a DNS hostname (or dotted IPv4 address).
///
/// The total length must be between 2 and 252 characters, and every
/// dot-separated label must be 1-63 characters long and start and end with an
/// alphanumeric character.
pub fn is_valid_hostname(hostname: &str) -> bool {
    if !(2..253).contains(&hostname.len()) {
        return false;
    }
    hostname.split('.').all(|label| {
        let bytes = label.as_bytes();
        match (bytes.first(), bytes.last()) {
            (Some(first), Some(last)) => {
                bytes.len() <= 63 && first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric()
            },
            _ => false,
        }
    })
}
