//! Gopher menus: item types, menu entries, the menu parser, and the
//! menu-versus-content classifier.

pub mod classify;
pub mod parser;

pub use classify::{MENU_DENSITY_THRESHOLD, ResponseKind, classify};
pub use parser::{GopherMenu, ParsedLine, SkipReason, parse_line, parse_menu};

use burrow_types::address::Address;
use burrow_types::error::{BurrowError, Result};

/// Kind of resource a menu entry points at, from its type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// `0`: plain text file.
    TextFile,
    /// `1`: submenu / directory.
    Directory,
    /// `7`: full-text search.
    Search,
    /// `i`: informational line, not a link.
    Info,
    /// Any other code, passed through as an opaque entry.
    Other(char),
}

impl ItemType {
    pub fn from_code(code: char) -> Self {
        match code {
            '0' => Self::TextFile,
            '1' => Self::Directory,
            '7' => Self::Search,
            'i' => Self::Info,
            c => Self::Other(c),
        }
    }

    /// The single-character code as it appears on the wire.
    pub fn code(self) -> char {
        match self {
            Self::TextFile => '0',
            Self::Directory => '1',
            Self::Search => '7',
            Self::Info => 'i',
            Self::Other(c) => c,
        }
    }

    /// Prefix shown before the label when listing a menu.
    pub fn label_prefix(self) -> &'static str {
        match self {
            Self::Directory => "[LINK]",
            Self::TextFile => "[TEXT]",
            _ => "",
        }
    }
}

/// One line of a Gopher menu.
///
/// `port` keeps the raw field text; it is only converted when the entry is
/// followed, so one bad port never spoils the rest of the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub item_type: ItemType,
    pub label: String,
    pub selector: String,
    pub host: String,
    pub port: String,
}

impl MenuEntry {
    /// The address this entry points at.
    ///
    /// An empty host or port falls back to the server the menu came from.
    /// The selector is used as-is, including the empty root selector.
    pub fn resolve(&self, current: &Address) -> Result<Address> {
        let host = if self.host.trim().is_empty() {
            current.host.clone()
        } else {
            self.host.trim().to_string()
        };

        let port_field = self.port.trim();
        let port = if port_field.is_empty() {
            current.port
        } else {
            port_field
                .parse::<u16>()
                .map_err(|_| BurrowError::InvalidPort(self.port.clone()))?
        };

        Ok(Address::new(host, port, self.selector.clone()))
    }
}
