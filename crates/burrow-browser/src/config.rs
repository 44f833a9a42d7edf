//! Client settings and the saved session record.
//!
//! [`Settings`] is the static TOML configuration read at startup.
//! [`SessionRecord`] is the JSON document written by "save" and read back by
//! "load": the current server plus the history stacks.

use std::path::{Path, PathBuf};
use std::time::Duration;

use burrow_types::address::{Address, DEFAULT_PORT};
use burrow_types::error::{BurrowError, Result};
use serde::{Deserialize, Serialize};

use crate::history::{DEFAULT_MAX_HISTORY, HistorySnapshot};
use crate::store;

/// Settings file looked for in the working directory.
pub const SETTINGS_FILE: &str = "burrow.toml";
/// Saved session record file name.
pub const SESSION_FILE: &str = "config.json";
/// Bookmarks file name.
pub const BOOKMARKS_FILE: &str = "bookmarks.json";
/// Navigation history file name.
pub const HISTORY_FILE: &str = "navigation_history.json";
/// Optional search engines file name.
pub const SEARCH_ENGINES_FILE: &str = "search_engines.toml";

/// Startup settings (from `burrow.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server used until the user connects somewhere else.
    pub host: String,
    pub port: u16,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Bound on the backward history stack.
    pub max_history: usize,
    /// Directory holding bookmarks, history and the saved session.
    pub data_dir: PathBuf,
    /// Start with debug logging enabled.
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "1436.ninja".to_string(),
            port: DEFAULT_PORT,
            connect_timeout_secs: 10,
            max_history: DEFAULT_MAX_HISTORY,
            data_dir: PathBuf::from("."),
            debug: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(toml_str)
            .map_err(|e| BurrowError::Config(format!("burrow.toml: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BurrowError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.max_history == 0 {
            return Err(BurrowError::Config("max_history must be at least 1".into()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(BurrowError::Config(
                "connect_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Root listing of the configured server.
    pub fn home(&self) -> Address {
        Address::root(self.host.clone(), self.port)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.data_dir.join(BOOKMARKS_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    pub fn search_engines_path(&self) -> PathBuf {
        self.data_dir.join(SEARCH_ENGINES_FILE)
    }
}

/// The document written by "save" and read by "load".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub hostname: String,
    pub port: u16,
    #[serde(default)]
    pub backward: Vec<Address>,
    #[serde(default)]
    pub forward: Vec<Address>,
}

impl SessionRecord {
    pub fn new(server: &Address, history: HistorySnapshot) -> Self {
        Self {
            hostname: server.host.clone(),
            port: server.port,
            backward: history.backward,
            forward: history.forward,
        }
    }

    pub fn server(&self) -> Address {
        Address::root(self.hostname.clone(), self.port)
    }

    pub fn history(&self) -> HistorySnapshot {
        HistorySnapshot {
            backward: self.backward.clone(),
            forward: self.forward.clone(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        store::save_json(path, self)
    }

    /// Read a saved record; `Ok(None)` if nothing has been saved yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        store::load_json(path)
    }
}
