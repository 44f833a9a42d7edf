//! The whole client: a navigation session plus the user's saved state.
//!
//! [`GopherClient`] is the context every terminal command runs against.

use std::path::PathBuf;

use burrow_net::{
    NetworkBackend, SearchEngine, builtin_search_engines, find_engine, parse_search_engines,
};
use burrow_types::address::{Address, is_valid_hostname};
use burrow_types::error::{BurrowError, Result};

use crate::bookmarks::BookmarkStore;
use crate::config::{SessionRecord, Settings};
use crate::engine::{NavState, Session};
use crate::history::HistoryStack;
use crate::render::Renderer;

pub struct GopherClient<R: Renderer> {
    pub session: Session<R>,
    pub bookmarks: BookmarkStore,
    search_engines: Vec<SearchEngine>,
    session_path: PathBuf,
    debug: bool,
}

impl<R: Renderer> GopherClient<R> {
    pub fn new(
        session: Session<R>,
        bookmarks: BookmarkStore,
        search_engines: Vec<SearchEngine>,
        session_path: PathBuf,
    ) -> Self {
        Self {
            session,
            bookmarks,
            search_engines,
            session_path,
            debug: false,
        }
    }

    /// Build a client from startup settings: restore history, open the
    /// bookmarks and load any extra search engines from `data_dir`.
    pub fn from_settings(
        settings: &Settings,
        backend: Box<dyn NetworkBackend>,
        renderer: R,
    ) -> Result<Self> {
        log::set_max_level(level_for(settings.debug));
        let mut history = HistoryStack::with_store(settings.max_history, settings.history_path());
        match history.restore() {
            Ok(true) => log::info!("restored {} history entries", history.backward().len()),
            Ok(false) => {},
            // Damaged file: start with empty history.
            Err(e) => log::warn!("ignoring saved history: {e}"),
        }

        let bookmarks = BookmarkStore::open(settings.bookmarks_path())?;
        let search_engines = load_search_engines(&settings.search_engines_path())?;
        let session = Session::new(backend, renderer, history, settings.home());

        let mut client = Self::new(session, bookmarks, search_engines, settings.session_path());
        client.set_debug(settings.debug);
        Ok(client)
    }

    pub fn search_engines(&self) -> &[SearchEngine] {
        &self.search_engines
    }

    /// Switch to `host:port` and browse its root listing.
    pub fn connect(&mut self, host: &str, port: u16) -> Result<NavState> {
        if !is_valid_hostname(host) {
            return Err(BurrowError::InvalidAddress(host.to_string()));
        }
        self.session.set_server(host, port);
        Ok(self.session.navigate(Address::root(host, port), true))
    }

    /// Browse an arbitrary address, recording its server in history.
    pub fn open(&mut self, address: Address) -> Result<NavState> {
        if !is_valid_hostname(&address.host) {
            return Err(BurrowError::InvalidAddress(address.host));
        }
        Ok(self.session.navigate(address, true))
    }

    /// Run `query` on the named engine. Search results are not recorded in
    /// history.
    pub fn search(&mut self, engine: &str, query: &str) -> Result<NavState> {
        let address = find_engine(&self.search_engines, engine)
            .map(|e| e.query(query))
            .ok_or_else(|| BurrowError::Command(format!("Search engine {engine} not found.")))?;
        Ok(self.session.navigate(address, false))
    }

    /// Browse the bookmark at `index`.
    pub fn open_bookmark(&mut self, index: usize) -> Result<NavState> {
        let address = self
            .bookmarks
            .get(index)
            .map(|b| b.address(self.session.current()))
            .ok_or_else(|| BurrowError::Command("Invalid bookmark index.".to_string()))?;
        Ok(self.session.navigate(address, true))
    }

    /// Write the current server and history to the session file.
    pub fn save_session(&self) -> Result<PathBuf> {
        let record = SessionRecord::new(self.session.current(), self.session.history().snapshot());
        record.save(&self.session_path)?;
        log::info!("session saved to {}", self.session_path.display());
        Ok(self.session_path.clone())
    }

    /// Restore server and history from the session file. `Ok(false)` if
    /// nothing has been saved.
    pub fn load_session(&mut self) -> Result<bool> {
        let Some(record) = SessionRecord::load(&self.session_path)? else {
            return Ok(false);
        };
        self.session.set_server(&record.hostname, record.port);
        self.session.history_mut().replace(record.history());
        log::info!("session loaded from {}", self.session_path.display());
        Ok(true)
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Turn debug logging on or off.
    pub fn set_debug(&mut self, on: bool) {
        self.debug = on;
        log::set_max_level(level_for(on));
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.set_debug(!self.debug);
        self.debug
    }
}

/// Most verbose log level shown with debug mode on or off.
pub fn level_for(debug: bool) -> log::LevelFilter {
    if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

/// Built-in engines plus those listed in `path`, if it exists. Engines from
/// the file come first so they can shadow a built-in of the same name.
pub fn load_search_engines(path: &std::path::Path) -> Result<Vec<SearchEngine>> {
    let mut engines = match std::fs::read_to_string(path) {
        Ok(text) => parse_search_engines(&text)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(BurrowError::Config(format!("{}: {e}", path.display()))),
    };
    engines.extend(builtin_search_engines());
    Ok(engines)
}
