//! Shared test doubles for the browser crate.
//!
//! [`MockNetwork`] serves canned responses keyed by server and selector and
//! records every request. [`ScriptedRenderer`] replays typed input and
//! records everything it was asked to show.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use burrow_net::{NetworkBackend, NetworkStream};
use burrow_types::address::Address;
use burrow_types::error::{BurrowError, Result};

use crate::gopher::MenuEntry;
use crate::render::Renderer;

type Responses = HashMap<(String, u16, String), String>;

/// In-memory Gopher servers.
#[derive(Default)]
pub struct MockNetwork {
    responses: Arc<Responses>,
    refused: Vec<(String, u16)>,
    dropping: Vec<(String, u16)>,
    requests: Arc<Mutex<Vec<Address>>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `selector` on `host:port`.
    pub fn serve(mut self, host: &str, port: u16, selector: &str, body: &str) -> Self {
        Arc::make_mut(&mut self.responses).insert(
            (host.to_string(), port, selector.to_string()),
            body.to_string(),
        );
        self
    }

    /// Refuse connections to `host:port`.
    pub fn refuse(mut self, host: &str, port: u16) -> Self {
        self.refused.push((host.to_string(), port));
        self
    }

    /// Accept connections to `host:port`, then fail every read as if the
    /// peer had reset the connection.
    pub fn fail_after_connect(mut self, host: &str, port: u16) -> Self {
        self.dropping.push((host.to_string(), port));
        self
    }

    /// Handle to the request log; stays valid after the network is boxed.
    pub fn request_log(&self) -> Arc<Mutex<Vec<Address>>> {
        Arc::clone(&self.requests)
    }
}

impl NetworkBackend for MockNetwork {
    fn connect(&mut self, host: &str, port: u16) -> Result<Box<dyn NetworkStream>> {
        if self.refused.iter().any(|(h, p)| h == host && *p == port) {
            return Err(BurrowError::Connection {
                host: host.to_string(),
                port,
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }
        let reset = self.dropping.iter().any(|(h, p)| h == host && *p == port);
        Ok(Box::new(MockStream {
            host: host.to_string(),
            port,
            reset,
            responses: Arc::clone(&self.responses),
            requests: Arc::clone(&self.requests),
            written: Vec::new(),
            pending: None,
        }))
    }
}

struct MockStream {
    host: String,
    port: u16,
    reset: bool,
    responses: Arc<Responses>,
    requests: Arc<Mutex<Vec<Address>>>,
    written: Vec<u8>,
    pending: Option<VecDeque<u8>>,
}

impl NetworkStream for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.pending.is_none() {
            let line = String::from_utf8_lossy(&self.written).into_owned();
            let selector = line.strip_suffix("\r\n").unwrap_or(&line).to_string();
            self.requests
                .lock()
                .unwrap()
                .push(Address::new(self.host.clone(), self.port, selector.clone()));
            let body = self
                .responses
                .get(&(self.host.clone(), self.port, selector))
                .cloned()
                .unwrap_or_default();
            self.pending = Some(body.into_bytes().into());
        }
        if self.reset {
            return Err(BurrowError::transport(
                "read response",
                io::Error::from(io::ErrorKind::ConnectionReset),
            ));
        }
        let pending = self.pending.as_mut().unwrap();
        let n = buf.len().min(pending.len());
        for (slot, byte) in buf.iter_mut().zip(pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Renderer that answers prompts from a script and records its output.
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    inputs: VecDeque<String>,
    pub menus: Vec<Vec<MenuEntry>>,
    pub contents: Vec<String>,
    pub notices: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedRenderer {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Labels of the most recently shown menu.
    pub fn last_menu_labels(&self) -> Vec<&str> {
        self.menus
            .last()
            .map(|entries| entries.iter().map(|e| e.label.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Renderer for ScriptedRenderer {
    fn render_menu(&mut self, entries: &[MenuEntry]) {
        self.menus.push(entries.to_vec());
    }

    fn render_content(&mut self, text: &str) {
        self.contents.push(text.to_string());
    }

    fn read_choice(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.inputs.pop_front()
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
