//! The navigation engine.
//!
//! A [`Session`] owns everything one user's browsing touches: the network
//! backend, the single live connection, the renderer and the history stack.
//! [`Session::navigate`] drives one user-initiated navigation to completion:
//! fetch, classify, present, and follow the user's choice, hop after hop,
//! until the user quits, runs out of history or a fetch fails.

use burrow_net::{GopherConnection, NetworkBackend};
use burrow_types::address::Address;
use burrow_types::error::Result;

use crate::gopher::{ResponseKind, classify, parse_menu};
use crate::history::HistoryStack;
use crate::render::{Choice, Renderer, prompt_content_choice, prompt_menu_choice};

/// Shown when there is nothing to go back to.
pub const BEGINNING_OF_HISTORY: &str = "You're at the beginning of your navigation history.";
/// Shown when there is nothing to go forward to.
pub const END_OF_HISTORY: &str = "You're at the end of your navigation history.";

/// Where the engine is in its request/present cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    AwaitingResponse,
    ShowingMenu,
    ShowingContent,
    Terminated,
}

/// What to do after a page has been shown.
enum Next {
    Visit(Address),
    Stop(NavState),
}

/// One browsing session.
pub struct Session<R: Renderer> {
    backend: Box<dyn NetworkBackend>,
    connection: GopherConnection,
    renderer: R,
    history: HistoryStack,
    current: Address,
    state: NavState,
}

impl<R: Renderer> Session<R> {
    /// A session whose current server is `home`. Nothing is fetched yet.
    pub fn new(
        backend: Box<dyn NetworkBackend>,
        renderer: R,
        history: HistoryStack,
        home: Address,
    ) -> Self {
        Self {
            backend,
            connection: GopherConnection::new(),
            renderer,
            history,
            current: home,
            state: NavState::Idle,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    /// The last address fetched, or the home server before any fetch.
    pub fn current(&self) -> &Address {
        &self.current
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStack {
        &mut self.history
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn connection(&self) -> &GopherConnection {
        &self.connection
    }

    /// Point the session at another server without fetching anything.
    pub fn set_server(&mut self, host: &str, port: u16) {
        self.connection.disconnect();
        self.current = Address::root(host, port);
    }

    /// Fetch `address` and keep browsing from there.
    ///
    /// With `record_history`, the server of `address` is pushed onto the
    /// history once it has been fetched successfully. Hops the user makes
    /// from there on are not recorded. Returns the state the session ends
    /// up in: `Idle` when control goes back to the caller, `Terminated`
    /// when the user quit.
    pub fn navigate(&mut self, address: Address, record_history: bool) -> NavState {
        let mut target = address;
        let mut record = record_history;
        loop {
            let text = match self.fetch(&target) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("fetching {target} failed: {e}");
                    self.renderer.notify(&format!("Error while navigating: {e}"));
                    return self.settle(NavState::Idle);
                },
            };
            self.current = target.clone();
            if std::mem::take(&mut record) {
                self.record(&target);
            }

            let next = match classify(&text) {
                ResponseKind::Menu => self.show_menu(&text),
                ResponseKind::Content => self.show_content(&text),
            };
            match next {
                Next::Visit(address) => target = address,
                Next::Stop(state) => return self.settle(state),
            }
        }
    }

    /// Step back in history and browse from there.
    pub fn go_back(&mut self) -> NavState {
        match self.back() {
            Next::Visit(address) => self.navigate(address, false),
            Next::Stop(state) => self.settle(state),
        }
    }

    /// Step forward in history and browse from there.
    pub fn go_forward(&mut self) -> NavState {
        match self.history.go_forward() {
            Some(address) => self.navigate(address, false),
            None => {
                self.renderer.notify(END_OF_HISTORY);
                self.settle(NavState::Idle)
            },
        }
    }

    /// Close the connection, save history and end the session.
    pub fn quit(&mut self) -> NavState {
        self.connection.disconnect();
        if let Err(e) = self.history.persist() {
            log::error!("failed to save history: {e}");
        }
        self.settle(NavState::Terminated)
    }

    fn settle(&mut self, state: NavState) -> NavState {
        self.state = state;
        state
    }

    fn fetch(&mut self, address: &Address) -> Result<String> {
        log::info!("navigating to {address}");
        self.state = NavState::AwaitingResponse;
        if !self.connection.is_connected_to(address) {
            self.connection
                .connect(self.backend.as_mut(), &address.host, address.port)?;
        }
        self.connection.request(&address.selector)
    }

    fn record(&mut self, address: &Address) {
        if self.history.push(address.server())
            && let Err(e) = self.history.persist()
        {
            log::error!("failed to save history: {e}");
        }
    }

    fn back(&mut self) -> Next {
        match self.history.go_back() {
            Some(address) => Next::Visit(address),
            None => {
                self.renderer.notify(BEGINNING_OF_HISTORY);
                Next::Stop(NavState::Idle)
            },
        }
    }

    fn show_menu(&mut self, text: &str) -> Next {
        self.state = NavState::ShowingMenu;
        let entries = parse_menu(text);
        loop {
            self.renderer.render_menu(&entries);
            let choice = prompt_menu_choice(&mut self.renderer, entries.len());
            match choice {
                Choice::Select(index) => {
                    let Some(entry) = entries.get(index) else {
                        continue;
                    };
                    match entry.resolve(&self.current) {
                        Ok(address) => return Next::Visit(address),
                        Err(e) => {
                            log::warn!("cannot follow {:?}: {e}", entry.label);
                            self.renderer.notify(&e.to_string());
                        },
                    }
                },
                Choice::Back => return self.back(),
                Choice::Forward => match self.history.go_forward() {
                    Some(address) => return Next::Visit(address),
                    None => self.renderer.notify(END_OF_HISTORY),
                },
                Choice::Quit => return Next::Stop(self.quit()),
            }
        }
    }

    fn show_content(&mut self, text: &str) -> Next {
        self.state = NavState::ShowingContent;
        self.renderer.render_content(text);
        loop {
            match prompt_content_choice(&mut self.renderer) {
                Choice::Back => return self.back(),
                Choice::Forward => match self.history.go_forward() {
                    Some(address) => return Next::Visit(address),
                    None => self.renderer.notify(END_OF_HISTORY),
                },
                Choice::Quit => return Next::Stop(self.quit()),
                Choice::Select(_) => {},
            }
        }
    }
}
