//! Terminal commands for the Gopher client.

use burrow_net::find_engine;
use burrow_terminal::{Command, CommandOutput, CommandRegistry};
use burrow_types::address::{Address, DEFAULT_PORT};
use burrow_types::error::{BurrowError, Result};

use crate::bookmarks::Bookmark;
use crate::client::GopherClient;
use crate::engine::NavState;
use crate::render::Renderer;

/// Register all client commands, plus the numbered options menu aliases.
pub fn register_browser_commands<R: Renderer + 'static>(reg: &mut CommandRegistry<GopherClient<R>>) {
    reg.register(Box::new(ConnectCmd));
    reg.register(Box::new(GoCmd));
    reg.register(Box::new(BackCmd));
    reg.register(Box::new(ForwardCmd));
    reg.register(Box::new(SearchCmd));
    reg.register(Box::new(BookmarkCmd));
    reg.register(Box::new(HistoryCmd));
    reg.register(Box::new(SaveCmd));
    reg.register(Box::new(LoadCmd));
    reg.register(Box::new(DebugCmd));
    reg.register(Box::new(QuitCmd));

    for (key, expansion) in [
        ("1", "connect"),
        ("2", "search"),
        ("3", "bookmark list"),
        ("4", "bookmark open"),
        ("5", "save"),
        ("6", "load"),
        ("7", "quit"),
        ("8", "help"),
        ("9", "debug"),
    ] {
        reg.set_alias(key, expansion);
    }
}

/// Map the state a navigation ended in onto command output.
fn finished(state: NavState) -> CommandOutput {
    match state {
        NavState::Terminated => CommandOutput::Quit,
        _ => CommandOutput::None,
    }
}

const HOST_PROMPT: &str = "Enter Gopher server hostname: ";
const QUERY_PROMPT: &str = "Enter search query: ";
const BOOKMARK_PROMPT: &str = "Enter the number of the bookmark you want to navigate to: ";

/// Ask the user for a value. Blank input or end of input gives `None`.
fn ask<R: Renderer>(client: &mut GopherClient<R>, prompt: &str) -> Option<String> {
    let answer = client.session.renderer_mut().read_choice(prompt)?;
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

fn usage(text: &str) -> Result<CommandOutput> {
    Ok(CommandOutput::Text(format!("Usage: {text}")))
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|_| BurrowError::InvalidPort(raw.to_string()))
}

fn parse_index(raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| BurrowError::Command("Invalid bookmark index.".to_string()))
}

// -------------------------------------------------------------------
// connect
// -------------------------------------------------------------------
struct ConnectCmd;

impl<R: Renderer> Command<GopherClient<R>> for ConnectCmd {
    fn name(&self) -> &str {
        "connect"
    }

    fn description(&self) -> &str {
        "Connect to a Gopher server"
    }

    fn usage(&self) -> &str {
        "connect <host> [port]"
    }

    fn category(&self) -> &str {
        "navigation"
    }

    fn execute(&self, args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        let host = match args.first() {
            Some(&host) => host.to_string(),
            None => match ask(client, HOST_PROMPT) {
                Some(host) => host,
                None => return Ok(CommandOutput::None),
            },
        };
        let port = match args.get(1) {
            Some(raw) => parse_port(raw)?,
            None => DEFAULT_PORT,
        };
        Ok(finished(client.connect(&host, port)?))
    }
}

// -------------------------------------------------------------------
// go
// -------------------------------------------------------------------
struct GoCmd;

impl<R: Renderer> Command<GopherClient<R>> for GoCmd {
    fn name(&self) -> &str {
        "go"
    }

    fn description(&self) -> &str {
        "Open a Gopher address"
    }

    fn usage(&self) -> &str {
        "go <host[:port][/selector]> | go gopher://host:port/selector"
    }

    fn category(&self) -> &str {
        "navigation"
    }

    fn execute(&self, args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        let Some(&target) = args.first() else {
            return usage("go <host[:port][/selector]>");
        };
        let address: Address = target.parse()?;
        Ok(finished(client.open(address)?))
    }
}

// -------------------------------------------------------------------
// back / forward
// -------------------------------------------------------------------
struct BackCmd;

impl<R: Renderer> Command<GopherClient<R>> for BackCmd {
    fn name(&self) -> &str {
        "back"
    }

    fn description(&self) -> &str {
        "Go back to the previous server"
    }

    fn usage(&self) -> &str {
        "back"
    }

    fn category(&self) -> &str {
        "navigation"
    }

    fn execute(&self, _args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        Ok(finished(client.session.go_back()))
    }
}

struct ForwardCmd;

impl<R: Renderer> Command<GopherClient<R>> for ForwardCmd {
    fn name(&self) -> &str {
        "forward"
    }

    fn description(&self) -> &str {
        "Go forward again after going back"
    }

    fn usage(&self) -> &str {
        "forward"
    }

    fn category(&self) -> &str {
        "navigation"
    }

    fn execute(&self, _args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        Ok(finished(client.session.go_forward()))
    }
}

// -------------------------------------------------------------------
// search
// -------------------------------------------------------------------
struct SearchCmd;

impl<R: Renderer> Command<GopherClient<R>> for SearchCmd {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search Gopherspace"
    }

    fn usage(&self) -> &str {
        "search [engine] [query...]"
    }

    fn category(&self) -> &str {
        "navigation"
    }

    fn execute(&self, args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        match args {
            [] => {
                let names: Vec<&str> = client
                    .search_engines()
                    .iter()
                    .map(|e| e.name.as_str())
                    .collect();
                let prompt = format!("Choose a search engine ({}): ", names.join(", "));
                match ask(client, &prompt) {
                    Some(engine) => search_prompting_query(client, &engine),
                    None => Ok(CommandOutput::None),
                }
            },
            [engine] => search_prompting_query(client, engine),
            [engine, query @ ..] => Ok(finished(client.search(engine, &query.join(" "))?)),
        }
    }
}

fn search_prompting_query<R: Renderer>(
    client: &mut GopherClient<R>,
    engine: &str,
) -> Result<CommandOutput> {
    if find_engine(client.search_engines(), engine).is_none() {
        return Err(BurrowError::Command(format!(
            "Search engine {engine} not found."
        )));
    }
    match ask(client, QUERY_PROMPT) {
        Some(query) => Ok(finished(client.search(engine, &query)?)),
        None => Ok(CommandOutput::None),
    }
}

// -------------------------------------------------------------------
// bookmark
// -------------------------------------------------------------------
struct BookmarkCmd;

const BOOKMARK_USAGE: &str = "bookmark list | bookmark open <n> | bookmark add <title> [selector] | \
                              bookmark rm <n> | bookmark edit <n> <title> [selector]";

impl<R: Renderer> Command<GopherClient<R>> for BookmarkCmd {
    fn name(&self) -> &str {
        "bookmark"
    }

    fn description(&self) -> &str {
        "List, open and manage bookmarks"
    }

    fn usage(&self) -> &str {
        BOOKMARK_USAGE
    }

    fn category(&self) -> &str {
        "bookmarks"
    }

    fn execute(&self, args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        match args {
            [] | ["list"] => Ok(CommandOutput::Text(list_bookmarks(client))),
            ["open"] => {
                if client.bookmarks.is_empty() {
                    return Ok(CommandOutput::Text(list_bookmarks(client)));
                }
                let listing = list_bookmarks(client);
                client.session.renderer_mut().notify(&listing);
                match ask(client, BOOKMARK_PROMPT) {
                    Some(index) => Ok(finished(client.open_bookmark(parse_index(&index)?)?)),
                    None => Ok(CommandOutput::None),
                }
            },
            ["open", index] => Ok(finished(client.open_bookmark(parse_index(index)?)?)),
            ["add", title] => {
                let selector = client.session.current().selector.clone();
                add_bookmark(client, title, &selector)
            },
            ["add", title, selector] => add_bookmark(client, title, selector),
            ["rm", index] => {
                let removed = client.bookmarks.remove(parse_index(index)?)?;
                Ok(CommandOutput::Text(format!(
                    "Deleted bookmark '{}'.",
                    removed.title
                )))
            },
            ["edit", index, title, rest @ ..] => {
                let updated = client.bookmarks.update(
                    parse_index(index)?,
                    Some(*title),
                    rest.first().copied(),
                )?;
                Ok(CommandOutput::Text(format!(
                    "Modified bookmark to '{}' - '{}'.",
                    updated.title, updated.selector
                )))
            },
            _ => usage(BOOKMARK_USAGE),
        }
    }
}

fn list_bookmarks<R: Renderer>(client: &GopherClient<R>) -> String {
    if client.bookmarks.is_empty() {
        return "No bookmarks saved.".to_string();
    }
    client
        .bookmarks
        .list()
        .iter()
        .enumerate()
        .map(|(i, b)| format!("{i}. {} ({})", b.title, b.selector))
        .collect::<Vec<_>>()
        .join("\n")
}

fn add_bookmark<R: Renderer>(
    client: &mut GopherClient<R>,
    title: &str,
    selector: &str,
) -> Result<CommandOutput> {
    client.bookmarks.add(Bookmark::new(title, selector))?;
    Ok(CommandOutput::Text(format!("Saved '{title}' as a bookmark.")))
}

// -------------------------------------------------------------------
// history
// -------------------------------------------------------------------
struct HistoryCmd;

impl<R: Renderer> Command<GopherClient<R>> for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }

    fn description(&self) -> &str {
        "Show navigation history"
    }

    fn usage(&self) -> &str {
        "history"
    }

    fn category(&self) -> &str {
        "navigation"
    }

    fn execute(&self, _args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        let history = client.session.history();
        let mut out = String::from("Backward:");
        if history.backward().is_empty() {
            out.push_str(" (empty)");
        }
        for address in history.backward().iter().rev() {
            out.push_str(&format!("\n  {address}"));
        }
        out.push_str("\nForward:");
        if history.forward().is_empty() {
            out.push_str(" (empty)");
        }
        for address in history.forward().iter().rev() {
            out.push_str(&format!("\n  {address}"));
        }
        Ok(CommandOutput::Text(out))
    }
}

// -------------------------------------------------------------------
// save / load
// -------------------------------------------------------------------
struct SaveCmd;

impl<R: Renderer> Command<GopherClient<R>> for SaveCmd {
    fn name(&self) -> &str {
        "save"
    }

    fn description(&self) -> &str {
        "Save configuration"
    }

    fn usage(&self) -> &str {
        "save"
    }

    fn category(&self) -> &str {
        "config"
    }

    fn execute(&self, _args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        let path = client.save_session()?;
        Ok(CommandOutput::Text(format!(
            "Configuration saved to {}.",
            path.display()
        )))
    }
}

struct LoadCmd;

impl<R: Renderer> Command<GopherClient<R>> for LoadCmd {
    fn name(&self) -> &str {
        "load"
    }

    fn description(&self) -> &str {
        "Load configuration"
    }

    fn usage(&self) -> &str {
        "load"
    }

    fn category(&self) -> &str {
        "config"
    }

    fn execute(&self, _args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        let text = if client.load_session()? {
            format!("Configuration loaded. Current server: {}", client.session.current())
        } else {
            "No saved configuration found.".to_string()
        };
        Ok(CommandOutput::Text(text))
    }
}

// -------------------------------------------------------------------
// debug
// -------------------------------------------------------------------
struct DebugCmd;

impl<R: Renderer> Command<GopherClient<R>> for DebugCmd {
    fn name(&self) -> &str {
        "debug"
    }

    fn description(&self) -> &str {
        "Toggle debug mode"
    }

    fn usage(&self) -> &str {
        "debug"
    }

    fn category(&self) -> &str {
        "config"
    }

    fn execute(&self, _args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        let on = client.toggle_debug();
        Ok(CommandOutput::Text(format!(
            "Debug mode {}",
            if on { "ON" } else { "OFF" }
        )))
    }
}

// -------------------------------------------------------------------
// quit
// -------------------------------------------------------------------
struct QuitCmd;

impl<R: Renderer> Command<GopherClient<R>> for QuitCmd {
    fn name(&self) -> &str {
        "quit"
    }

    fn description(&self) -> &str {
        "Quit"
    }

    fn usage(&self) -> &str {
        "quit"
    }

    fn execute(&self, _args: &[&str], client: &mut GopherClient<R>) -> Result<CommandOutput> {
        client.session.quit();
        Ok(CommandOutput::Quit)
    }
}
