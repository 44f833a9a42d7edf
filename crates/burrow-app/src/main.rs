//! burrow: an interactive Gopher client for the terminal.
//!
//! Starts on the options menu. Commands (or their menu numbers) connect to
//! servers, search, open bookmarks and save the session; while a menu or
//! document is shown, entry numbers, `b`, `f` and `q` drive navigation.

mod commands;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};

use burrow_browser::config::SETTINGS_FILE;
use burrow_browser::{GopherClient, Renderer, Settings, register_browser_commands};
use burrow_net::TcpBackend;
use burrow_terminal::CommandRegistry;

use commands::process_command_output;
use terminal::TerminalRenderer;

/// Environment variable naming the settings file.
const CONFIG_ENV: &str = "BURROW_CONFIG";
/// Default env_logger filter.
const LOG_FILTER: &str = "info,burrow=debug";
/// Prompt of the options menu.
const PROMPT: &str = "> ";

fn main() -> Result<()> {
    // burrow's own crates pass debug records; `log::set_max_level` decides
    // whether they show.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(LOG_FILTER))
        .init();

    let settings_path = resolve_settings_path(
        std::env::args().nth(1),
        std::env::var(CONFIG_ENV).ok(),
        PathBuf::from(SETTINGS_FILE).exists(),
    );
    let settings = match &settings_path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let backend = TcpBackend::new(settings.connect_timeout());
    let mut client =
        GopherClient::from_settings(&settings, Box::new(backend), TerminalRenderer::stdio())
            .context("starting client")?;
    log::info!(
        "Starting burrow (home {}, data in {})",
        settings.home(),
        settings.data_dir.display()
    );

    let mut cmd_reg = CommandRegistry::new();
    register_browser_commands(&mut cmd_reg);

    run(&cmd_reg, &mut client);
    Ok(())
}

/// Pick the settings file: first CLI argument, then `BURROW_CONFIG`, then
/// `burrow.toml` in the working directory if it exists.
fn resolve_settings_path(
    arg: Option<String>,
    env: Option<String>,
    default_exists: bool,
) -> Option<PathBuf> {
    arg.or(env)
        .map(PathBuf::from)
        .or_else(|| default_exists.then(|| PathBuf::from(SETTINGS_FILE)))
}

/// Read and dispatch command lines until the user quits or input ends.
fn run<R: Renderer>(cmd_reg: &CommandRegistry<GopherClient<R>>, client: &mut GopherClient<R>) {
    client.session.renderer_mut().notify(&cmd_reg.options_text());
    loop {
        let Some(line) = client.session.renderer_mut().read_choice(PROMPT) else {
            client.session.quit();
            break;
        };
        let result = cmd_reg.execute(&line, client);
        if !process_command_output(result, client.session.renderer_mut()) {
            break;
        }
    }
    log::info!("session ended");
}
