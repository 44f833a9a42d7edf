//! Search engine table for searching Gopherspace.

use burrow_types::address::{Address, DEFAULT_PORT};
use burrow_types::error::{BurrowError, Result};
use serde::{Deserialize, Serialize};

/// A Gopher search service.
///
/// A search is an ordinary request: the query is appended verbatim to
/// `selector`, so engines that expect a tab-separated query carry the tab at
/// the end of their selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEngine {
    /// Name the user picks the engine by (e.g., "Veronica-2").
    pub name: String,
    /// Hostname of the search server.
    pub host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Selector prefix the query is appended to.
    #[serde(default)]
    pub selector: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl SearchEngine {
    /// The address that runs `query` on this engine.
    pub fn query(&self, query: &str) -> Address {
        Address::new(
            self.host.clone(),
            self.port,
            format!("{}{}", self.selector, query),
        )
    }
}

/// Engines available without any configuration file.
pub fn builtin_search_engines() -> Vec<SearchEngine> {
    vec![SearchEngine {
        name: "Veronica-2".to_string(),
        host: "gopher.floodgap.com".to_string(),
        port: DEFAULT_PORT,
        selector: "/v2/vs\t".to_string(),
    }]
}

/// Parse a search engines TOML file into a list of engines.
pub fn parse_search_engines(toml_str: &str) -> Result<Vec<SearchEngine>> {
    #[derive(Deserialize)]
    struct EnginesFile {
        #[serde(default)]
        engine: Vec<SearchEngine>,
    }

    let file: EnginesFile = toml::from_str(toml_str)
        .map_err(|e| BurrowError::Config(format!("search_engines.toml: {e}")))?;
    Ok(file.engine)
}

/// Look an engine up by name, ignoring ASCII case.
pub fn find_engine<'a>(engines: &'a [SearchEngine], name: &str) -> Option<&'a SearchEngine> {
    engines
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
}
