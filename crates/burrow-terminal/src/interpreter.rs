//! Command trait, registry, and dispatch logic.
//!
//! Commands are generic over the context they act on, so the registry can
//! live in this crate while the browser crate supplies the commands.
//! Supports quoted arguments, case-insensitive names and numbered aliases
//! for the options menu.

use std::collections::HashMap;

use burrow_types::error::{BurrowError, Result};

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to the app to end the session.
    Quit,
}

/// A single executable command acting on a context `C`.
pub trait Command<C> {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "connect <host> \[port\]").
    fn usage(&self) -> &str;

    /// Command category for grouping in `help` output.
    fn category(&self) -> &str {
        "general"
    }

    /// Execute the command with the given arguments and context.
    fn execute(&self, args: &[&str], ctx: &mut C) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
///
/// Also holds aliases. Aliases expand the first word of a line before
/// lookup, which is how the numbered options menu (`1`, `2`, ...) maps onto
/// named commands.
pub struct CommandRegistry<C> {
    commands: HashMap<String, Box<dyn Command<C>>>,
    aliases: HashMap<String, String>,
}

impl<C> CommandRegistry<C> {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command<C>>) {
        self.commands.insert(cmd.name().to_ascii_lowercase(), cmd);
    }

    // -- Alias API --

    /// Set a command alias. The expansion may carry arguments.
    pub fn set_alias(&mut self, name: &str, expansion: &str) {
        self.aliases
            .insert(name.to_ascii_lowercase(), expansion.to_string());
    }

    /// Get all aliases.
    pub fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    /// Parse and execute a command line.
    ///
    /// Command names are case-insensitive. `help` and `options` are
    /// answered by the registry itself.
    pub fn execute(&self, line: &str, ctx: &mut C) -> Result<CommandOutput> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(CommandOutput::None);
        }

        let tokens = self.expand_alias(tokenize(trimmed)?);
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(CommandOutput::None);
        };
        let name_lower = name.to_ascii_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        log::debug!("dispatch {name_lower} {args:?}");

        match name_lower.as_str() {
            "help" => return self.execute_help(&args),
            "options" => return Ok(CommandOutput::Text(self.options_text())),
            _ => {},
        }

        match self.commands.get(name_lower.as_str()) {
            Some(cmd) => cmd.execute(&args, ctx),
            None => Err(self.unknown_command(name)),
        }
    }

    fn unknown_command(&self, name: &str) -> BurrowError {
        let suggestions = if name.is_empty() {
            Vec::new()
        } else {
            self.completions(name)
        };
        if suggestions.is_empty() {
            BurrowError::Command(format!("unknown command: {name}"))
        } else {
            BurrowError::Command(format!(
                "unknown command: {name} (did you mean: {}?)",
                suggestions.join(", ")
            ))
        }
    }

    fn expand_alias(&self, mut tokens: Vec<String>) -> Vec<String> {
        let Some(first) = tokens.first() else {
            return tokens;
        };
        if let Some(expansion) = self.aliases.get(&first.to_ascii_lowercase()) {
            let expanded_tokens = match tokenize(expansion) {
                Ok(t) => t,
                Err(_) => return tokens,
            };
            tokens.splice(0..1, expanded_tokens);
        }
        tokens
    }

    // -- Intercepted commands --

    fn execute_help(&self, args: &[&str]) -> Result<CommandOutput> {
        if let Some(&name) = args.first() {
            let name_lower = name.to_ascii_lowercase();
            return match self.commands.get(name_lower.as_str()) {
                Some(cmd) => {
                    let mut out = cmd.name().to_string();
                    out.push_str(&format!(" ({})\n", cmd.category()));
                    out.push_str(&format!("  {}\n", cmd.description()));
                    out.push_str(&format!("  Usage: {}", cmd.usage()));
                    Ok(CommandOutput::Text(out))
                },
                None => Err(self.unknown_command(name)),
            };
        }

        // Group commands by category.
        let mut categories: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
        categories.entry("general").or_default().extend([
            ("help", "Show commands, or details for one command"),
            ("options", "Show the numbered options menu"),
        ]);
        for cmd in self.commands.values() {
            categories
                .entry(cmd.category())
                .or_default()
                .push((cmd.name(), cmd.description()));
        }

        let mut cats: Vec<&str> = categories.keys().copied().collect();
        cats.sort_unstable();

        let total: usize = categories.values().map(Vec::len).sum();
        let mut out = format!("Commands ({total}):\n");
        for cat in cats {
            let mut cmds = categories.remove(cat).unwrap_or_default();
            cmds.sort_by_key(|(name, _)| *name);
            out.push_str(&format!("\n  [{cat}]\n"));
            for (name, desc) in &cmds {
                out.push_str(&format!("    {name:12} {desc}\n"));
            }
        }
        out.push_str(NAVIGATION_HELP);
        out.push_str("\nType 'help <command>' for details.");
        Ok(CommandOutput::Text(out))
    }

    /// The numbered options menu: every alias, in numeric order where the
    /// alias is a number.
    pub fn options_text(&self) -> String {
        let mut entries: Vec<(&String, &String)> = self.aliases.iter().collect();
        entries.sort_by(|(a, _), (b, _)| match (a.parse::<u32>(), b.parse::<u32>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        });

        let mut out = String::from("Options:");
        for (key, expansion) in entries {
            let target = expansion.split_whitespace().next().unwrap_or_default();
            let desc = self
                .commands
                .get(target)
                .map_or(expansion.as_str(), |c| c.description());
            out.push_str(&format!("\n{key}. {desc}"));
        }
        out
    }

    /// Return completions for a partial command name.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let lower = partial.to_ascii_lowercase();
        let mut names: Vec<String> = self
            .commands
            .keys()
            .filter(|name| name.starts_with(&lower))
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

const NAVIGATION_HELP: &str = "
  [while browsing]
    <number>     Open the menu entry with that number
    b            Go back to the previous server
    f            Go forward again after going back
    q            Quit
";

// ---------------------------------------------------------------------------
// Tokenizer: handles single quotes, double quotes, and backslash escapes.
// ---------------------------------------------------------------------------

/// Tokenize a command line respecting quotes and backslash escapes.
///
/// - Single-quoted strings preserve all characters literally.
/// - Double-quoted strings honour `\"` and `\\`.
/// - Backslash escapes the next character outside of quotes.
///
/// An empty quoted string (`""`) is kept as an empty token, so a root
/// selector can be typed explicitly.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = input.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch);
            }
        } else if in_double {
            match ch {
                '"' => in_double = false,
                '\\' => match chars.peek() {
                    Some(&next) if next == '"' || next == '\\' => {
                        chars.next();
                        current.push(next);
                    },
                    _ => current.push('\\'),
                },
                _ => current.push(ch),
            }
        } else {
            match ch {
                '\'' => {
                    in_single = true;
                    quoted = true;
                },
                '"' => {
                    in_double = true;
                    quoted = true;
                },
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                },
                c if c.is_whitespace() => {
                    if !current.is_empty() || quoted {
                        tokens.push(std::mem::take(&mut current));
                        quoted = false;
                    }
                },
                _ => current.push(ch),
            }
        }
    }

    if in_single {
        return Err(BurrowError::Command("unterminated single quote".to_string()));
    }
    if in_double {
        return Err(BurrowError::Command("unterminated double quote".to_string()));
    }

    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    Ok(tokens)
}
