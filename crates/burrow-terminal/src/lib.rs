//! Command interpreter.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name. The interpreter parses input
//! lines, expands aliases, resolves the command name, and dispatches
//! `execute()` against a caller-supplied context.

mod interpreter;

/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text or signals).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Quote-aware command line splitter.
pub use interpreter::tokenize;
