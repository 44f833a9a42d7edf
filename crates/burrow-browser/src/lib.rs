//! Gopher browsing engine.
//!
//! This crate ties the transport from `burrow-net` to everything above it:
//! the menu-versus-content classifier, the menu parser, the bounded
//! navigation history, crash-safe JSON persistence for bookmarks, history
//! and the saved session, and the [`Session`] state machine that drives a
//! navigation through a [`Renderer`]. [`GopherClient`] bundles all of it
//! into the context the terminal commands run against.

pub mod bookmarks;
pub mod client;
pub mod commands;
pub mod config;
pub mod engine;
pub mod gopher;
pub mod history;
pub mod render;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use bookmarks::{Bookmark, BookmarkStore};
pub use client::GopherClient;
pub use commands::register_browser_commands;
pub use config::{SessionRecord, Settings};
pub use engine::{NavState, Session};
pub use gopher::{ItemType, MenuEntry, ResponseKind, classify, parse_menu};
pub use history::{HistorySnapshot, HistoryStack};
pub use render::{Choice, Renderer, menu_lines};
