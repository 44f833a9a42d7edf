//! Bookmark store persisted as a JSON array.

use std::path::{Path, PathBuf};

use burrow_types::address::Address;
use burrow_types::error::{BurrowError, Result};
use serde::{Deserialize, Serialize};

use crate::store;

/// A saved selector.
///
/// Bookmarks without a host or port point at the server the session is
/// currently using.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub title: String,
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Bookmark {
    pub fn new(title: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            selector: selector.into(),
            host: None,
            port: None,
        }
    }

    /// Pin the bookmark to a specific server.
    pub fn on_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = Some(host.into());
        self.port = Some(port);
        self
    }

    /// Where the bookmark points, given the session's current server.
    pub fn address(&self, current: &Address) -> Address {
        Address::new(
            self.host.clone().unwrap_or_else(|| current.host.clone()),
            self.port.unwrap_or(current.port),
            self.selector.clone(),
        )
    }
}

/// Bookmarks backed by a JSON file. Every change is written through.
#[derive(Debug)]
pub struct BookmarkStore {
    path: PathBuf,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bookmarks = store::load_json(&path)?.unwrap_or_default();
        Ok(Self { path, bookmarks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn get(&self, index: usize) -> Option<&Bookmark> {
        self.bookmarks.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Add a bookmark. A bookmark with the same selector is rejected.
    pub fn add(&mut self, bookmark: Bookmark) -> Result<()> {
        if self.bookmarks.iter().any(|b| b.selector == bookmark.selector) {
            return Err(BurrowError::Command(format!(
                "'{}' is already bookmarked.",
                bookmark.title
            )));
        }
        self.bookmarks.push(bookmark);
        self.save_or_rollback(|bookmarks| {
            bookmarks.pop();
        })
    }

    /// Remove the bookmark at `index` and return it.
    pub fn remove(&mut self, index: usize) -> Result<Bookmark> {
        if index >= self.bookmarks.len() {
            return Err(invalid_index());
        }
        let removed = self.bookmarks.remove(index);
        let restore = removed.clone();
        self.save_or_rollback(move |bookmarks| bookmarks.insert(index, restore))?;
        Ok(removed)
    }

    /// Change the title and/or selector of the bookmark at `index`.
    pub fn update(
        &mut self,
        index: usize,
        title: Option<&str>,
        selector: Option<&str>,
    ) -> Result<&Bookmark> {
        let previous = self.bookmarks.get(index).cloned().ok_or_else(invalid_index)?;
        {
            let bookmark = &mut self.bookmarks[index];
            if let Some(title) = title.filter(|t| !t.is_empty()) {
                bookmark.title = title.to_string();
            }
            if let Some(selector) = selector.filter(|s| !s.is_empty()) {
                bookmark.selector = selector.to_string();
            }
        }
        self.save_or_rollback(move |bookmarks| bookmarks[index] = previous)?;
        Ok(&self.bookmarks[index])
    }

    /// Write the list; on failure undo the in-memory change so memory and
    /// disk stay in step.
    fn save_or_rollback(&mut self, undo: impl FnOnce(&mut Vec<Bookmark>)) -> Result<()> {
        if let Err(e) = store::save_json(&self.path, &self.bookmarks) {
            log::error!("failed to save bookmarks: {e}");
            undo(&mut self.bookmarks);
            return Err(e);
        }
        Ok(())
    }
}

fn invalid_index() -> BurrowError {
    BurrowError::Command("Invalid bookmark index.".to_string())
}
