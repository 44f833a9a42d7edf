//! Navigation history: a bounded backward stack and a forward stack.

use std::path::{Path, PathBuf};

use burrow_types::address::Address;
use burrow_types::error::Result;
use serde::{Deserialize, Serialize};

use crate::store;

/// Default bound on the backward stack.
pub const DEFAULT_MAX_HISTORY: usize = 5;

/// Persisted form of a [`HistoryStack`]. Both lists are oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    #[serde(default)]
    pub backward: Vec<Address>,
    #[serde(default)]
    pub forward: Vec<Address>,
}

/// Browser-style back/forward history.
///
/// The top of `backward` is the most recently recorded address. `forward`
/// only holds entries between a "back" step and the next new navigation.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    backward: Vec<Address>,
    forward: Vec<Address>,
    max_len: usize,
    store: Option<PathBuf>,
}

impl HistoryStack {
    /// An in-memory history bounded to `max_len` backward entries.
    pub fn new(max_len: usize) -> Self {
        Self {
            backward: Vec::new(),
            forward: Vec::new(),
            max_len: max_len.max(1),
            store: None,
        }
    }

    /// A history persisted to `path`.
    pub fn with_store(max_len: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            store: Some(path.into()),
            ..Self::new(max_len)
        }
    }

    /// Record a newly visited address.
    ///
    /// Returns `false` when `address` is already the top entry, in which case
    /// nothing changes. Otherwise the forward stack is cleared and the oldest
    /// entry is evicted if the bound is exceeded.
    pub fn push(&mut self, address: Address) -> bool {
        if self.backward.last() == Some(&address) {
            log::debug!("{address} already on top of history, not adding");
            return false;
        }
        self.push_bounded(address);
        self.forward.clear();
        log::debug!("history after push: {:?}", self.backward);
        true
    }

    /// Step back.
    ///
    /// Moves the top entry onto the forward stack and returns the entry now
    /// on top, i.e. where to go. Returns `None` both when there was nothing
    /// to pop and when the popped entry was the only one.
    pub fn go_back(&mut self) -> Option<Address> {
        let current = self.backward.pop()?;
        self.forward.push(current);
        log::debug!("history after going back: {:?}", self.backward);
        self.backward.last().cloned()
    }

    /// Step forward: move the most recent forward entry back onto the
    /// backward stack and return it. The new state is persisted right away.
    pub fn go_forward(&mut self) -> Option<Address> {
        let next = self.forward.pop()?;
        self.push_bounded(next.clone());
        if let Err(e) = self.persist() {
            log::error!("failed to save history: {e}");
        }
        Some(next)
    }

    /// The most recently recorded address.
    pub fn current(&self) -> Option<&Address> {
        self.backward.last()
    }

    /// Backward entries, oldest first.
    pub fn backward(&self) -> &[Address] {
        &self.backward
    }

    /// Forward entries; the next `go_forward` target is last.
    pub fn forward(&self) -> &[Address] {
        &self.forward
    }

    pub fn can_go_back(&self) -> bool {
        !self.backward.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            backward: self.backward.clone(),
            forward: self.forward.clone(),
        }
    }

    /// Replace both stacks, keeping only the newest `max_len` backward
    /// entries.
    pub fn replace(&mut self, snapshot: HistorySnapshot) {
        let HistorySnapshot { backward, forward } = snapshot;
        let skip = backward.len().saturating_sub(self.max_len);
        self.backward = backward.into_iter().skip(skip).collect();
        self.forward = forward;
    }

    /// Write both stacks to the backing file. Without a backing file this
    /// does nothing.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.store else {
            return Ok(());
        };
        store::save_json(path, &self.snapshot())?;
        log::debug!("history saved to {}", path.display());
        Ok(())
    }

    /// Load both stacks from the backing file.
    ///
    /// Returns `false` if there is no backing file or it does not exist yet;
    /// the stacks are left unchanged in that case.
    pub fn restore(&mut self) -> Result<bool> {
        let Some(path) = &self.store else {
            return Ok(false);
        };
        match store::load_json::<HistorySnapshot>(path)? {
            Some(snapshot) => {
                self.replace(snapshot);
                Ok(true)
            },
            None => Ok(false),
        }
    }

    fn push_bounded(&mut self, address: Address) {
        if self.backward.len() >= self.max_len {
            self.backward.remove(0);
        }
        self.backward.push(address);
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(host: &str) -> Address {
        Address::root(host, 70)
    }

    #[test]
    fn push_records_in_order() {
        let mut h = HistoryStack::default();
        assert!(h.push(addr("a")));
        assert!(h.push(addr("b")));
        assert_eq!(h.backward(), &[addr("a"), addr("b")]);
        assert_eq!(h.current(), Some(&addr("b")));
    }

    #[test]
    fn duplicate_consecutive_push_is_ignored() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        assert!(!h.push(addr("a")));
        assert_eq!(h.backward().len(), 1);
    }

    #[test]
    fn non_consecutive_duplicates_are_kept() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        h.push(addr("b"));
        h.push(addr("a"));
        assert_eq!(h.backward().len(), 3);
    }

    #[test]
    fn oldest_entry_is_evicted_past_the_bound() {
        let mut h = HistoryStack::new(3);
        for host in ["a", "b", "c", "d"] {
            h.push(addr(host));
        }
        assert_eq!(h.backward(), &[addr("b"), addr("c"), addr("d")]);
    }

    #[test]
    fn go_back_on_empty_history() {
        let mut h = HistoryStack::default();
        assert_eq!(h.go_back(), None);
        assert!(!h.can_go_forward());
    }

    #[test]
    fn go_back_from_single_entry_pops_but_returns_none() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        assert_eq!(h.go_back(), None);
        assert!(h.backward().is_empty());
        assert_eq!(h.forward(), &[addr("a")]);
    }

    #[test]
    fn go_back_returns_previous_entry() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        h.push(addr("b"));
        assert_eq!(h.go_back(), Some(addr("a")));
        assert_eq!(h.forward(), &[addr("b")]);
    }

    #[test]
    fn go_forward_after_go_back() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        h.push(addr("b"));
        h.go_back();
        assert_eq!(h.go_forward(), Some(addr("b")));
        assert_eq!(h.backward(), &[addr("a"), addr("b")]);
        assert!(!h.can_go_forward());
    }

    #[test]
    fn go_forward_on_empty_forward_stack() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        assert_eq!(h.go_forward(), None);
    }

    #[test]
    fn new_push_clears_forward_stack() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        h.push(addr("b"));
        h.go_back();
        assert!(h.can_go_forward());
        h.push(addr("c"));
        assert!(!h.can_go_forward());
    }

    #[test]
    fn duplicate_push_keeps_forward_stack() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        h.push(addr("b"));
        h.go_back();
        h.push(addr("a"));
        assert_eq!(h.forward(), &[addr("b")]);
    }

    #[test]
    fn replace_trims_to_bound() {
        let mut h = HistoryStack::new(2);
        h.replace(HistorySnapshot {
            backward: vec![addr("a"), addr("b"), addr("c")],
            forward: vec![addr("z")],
        });
        assert_eq!(h.backward(), &[addr("b"), addr("c")]);
        assert_eq!(h.forward(), &[addr("z")]);
    }

    #[test]
    fn persisted_record_has_host_and_port_only() {
        let mut h = HistoryStack::default();
        h.push(addr("a"));
        let json = serde_json::to_string(&h.snapshot()).unwrap();
        assert_eq!(json, r#"{"backward":[{"host":"a","port":70}],"forward":[]}"#);
    }

    #[test]
    fn persist_and_restore_on_fresh_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navigation_history.json");

        let mut h = HistoryStack::with_store(5, &path);
        h.push(addr("a"));
        h.push(addr("b"));
        h.push(addr("c"));
        h.go_back();
        h.persist().unwrap();

        let mut fresh = HistoryStack::with_store(5, &path);
        assert!(fresh.restore().unwrap());
        assert_eq!(fresh.backward(), h.backward());
        assert_eq!(fresh.forward(), h.forward());
    }

    #[test]
    fn restore_without_file_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = HistoryStack::with_store(5, dir.path().join("missing.json"));
        h.push(addr("a"));
        assert!(!h.restore().unwrap());
        assert_eq!(h.backward(), &[addr("a")]);
    }

    #[test]
    fn go_forward_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navigation_history.json");

        let mut h = HistoryStack::with_store(5, &path);
        h.push(addr("a"));
        h.push(addr("b"));
        h.go_back();
        assert!(!path.exists());

        h.go_forward();
        let saved: HistorySnapshot = store::load_json(&path).unwrap().unwrap();
        assert_eq!(saved.backward, vec![addr("a"), addr("b")]);
        assert!(saved.forward.is_empty());
    }

    #[test]
    fn in_memory_history_persist_is_noop() {
        let h = HistoryStack::default();
        assert!(h.persist().is_ok());
        assert!(h.store_path().is_none());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn arb_address() -> impl Strategy<Value = Address> {
            ("[a-e]", 70u16..73).prop_map(|(host, port)| Address::root(host, port))
        }

        fn arb_addresses(max: usize) -> impl Strategy<Value = Vec<Address>> {
            proptest::collection::vec(arb_address(), 0..max)
        }

        proptest! {
            #[test]
            fn backward_never_exceeds_bound(addrs in arb_addresses(40), bound in 1usize..8) {
                let mut h = HistoryStack::new(bound);
                for a in addrs {
                    h.push(a);
                    prop_assert!(h.backward().len() <= bound);
                }
            }

            #[test]
            fn eviction_keeps_newest_entries(count in 1usize..30, bound in 1usize..8) {
                let mut h = HistoryStack::new(bound);
                let addrs: Vec<Address> =
                    (0..count).map(|i| Address::root(format!("h{i}"), 70)).collect();
                for a in &addrs {
                    h.push(a.clone());
                }
                let keep = count.min(bound);
                prop_assert_eq!(h.backward(), &addrs[count - keep..]);
            }

            #[test]
            fn repeated_push_is_idempotent(addrs in arb_addresses(20), extra in arb_address()) {
                let mut h = HistoryStack::default();
                for a in addrs {
                    h.push(a);
                }
                h.push(extra.clone());
                let len = h.backward().len();
                h.push(extra);
                prop_assert_eq!(h.backward().len(), len);
            }

            #[test]
            fn back_then_forward_round_trips(addrs in arb_addresses(20)) {
                let mut h = HistoryStack::default();
                for a in addrs {
                    h.push(a);
                }
                prop_assume!(h.can_go_back());
                let before = h.backward().to_vec();
                h.go_back();
                h.go_forward();
                prop_assert_eq!(h.backward(), before.as_slice());
            }

            #[test]
            fn forward_is_empty_after_any_new_push(addrs in arb_addresses(20), backs in 0usize..5) {
                let mut h = HistoryStack::default();
                for a in addrs {
                    h.push(a);
                }
                for _ in 0..backs {
                    h.go_back();
                }
                if h.push(Address::root("fresh-host", 70)) {
                    prop_assert!(!h.can_go_forward());
                }
            }
        }
    }
}
