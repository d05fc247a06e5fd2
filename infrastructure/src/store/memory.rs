//! In-memory list store.
//!
//! Mirrors the list semantics of a real key-value store so the log store
//! can run without a server (tests, local development, embedding).

use async_trait::async_trait;
use kvlog_application::{ListStore, StoreError};
use std::collections::{HashMap, VecDeque};
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

#[derive(Default)]
struct State {
    lists: HashMap<String, VecDeque<String>>,
    closed: bool,
}

/// In-memory implementation of [`ListStore`].
///
/// Clones share the same lists, like handles to one connection; closing
/// any handle closes them all.
#[derive(Clone, Default)]
pub struct InMemoryListStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a list.
    pub fn key_count(&self) -> usize {
        self.lock().map(|state| state.lists.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Connection("in-memory store poisoned".to_string()))
    }

    fn open(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        let state = self.lock()?;
        if state.closed {
            return Err(StoreError::Closed);
        }
        Ok(state)
    }
}

/// Resolve inclusive, possibly negative, indices against a list length.
///
/// Returns `None` when the range selects nothing.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<RangeInclusive<usize>> {
    let len = isize::try_from(len).ok()?;
    let start = if start < 0 { len + start } else { start }.max(0);
    let stop = if stop < 0 { len + stop } else { stop }.min(len - 1);
    if start > stop || start >= len {
        return None;
    }
    Some(start as usize..=stop as usize)
}

#[async_trait]
impl ListStore for InMemoryListStore {
    async fn push_head(&self, key: &str, value: &str) -> Result<usize, StoreError> {
        let mut state = self.open()?;
        let list = state.lists.entry(key.to_string()).or_default();
        list.push_front(value.to_string());
        trace!(key, length = list.len(), "lpush");
        Ok(list.len())
    }

    async fn trim(&self, key: &str, start: isize, stop: isize) -> Result<(), StoreError> {
        let mut state = self.open()?;
        let Some(list) = state.lists.get_mut(key) else {
            return Ok(());
        };
        match resolve_range(list.len(), start, stop) {
            Some(range) => {
                let kept: VecDeque<String> = list.drain(range).collect();
                *list = kept;
            }
            None => list.clear(),
        }
        // Empty lists do not exist as keys.
        if list.is_empty() {
            state.lists.remove(key);
        }
        Ok(())
    }

    async fn range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StoreError> {
        let state = self.open()?;
        let Some(list) = state.lists.get(key) else {
            return Ok(Vec::new());
        };
        Ok(resolve_range(list.len(), start, stop)
            .map(|range| list.range(range).cloned().collect())
            .unwrap_or_default())
    }

    async fn flush_all(&self) -> Result<bool, StoreError> {
        let mut state = self.open()?;
        state.lists.clear();
        Ok(true)
    }

    async fn close(&self) -> Result<bool, StoreError> {
        let mut state = self.open()?;
        state.closed = true;
        Ok(true)
    }
}
