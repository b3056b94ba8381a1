// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory world state.
//!
//! [`MockStub`] keeps state in a `BTreeMap`, so rich queries deliver entries
//! in key order. Faults can be injected per key (reads), globally (writes)
//! or mid-cursor, and open cursors are counted so tests can assert that
//! every cursor is released.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{
    ChaincodeStub, EqualitySelector, KeyValue, LedgerError, LedgerResult, StateQueryIterator,
};

/// Cursor over a pre-computed result set.
pub struct BufferedCursor {
    entries: std::vec::IntoIter<KeyValue>,
    fail_after: Option<usize>,
    delivered: usize,
    open: Option<Arc<AtomicUsize>>,
}

impl BufferedCursor {
    pub fn new(entries: Vec<KeyValue>) -> Self {
        Self {
            entries: entries.into_iter(),
            fail_after: None,
            delivered: 0,
            open: None,
        }
    }

    fn tracked(mut self, open: Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        self.open = Some(open);
        self
    }

    fn failing_after(mut self, n: Option<usize>) -> Self {
        self.fail_after = n;
        self
    }
}

impl Iterator for BufferedCursor {
    type Item = LedgerResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fail_after == Some(self.delivered) {
            self.fail_after = None;
            return Some(Err(LedgerError::Backend("injected cursor failure".to_string())));
        }
        let entry = self.entries.next()?;
        self.delivered += 1;
        Some(Ok(entry))
    }
}

impl StateQueryIterator for BufferedCursor {
    fn close(&mut self) -> LedgerResult<()> {
        if let Some(open) = self.open.take() {
            open.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// In-memory [`ChaincodeStub`] for tests and embedding.
#[derive(Debug, Default)]
pub struct MockStub {
    state: BTreeMap<String, Vec<u8>>,
    creator: Option<Vec<u8>>,
    failing_reads: HashSet<String>,
    failing_writes: bool,
    cursor_fail_after: Option<usize>,
    open_cursors: Arc<AtomicUsize>,
    puts: usize,
}

impl MockStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub whose invocations are made by the holder of `creator`.
    pub fn with_creator(creator: impl Into<Vec<u8>>) -> Self {
        Self {
            creator: Some(creator.into()),
            ..Self::default()
        }
    }

    /// Switch the invoking identity, keeping the world state.
    pub fn set_creator(&mut self, creator: impl Into<Vec<u8>>) {
        self.creator = Some(creator.into());
    }

    /// Remove the invoking identity; `get_creator` fails afterwards.
    pub fn clear_creator(&mut self) {
        self.creator = None;
    }

    /// Seed a value without counting it as an invocation write.
    pub fn seed(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.state.insert(key.into(), value.into());
    }

    pub fn state(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    pub fn fail_reads_at(&mut self, key: impl Into<String>) {
        self.failing_reads.insert(key.into());
    }

    pub fn fail_writes(&mut self) {
        self.failing_writes = true;
    }

    /// Cursors opened from now on fail after delivering `n` entries.
    pub fn fail_cursors_after(&mut self, n: usize) {
        self.cursor_fail_after = Some(n);
    }

    /// Number of `put_state` calls that reached the world state.
    pub fn put_count(&self) -> usize {
        self.puts
    }

    /// Cursors opened but not yet closed.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

impl ChaincodeStub for MockStub {
    fn get_creator(&self) -> LedgerResult<Vec<u8>> {
        self.creator
            .clone()
            .ok_or_else(|| LedgerError::Creator("no creator set".to_string()))
    }

    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        if self.failing_reads.contains(key) {
            return Err(LedgerError::Backend(format!("injected read failure at {key}")));
        }
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        if self.failing_writes {
            return Err(LedgerError::Backend(format!("injected write failure at {key}")));
        }
        self.state.insert(key.to_string(), value);
        self.puts += 1;
        Ok(())
    }

    fn get_query_result<'a>(
        &'a self,
        query: &str,
    ) -> LedgerResult<Box<dyn StateQueryIterator + 'a>> {
        let selector = EqualitySelector::parse(query)?;
        let entries = self
            .state
            .iter()
            .filter(|(_, value)| selector.matches(value))
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        let cursor = BufferedCursor::new(entries)
            .failing_after(self.cursor_fail_after)
            .tracked(Arc::clone(&self.open_cursors));
        Ok(Box::new(cursor))
    }
}
