// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistent world state backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `world_state`: ledger key → serialized record (JSON bytes)
//!
//! ## Invocation Model
//!
//! [`RedbLedger::transaction`] opens a [`TxStub`] for one invocation. Reads
//! see committed state only; writes are buffered in the stub's write set and
//! reach the database in a single redb write transaction on
//! [`TxStub::commit`]. Dropping a stub without committing discards its writes.

use std::collections::BTreeMap;
use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use tracing::debug;

use super::memory::BufferedCursor;
use super::{
    ChaincodeStub, EqualitySelector, KeyValue, LedgerError, LedgerResult, StateQueryIterator,
};

/// World state table: key → value bytes.
const WORLD_STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("world_state");

#[derive(Debug, thiserror::Error)]
pub enum RedbLedgerError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RedbLedgerError> for LedgerError {
    fn from(e: RedbLedgerError) -> Self {
        LedgerError::Backend(e.to_string())
    }
}

pub type RedbLedgerResult<T> = Result<T, RedbLedgerError>;

/// World state database shared by all invocations of the harness.
pub struct RedbLedger {
    db: Database,
}

impl RedbLedger {
    /// Open (or create) the world state at `path`.
    pub fn open(path: &Path) -> RedbLedgerResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create the table so read transactions never hit a missing table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WORLD_STATE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Start an invocation made by the holder of `creator`.
    pub fn transaction(&self, creator: Vec<u8>) -> TxStub<'_> {
        TxStub {
            ledger: self,
            creator,
            writes: BTreeMap::new(),
        }
    }

    /// Verify the database answers a read transaction.
    pub fn health_check(&self) -> RedbLedgerResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(WORLD_STATE)?;
        Ok(())
    }

    /// Committed value at `key`.
    pub fn get(&self, key: &str) -> RedbLedgerResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WORLD_STATE)?;
        Ok(table.get(key)?.map(|value| value.value().to_vec()))
    }

    /// Committed entries matching `selector`, in key order.
    fn select(&self, selector: &EqualitySelector) -> RedbLedgerResult<Vec<KeyValue>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WORLD_STATE)?;

        let mut entries = Vec::new();
        for item in table.iter()? {
            let (key, value) = item?;
            if selector.matches(value.value()) {
                entries.push(KeyValue {
                    key: key.value().to_string(),
                    value: value.value().to_vec(),
                });
            }
        }
        Ok(entries)
    }

    fn apply(&self, writes: &BTreeMap<String, Vec<u8>>) -> RedbLedgerResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(WORLD_STATE)?;
            for (key, value) in writes {
                table.insert(key.as_str(), value.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

/// Stub for a single invocation against a [`RedbLedger`].
pub struct TxStub<'a> {
    ledger: &'a RedbLedger,
    creator: Vec<u8>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl TxStub<'_> {
    /// Keys written so far, in key order.
    pub fn write_set(&self) -> impl Iterator<Item = &str> {
        self.writes.keys().map(String::as_str)
    }

    /// Apply the write set atomically. Returns the number of keys written.
    pub fn commit(self) -> RedbLedgerResult<usize> {
        if self.writes.is_empty() {
            return Ok(0);
        }
        self.ledger.apply(&self.writes)?;
        debug!(keys = self.writes.len(), "committed write set");
        Ok(self.writes.len())
    }
}

impl ChaincodeStub for TxStub<'_> {
    fn get_creator(&self) -> LedgerResult<Vec<u8>> {
        Ok(self.creator.clone())
    }

    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self.ledger.get(key)?)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_query_result<'a>(
        &'a self,
        query: &str,
    ) -> LedgerResult<Box<dyn StateQueryIterator + 'a>> {
        let selector = EqualitySelector::parse(query)?;
        let entries = self.ledger.select(&selector)?;
        Ok(Box::new(BufferedCursor::new(entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ledger() -> (tempfile::TempDir, RedbLedger) {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = RedbLedger::open(&dir.path().join("state/ledger.redb")).expect("open");
        (dir, ledger)
    }

    #[test]
    fn writes_are_invisible_until_commit() {
        let (_dir, ledger) = test_ledger();

        let mut stub = ledger.transaction(Vec::new());
        stub.put_state("a@b", b"{\"price\":1}".to_vec()).unwrap();
        assert_eq!(stub.get_state("a@b").unwrap(), None);
        assert_eq!(stub.write_set().collect::<Vec<_>>(), vec!["a@b"]);

        assert_eq!(stub.commit().unwrap(), 1);
        assert_eq!(ledger.get("a@b").unwrap(), Some(b"{\"price\":1}".to_vec()));
    }

    #[test]
    fn dropped_stub_discards_writes() {
        let (_dir, ledger) = test_ledger();

        {
            let mut stub = ledger.transaction(Vec::new());
            stub.put_state("k", b"v".to_vec()).unwrap();
        }

        assert_eq!(ledger.get("k").unwrap(), None);
    }

    #[test]
    fn query_filters_committed_state_in_key_order() {
        let (_dir, ledger) = test_ledger();

        let mut stub = ledger.transaction(Vec::new());
        stub.put_state("c", br#"{"price":100}"#.to_vec()).unwrap();
        stub.put_state("a", br#"{"price":100}"#.to_vec()).unwrap();
        stub.put_state("b", br#"{"price":200}"#.to_vec()).unwrap();
        stub.commit().unwrap();

        let stub = ledger.transaction(Vec::new());
        let keys: Vec<String> = stub
            .get_query_result(r#"{"selector":{"price":100}}"#)
            .unwrap()
            .map(|kv| kv.unwrap().key)
            .collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn creator_is_passed_through() {
        let (_dir, ledger) = test_ledger();
        let stub = ledger.transaction(b"creator".to_vec());
        assert_eq!(stub.get_creator().unwrap(), b"creator".to_vec());
    }

    #[test]
    fn reopening_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.redb");

        {
            let ledger = RedbLedger::open(&path).unwrap();
            let mut stub = ledger.transaction(Vec::new());
            stub.put_state("k", b"v".to_vec()).unwrap();
            stub.commit().unwrap();
        }

        let ledger = RedbLedger::open(&path).unwrap();
        ledger.health_check().unwrap();
        assert_eq!(ledger.get("k").unwrap(), Some(b"v".to_vec()));
    }
}
