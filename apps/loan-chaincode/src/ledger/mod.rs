// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Seam
//!
//! Chaincodes never own their state. Consensus, ordering and durability
//! belong to the ledger platform; a chaincode only sees the operations on
//! [`ChaincodeStub`] for the duration of one invocation.
//!
//! ## Backends
//!
//! - [`MockStub`] - in-memory world state with fault injection, for tests
//! - [`RedbLedger`] - persistent world state for the development harness
//!
//! Both answer rich queries with top-level equality selectors only
//! (see [`selector`]).

pub mod memory;
pub mod redb_ledger;
pub mod selector;

pub use memory::MockStub;
pub use redb_ledger::{RedbLedger, TxStub};
pub use selector::EqualitySelector;

/// Error surfaced by the ledger platform.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Creator identity bytes are not available for this invocation
    #[error("cannot get creator: {0}")]
    Creator(String),

    /// Rich query selector was rejected
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Backend read or write failed
    #[error("ledger backend error: {0}")]
    Backend(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// One entry delivered by a rich-query cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Server-side cursor over rich-query results.
///
/// Entries arrive in the platform's delivery order. The cursor holds
/// platform resources until [`close`](StateQueryIterator::close) is called.
pub trait StateQueryIterator: Iterator<Item = LedgerResult<KeyValue>> {
    fn close(&mut self) -> LedgerResult<()>;
}

/// Operations the ledger platform exposes to a running invocation.
///
/// All calls block until the platform answers.
pub trait ChaincodeStub {
    /// Raw serialized identity of the invoking client.
    fn get_creator(&self) -> LedgerResult<Vec<u8>>;

    /// Committed value at `key`, or `None` when the key is unset.
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Write `value` at `key` as part of this invocation's write set.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()>;

    /// Run a rich query and open a cursor over its results.
    fn get_query_result<'a>(&'a self, query: &str)
        -> LedgerResult<Box<dyn StateQueryIterator + 'a>>;
}
