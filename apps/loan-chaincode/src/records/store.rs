// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed record access over a [`ChaincodeStub`].
//!
//! There is no optimistic concurrency check here: the last write at a key
//! within a committed transaction wins, and conflicts are the ledger
//! platform's business.

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::ledger::{ChaincodeStub, LedgerError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No value at the key
    #[error("record not found: {0}")]
    NotFound(String),

    /// Value could not be (de)serialized with the record schema
    #[error("malformed record at {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Underlying ledger call failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Record access for one invocation.
pub struct RecordStore<'a> {
    stub: &'a mut dyn ChaincodeStub,
}

impl<'a> RecordStore<'a> {
    pub fn new(stub: &'a mut dyn ChaincodeStub) -> Self {
        Self { stub }
    }

    /// Stored bytes at `key`, untouched.
    pub fn get_raw(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.stub.get_state(key)?)
    }

    /// Deserialize the record at `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<T> {
        let bytes = self
            .get_raw(key)?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })
    }

    /// Serialize `record` and write it at `key`, replacing any prior value.
    pub fn put<T: Serialize>(&mut self, key: &str, record: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec(record).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;

        debug!(key, record = %String::from_utf8_lossy(&bytes), "writing record");
        self.stub.put_state(key, bytes)?;
        Ok(())
    }
}
