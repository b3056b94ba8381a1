// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Invocation errors.
//!
//! Nothing here is retried or recovered: every error becomes the
//! invocation's response. Argument-count, unknown-function and forbidden
//! errors are rejections (403); everything else is a failure (500).

use crate::identity::IdentityError;
use crate::ledger::LedgerError;
use crate::policy::Arity;
use crate::records::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ChaincodeError {
    /// Caller identity could not be established
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Wrong number of arguments for the caller's schema
    #[error("incorrect number of arguments")]
    ArgumentCount { expected: Arity, actual: usize },

    /// A numeric argument is not an integer
    #[error("invalid {field}: expecting an integer value, got {value:?}")]
    ArgumentType { field: &'static str, value: String },

    /// Status update targets a key with no loan record
    #[error("cannot get loan record at {key}")]
    RecordNotFound { key: String },

    /// Stored bytes do not match the record schema
    #[error("cannot decode record at {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Ledger get/put/query failed
    #[error("ledger call failed: {0}")]
    Store(#[from] LedgerError),

    /// Function name is not part of this chaincode
    #[error("unknown function name")]
    UnknownFunction(String),

    /// Caller's organization has no rule for this function
    #[error("organization {organization:?} may not call {function}")]
    Forbidden {
        organization: String,
        function: String,
    },
}

impl ChaincodeError {
    /// Whether this error rejects the invocation (403) rather than failing it.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ChaincodeError::ArgumentCount { .. }
                | ChaincodeError::UnknownFunction(_)
                | ChaincodeError::Forbidden { .. }
        )
    }

    /// Response status this error maps to.
    pub fn status(&self) -> i32 {
        if self.is_rejection() {
            super::response::FORBIDDEN
        } else {
            super::response::ERROR
        }
    }
}

impl From<StoreError> for ChaincodeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => ChaincodeError::RecordNotFound { key },
            StoreError::Serialization { key, source } => {
                ChaincodeError::Serialization { key, source }
            }
            StoreError::Ledger(e) => ChaincodeError::Store(e),
        }
    }
}
