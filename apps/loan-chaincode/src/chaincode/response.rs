// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Invocation response envelope.

use super::ChaincodeError;

/// Invocation succeeded.
pub const OK: i32 = 200;
/// Invocation was rejected before doing any work.
pub const FORBIDDEN: i32 = 403;
/// Invocation failed.
pub const ERROR: i32 = 500;

/// Outcome of one invocation as returned to the ledger platform.
///
/// Callers tell a rejection (403) from a failure (500) by `status` alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: FORBIDDEN,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OK
    }
}

impl From<ChaincodeError> for Response {
    fn from(err: ChaincodeError) -> Self {
        if err.is_rejection() {
            Response::rejected(err.to_string())
        } else {
            Response::error(err.to_string())
        }
    }
}
