// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Argument shape checks.

use crate::chaincode::ChaincodeError;

/// Number of arguments a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }

    pub fn check(&self, args: &[String]) -> Result<(), ChaincodeError> {
        if self.accepts(args.len()) {
            Ok(())
        } else {
            Err(ChaincodeError::ArgumentCount {
                expected: *self,
                actual: args.len(),
            })
        }
    }
}

/// Positional argument, or an argument-count error if it is missing.
pub fn arg(args: &[String], index: usize) -> Result<&str, ChaincodeError> {
    args.get(index)
        .map(String::as_str)
        .ok_or(ChaincodeError::ArgumentCount {
            expected: Arity::AtLeast(index + 1),
            actual: args.len(),
        })
}

/// Parse an integer argument; the error names `field`.
pub fn int_arg(args: &[String], index: usize, field: &'static str) -> Result<i64, ChaincodeError> {
    let value = arg(args, index)?;
    value.parse().map_err(|_| ChaincodeError::ArgumentType {
        field,
        value: value.to_string(),
    })
}
