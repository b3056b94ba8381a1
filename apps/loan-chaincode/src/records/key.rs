// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Composite ledger keys.

/// Separator between the two halves of a composite key.
pub const KEY_SEPARATOR: char = '@';

/// Key formed from two identifiers, rendered as `first@second`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn new(first: &str, second: &str) -> Self {
        CompositeKey(format!("{first}{KEY_SEPARATOR}{second}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompositeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CompositeKey> for String {
    fn from(value: CompositeKey) -> Self {
        value.0
    }
}
