// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Top-level equality selectors for the local ledger backends.
//!
//! Only `{"selector": {"field": <value>, ...}}` is understood: a document
//! matches when every listed top-level field is present and equal. Operators
//! (`$gt`, `$or`, ...) are rejected.

use serde_json::{Map, Value};

use super::{LedgerError, LedgerResult};

#[derive(Debug, Clone, PartialEq)]
pub struct EqualitySelector {
    fields: Map<String, Value>,
}

impl EqualitySelector {
    pub fn parse(query: &str) -> LedgerResult<Self> {
        let value: Value = serde_json::from_str(query)
            .map_err(|e| LedgerError::InvalidQuery(e.to_string()))?;

        let Some(Value::Object(fields)) = value.get("selector").cloned() else {
            return Err(LedgerError::InvalidQuery(
                "query must contain a \"selector\" object".to_string(),
            ));
        };

        if let Some(op) = fields.keys().find(|k| k.starts_with('$')) {
            return Err(LedgerError::InvalidQuery(format!(
                "unsupported selector operator {op}"
            )));
        }

        Ok(Self { fields })
    }

    /// Whether a stored document satisfies the selector. Values that are not
    /// JSON objects never match.
    pub fn matches(&self, document: &[u8]) -> bool {
        let Ok(Value::Object(doc)) = serde_json::from_slice::<Value>(document) else {
            return false;
        };

        self.fields
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}
