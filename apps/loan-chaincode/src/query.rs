// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Rich queries over negotiation records.
//!
//! Results are rendered as a JSON array of `{"Key": ..., "Record": ...}`
//! objects in the cursor's delivery order. Stored records are embedded as-is.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::ledger::{ChaincodeStub, KeyValue, LedgerResult, StateQueryIterator};

/// Selector matching records whose `price` equals `price` exactly.
pub fn price_selector(price: i64) -> String {
    json!({ "selector": { "price": price } }).to_string()
}

/// Single-pass view over a rich-query cursor.
///
/// The cursor is closed exactly once: when it is exhausted, when it yields
/// an error, or when the view is dropped.
pub struct QueryResults<'a> {
    cursor: Option<Box<dyn StateQueryIterator + 'a>>,
}

impl<'a> QueryResults<'a> {
    pub fn open(stub: &'a dyn ChaincodeStub, query: &str) -> LedgerResult<Self> {
        let cursor = stub.get_query_result(query)?;
        Ok(Self {
            cursor: Some(cursor),
        })
    }

    fn release(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            if let Err(e) = cursor.close() {
                warn!(error = %e, "failed to close query cursor");
            }
        }
    }
}

impl Iterator for QueryResults<'_> {
    type Item = LedgerResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.cursor.as_mut()?.next();
        match next {
            Some(Ok(entry)) => Some(Ok(entry)),
            Some(Err(e)) => {
                self.release();
                Some(Err(e))
            }
            None => {
                self.release();
                None
            }
        }
    }
}

impl Drop for QueryResults<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Render query results as a JSON array, stopping at the first error.
pub fn render_records<I>(results: I) -> LedgerResult<Vec<u8>>
where
    I: IntoIterator<Item = LedgerResult<KeyValue>>,
{
    let mut buffer = Vec::from(&b"["[..]);

    for (i, entry) in results.into_iter().enumerate() {
        let KeyValue { key, value } = entry?;
        if i > 0 {
            buffer.push(b',');
        }
        buffer.extend_from_slice(b"{\"Key\":");
        buffer.extend_from_slice(Value::String(key).to_string().as_bytes());
        buffer.extend_from_slice(b",\"Record\":");
        buffer.extend_from_slice(&value);
        buffer.push(b'}');
    }

    buffer.push(b']');
    Ok(buffer)
}

/// Every negotiation record with exactly this price.
pub fn query_by_price(stub: &dyn ChaincodeStub, price: i64) -> LedgerResult<Vec<u8>> {
    let selector = price_selector(price);
    info!(%selector, "running rich query");

    let results = QueryResults::open(stub, &selector)?;
    let rendered = render_records(results)?;

    info!(result = %String::from_utf8_lossy(&rendered), "rich query complete");
    Ok(rendered)
}
