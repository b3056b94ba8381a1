// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Negotiated vehicle price records.

use serde::{Deserialize, Serialize};

/// Final price a buyer negotiated for a vehicle, keyed by `ssn@vin`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NegotiationRecord {
    pub ssn: String,
    pub vin: String,
    #[serde(rename = "price")]
    pub final_price: i64,
    pub org: String,
}
