// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Loan application records.

use serde::{Deserialize, Serialize};

/// Status every new application starts in.
pub const STATUS_APPLIED: &str = "Applied";

/// A loan application, keyed by `ssn@vin`.
///
/// Submitted by dmv callers; bankers only ever change `status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanRecord {
    #[serde(rename = "loanId")]
    pub loan_id: String,
    pub vin: String,
    pub amount: i64,
    #[serde(rename = "ssnNumber")]
    pub ssn: String,
    #[serde(rename = "loanPeriod")]
    pub loan_period: i64,
    pub apr: i64,
    #[serde(rename = "monthlyPayment")]
    pub monthly_payment: i64,
    /// `Applied` on submission, then whatever the banker sets.
    pub status: String,
    pub org: String,
}

impl LoanRecord {
    /// Same record with a new status; every other field is kept.
    pub fn with_status(self, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..self
        }
    }
}
