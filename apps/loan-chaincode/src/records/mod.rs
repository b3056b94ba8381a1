// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Records
//!
//! Record schemas and typed access to the world state.
//!
//! Both record kinds live in the same flat key space under composite keys of
//! the form `ssn@vin`. Nothing tags a value with its schema, so a dealer and a
//! banker deployed on one ledger can claim the same key; reading a record
//! through the wrong schema fails with a serialization error.

pub mod key;
pub mod loan;
pub mod negotiation;
pub mod store;

pub use key::CompositeKey;
pub use loan::{LoanRecord, STATUS_APPLIED};
pub use negotiation::NegotiationRecord;
pub use store::{RecordStore, StoreError};
