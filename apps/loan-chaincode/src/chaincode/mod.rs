// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Chaincode Modules
//!
//! - [`DealerChaincode`] - negotiated vehicle prices (`negotiate`, `query`,
//!   `qryNegotiate`)
//! - [`BankerChaincode`] - loan applications and their status (`loan`,
//!   `query`)
//!
//! Both follow the same path: the [`PolicyGate`] admits the invocation and
//! yields a [`Plan`], which is then run against the ledger. Each plan does at
//! most one `put_state`, so a failed invocation never leaves a partial write.

pub mod banker;
pub mod dealer;
pub mod error;
pub mod response;

pub use banker::{BankerChaincode, BANKER_POLICY};
pub use dealer::{DealerChaincode, DEALER_POLICY};
pub use error::ChaincodeError;
pub use response::Response;

use tracing::{debug, info, warn, Span};

use crate::ledger::ChaincodeStub;
use crate::policy::{Plan, PolicyGate};
use crate::query;
use crate::records::{LoanRecord, RecordStore, StoreError};

/// A chaincode hosted by the ledger platform.
pub trait Chaincode: Send + Sync {
    /// Module name the platform routes invocations by.
    fn name(&self) -> &'static str;

    /// Called once when the chaincode is instantiated.
    fn init(&self, stub: &mut dyn ChaincodeStub) -> Response;

    /// Run `function` with `args` on behalf of the stub's creator.
    fn invoke(&self, stub: &mut dyn ChaincodeStub, function: &str, args: &[String]) -> Response;
}

/// Admit, execute and convert to a response, inside `span`.
fn run_invocation(
    gate: &PolicyGate,
    span: &Span,
    stub: &mut dyn ChaincodeStub,
    function: &str,
    args: &[String],
) -> Response {
    let _entered = span.enter();
    debug!(function, args = args.len(), "invoke");

    let result = gate
        .admit(&*stub, function, args)
        .and_then(|plan| execute(plan, stub));

    match result {
        Ok(payload) => Response::success(payload),
        Err(e) if e.is_rejection() => {
            info!(function, error = %e, "invocation rejected");
            e.into()
        }
        Err(e) => {
            warn!(function, error = %e, "invocation failed");
            e.into()
        }
    }
}

/// Run an admitted plan against the ledger.
pub fn execute(plan: Plan, stub: &mut dyn ChaincodeStub) -> Result<Vec<u8>, ChaincodeError> {
    match plan {
        Plan::Liveness | Plan::Empty => Ok(Vec::new()),
        Plan::Read { key } => {
            let bytes = RecordStore::new(stub).get_raw(&key)?;
            debug!(key = %key, found = bytes.is_some(), "read");
            Ok(bytes.unwrap_or_default())
        }
        Plan::QueryByPrice { price } => Ok(query::query_by_price(&*stub, price)?),
        Plan::WriteNegotiation { key, record } => {
            RecordStore::new(stub).put(&key, &record)?;
            Ok(Vec::new())
        }
        Plan::WriteLoan { key, record } => {
            RecordStore::new(stub).put(&key, &record)?;
            debug!(key = %key, "loan application recorded");
            Ok(Vec::new())
        }
        Plan::UpdateLoanStatus { key, status } => {
            let mut store = RecordStore::new(stub);
            let existing: LoanRecord = match store.get(&key) {
                Ok(record) => record,
                Err(StoreError::Ledger(e)) => {
                    warn!(key = %key, error = %e, "cannot read loan record");
                    return Err(ChaincodeError::RecordNotFound { key });
                }
                Err(e) => return Err(e.into()),
            };
            store.put(&key, &existing.with_status(status))?;
            info!(key = %key, "loan status updated");
            Ok(Vec::new())
        }
    }
}
