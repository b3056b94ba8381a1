// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Loan Chaincode - vehicle loan origination on a permissioned ledger
//!
//! Two chaincode modules share one world state: the dealer records
//! negotiated prices, the banker records loan applications from the dmv and
//! their approval status. Every invocation passes an access policy gate
//! driven by the caller's X.509 identity.
//!
//! ## Modules
//!
//! - `identity` - caller identity from creator certificates
//! - `policy` - per-function access policy tables and admission
//! - `records` - record schemas, composite keys, typed state access
//! - `query` - rich queries by price and result rendering
//! - `ledger` - ledger stub traits, in-memory and redb backends
//! - `chaincode` - dealer and banker modules, response envelope, errors
//! - `api` - development peer HTTP API (Axum)

pub mod api;
pub mod chaincode;
pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod models;
pub mod policy;
pub mod query;
pub mod records;
pub mod state;
