// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info_span;

use crate::chaincode::{BankerChaincode, Chaincode, DealerChaincode};
use crate::identity::{IdentityResolver, X509IdentityResolver};
use crate::ledger::RedbLedger;

/// Shared state of the development peer.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RedbLedger>,
    chaincodes: Arc<HashMap<&'static str, Arc<dyn Chaincode>>>,
    /// Held from an invocation's first read until its write set is committed.
    pub invocation_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Host the dealer and banker chaincodes, identifying callers by X.509.
    pub fn new(ledger: RedbLedger) -> Self {
        let resolver: Arc<dyn IdentityResolver> = Arc::new(X509IdentityResolver::new());
        Self::with_chaincodes(
            ledger,
            vec![
                Arc::new(DealerChaincode::new(
                    resolver.clone(),
                    info_span!("chaincode", name = "dealer"),
                )),
                Arc::new(BankerChaincode::new(
                    resolver,
                    info_span!("chaincode", name = "banker"),
                )),
            ],
        )
    }

    pub fn with_chaincodes(ledger: RedbLedger, chaincodes: Vec<Arc<dyn Chaincode>>) -> Self {
        let chaincodes = chaincodes
            .into_iter()
            .map(|chaincode| (chaincode.name(), chaincode))
            .collect();
        Self {
            ledger: Arc::new(ledger),
            chaincodes: Arc::new(chaincodes),
            invocation_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn chaincode(&self, name: &str) -> Option<Arc<dyn Chaincode>> {
        self.chaincodes.get(name).cloned()
    }
}
