// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Dealer chaincode: negotiated vehicle prices.
//!
//! | Function | Caller | Arguments | Key |
//! |----------|--------|-----------|-----|
//! | `negotiate` | any identity | `vin, price` | `caller@vin` |
//! | `query` | anyone | `key` or `health` | raw argument |
//! | `qryNegotiate` | anyone | `price, ...` | rich query on `price` |
//!
//! `query` reads whatever key it is given, while `negotiate` writes under a
//! key composed from the caller. Readers must compose `ssn@vin` themselves.

use std::sync::Arc;

use tracing::{debug, Span};

use super::{run_invocation, Chaincode, Response};
use crate::identity::IdentityResolver;
use crate::ledger::ChaincodeStub;
use crate::policy::{
    Action, Arity, Caller, FunctionPolicy, KeyRule, ModulePolicy, PolicyGate, Probe, Rule,
};

pub static DEALER_POLICY: ModulePolicy = ModulePolicy {
    name: "dealer",
    functions: &[
        FunctionPolicy {
            name: "negotiate",
            probe: Probe::None,
            rules: &[Rule {
                caller: Caller::AnyIdentity,
                arity: Arity::Exactly(2),
                key: KeyRule::CallerWith(0),
                action: Action::RecordNegotiation,
            }],
            fallback: None,
        },
        FunctionPolicy {
            name: "query",
            probe: Probe::SoleArgument,
            rules: &[Rule {
                caller: Caller::Public,
                arity: Arity::Exactly(1),
                key: KeyRule::Argument(0),
                action: Action::Read,
            }],
            fallback: None,
        },
        FunctionPolicy {
            name: "qryNegotiate",
            probe: Probe::None,
            rules: &[Rule {
                caller: Caller::Public,
                arity: Arity::AtLeast(1),
                key: KeyRule::None,
                action: Action::QueryByPrice,
            }],
            fallback: None,
        },
    ],
};

pub struct DealerChaincode {
    gate: PolicyGate,
    span: Span,
}

impl DealerChaincode {
    /// `span` carries the dealer's log context; every call runs inside it.
    pub fn new(resolver: Arc<dyn IdentityResolver>, span: Span) -> Self {
        Self {
            gate: PolicyGate::new(&DEALER_POLICY, resolver),
            span,
        }
    }
}

impl Chaincode for DealerChaincode {
    fn name(&self) -> &'static str {
        DEALER_POLICY.name
    }

    fn init(&self, _stub: &mut dyn ChaincodeStub) -> Response {
        let _entered = self.span.enter();
        debug!("init");
        Response::success(Vec::new())
    }

    fn invoke(&self, stub: &mut dyn ChaincodeStub, function: &str, args: &[String]) -> Response {
        run_invocation(&self.gate, &self.span, stub, function, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chaincode::response::{ERROR, FORBIDDEN, OK};
    use crate::identity::{CallerIdentity, StaticIdentityResolver};
    use crate::ledger::MockStub;

    fn dealer(cn: &str, org: &str) -> DealerChaincode {
        DealerChaincode::new(
            Arc::new(StaticIdentityResolver::new(CallerIdentity::new(cn, org))),
            Span::none(),
        )
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn negotiate_writes_record_under_caller_key() {
        let chaincode = dealer("123-45-6789", "dealer");
        let mut stub = MockStub::with_creator(Vec::new());

        let response = chaincode.invoke(
            &mut stub,
            "negotiate",
            &args(&["1HGCM82633A004352", "18000"]),
        );

        assert_eq!(response.status, OK);
        assert!(response.payload.is_empty());
        assert_eq!(
            stub.state("123-45-6789@1HGCM82633A004352"),
            Some(
                &br#"{"ssn":"123-45-6789","vin":"1HGCM82633A004352","price":18000,"org":"dealer"}"#
                    [..]
            )
        );
    }

    #[test]
    fn negotiate_with_bad_price_fails_without_writing() {
        let chaincode = dealer("123", "dealer");
        let mut stub = MockStub::with_creator(Vec::new());

        let response = chaincode.invoke(&mut stub, "negotiate", &args(&["VIN", "lots"]));

        assert_eq!(response.status, ERROR);
        assert!(response.message.contains("price"));
        assert_eq!(stub.put_count(), 0);
    }

    #[test]
    fn negotiate_with_wrong_arity_is_rejected() {
        let chaincode = dealer("123", "dealer");
        let mut stub = MockStub::with_creator(Vec::new());

        let response = chaincode.invoke(&mut stub, "negotiate", &args(&["VIN"]));

        assert_eq!(response.status, FORBIDDEN);
        assert_eq!(response.message, "incorrect number of arguments");
    }

    #[test]
    fn query_reads_raw_key() {
        let chaincode = dealer("someone-else", "dealer");
        let mut stub = MockStub::with_creator(Vec::new());
        stub.seed("123@VIN", r#"{"price":1}"#);

        let response = chaincode.invoke(&mut stub, "query", &args(&["123@VIN"]));
        assert_eq!(response.status, OK);
        assert_eq!(response.payload, br#"{"price":1}"#.to_vec());

        // Composing the key is the reader's job.
        let response = chaincode.invoke(&mut stub, "query", &args(&["VIN"]));
        assert_eq!(response.status, OK);
        assert!(response.payload.is_empty());
    }

    #[test]
    fn health_probe_succeeds_with_empty_payload() {
        let chaincode = dealer("x", "dealer");
        let mut stub = MockStub::with_creator(Vec::new());

        let response = chaincode.invoke(&mut stub, "query", &args(&["health"]));
        assert_eq!(response, Response::success(Vec::new()));
    }

    #[test]
    fn unknown_function_is_rejected() {
        let chaincode = dealer("x", "dealer");
        let mut stub = MockStub::with_creator(Vec::new());

        let response = chaincode.invoke(&mut stub, "loan", &args(&[]));
        assert_eq!(response.status, FORBIDDEN);
        assert_eq!(response.message, "unknown function name");
    }

    #[test]
    fn init_succeeds() {
        let chaincode = dealer("x", "dealer");
        let mut stub = MockStub::with_creator(Vec::new());
        assert!(chaincode.init(&mut stub).is_success());
        assert_eq!(chaincode.name(), "dealer");
    }
}
