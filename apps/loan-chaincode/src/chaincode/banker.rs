// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Banker chaincode: loan applications and their approval status.
//!
//! | Function | Organization | Arguments | Key | Effect |
//! |----------|--------------|-----------|-----|--------|
//! | `loan` | dmv | `loanId, vin, amount, loanPeriod, apr, monthlyPayment` | `caller@vin` | new application, status `Applied` |
//! | `loan` | banker | `ssn, vin, status` | `ssn@vin` | status of existing application |
//! | `query` | dmv | `vin` | `caller@vin` | stored application |
//! | `query` | banker | `ssn, vin` | `ssn@vin` | stored application |
//!
//! `query health` is answered before any other check. A `loan` from a caller
//! with no organization fails; from any other organization it is forbidden.
//! A `query` from such callers succeeds with nothing.

use std::sync::Arc;

use tracing::{debug, Span};

use super::{run_invocation, Chaincode, Response};
use crate::identity::{IdentityResolver, Organization};
use crate::ledger::ChaincodeStub;
use crate::policy::{
    Action, Arity, Caller, Fallback, FunctionPolicy, KeyRule, ModulePolicy, PolicyGate, Probe,
    Rule, Unmatched,
};

pub static BANKER_POLICY: ModulePolicy = ModulePolicy {
    name: "banker",
    functions: &[
        FunctionPolicy {
            name: "loan",
            probe: Probe::None,
            rules: &[
                Rule {
                    caller: Caller::Org(Organization::Dmv),
                    arity: Arity::Exactly(6),
                    key: KeyRule::CallerWith(1),
                    action: Action::SubmitLoan,
                },
                Rule {
                    caller: Caller::Org(Organization::Banker),
                    arity: Arity::Exactly(3),
                    key: KeyRule::Arguments(0, 1),
                    action: Action::UpdateLoanStatus,
                },
            ],
            fallback: Some(Fallback {
                empty_org: Unmatched::IdentityError,
                unknown_org: Unmatched::Forbid,
            }),
        },
        FunctionPolicy {
            name: "query",
            probe: Probe::LeadingArgument,
            rules: &[
                Rule {
                    caller: Caller::Org(Organization::Dmv),
                    arity: Arity::Exactly(1),
                    key: KeyRule::CallerWith(0),
                    action: Action::Read,
                },
                Rule {
                    caller: Caller::Org(Organization::Banker),
                    arity: Arity::Exactly(2),
                    key: KeyRule::Arguments(0, 1),
                    action: Action::Read,
                },
            ],
            fallback: Some(Fallback {
                empty_org: Unmatched::Empty,
                unknown_org: Unmatched::Empty,
            }),
        },
    ],
};

pub struct BankerChaincode {
    gate: PolicyGate,
    span: Span,
}

impl BankerChaincode {
    /// `span` carries the banker's log context; every call runs inside it.
    pub fn new(resolver: Arc<dyn IdentityResolver>, span: Span) -> Self {
        Self {
            gate: PolicyGate::new(&BANKER_POLICY, resolver),
            span,
        }
    }
}

impl Chaincode for BankerChaincode {
    fn name(&self) -> &'static str {
        BANKER_POLICY.name
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
