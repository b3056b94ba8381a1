// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Access Policy Gate
//!
//! Decides what an invocation may do, before any state is touched.
//!
//! ## Admission Order
//!
//! 1. Unknown function → rejected (403)
//! 2. Liveness probe → admitted without identity or argument checks
//! 3. Organization-independent rule → arity checked, then identity resolved
//!    if the rule needs it
//! 4. Otherwise the caller is identified and the rule for its organization
//!    is selected; callers matching no rule get the function's
//!    [`Unmatched`] outcome
//! 5. The rule's key is built and its action turned into a [`Plan`]
//!
//! The gate performs no ledger reads or writes; the only stub call it may
//! make is `get_creator`.

pub mod args;
pub mod table;

use std::sync::Arc;

use tracing::{debug, info};

use crate::chaincode::ChaincodeError;
use crate::identity::{CallerIdentity, IdentityError, IdentityResolver};
use crate::ledger::ChaincodeStub;
use crate::records::{CompositeKey, LoanRecord, NegotiationRecord, STATUS_APPLIED};

pub use args::Arity;
pub use table::{
    Action, Caller, Fallback, FunctionPolicy, KeyRule, ModulePolicy, Probe, Rule, Unmatched,
    LIVENESS_PROBE,
};

use args::{arg, int_arg};

/// Work an admitted invocation performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Liveness probe; succeed with an empty payload.
    Liveness,
    /// Allowed, with nothing to return.
    Empty,
    /// Return the bytes stored at `key` (empty when unset).
    Read { key: String },
    /// Rich query for negotiations at `price`.
    QueryByPrice { price: i64 },
    /// Write a negotiation record.
    WriteNegotiation {
        key: String,
        record: NegotiationRecord,
    },
    /// Write a loan application, replacing any prior one at `key`.
    WriteLoan { key: String, record: LoanRecord },
    /// Replace the status of the loan at `key`.
    UpdateLoanStatus { key: String, status: String },
}

/// Identity resolved on first use, at most once per invocation.
struct LazyCaller<'a> {
    stub: &'a dyn ChaincodeStub,
    resolver: &'a dyn IdentityResolver,
    resolved: Option<CallerIdentity>,
}

impl<'a> LazyCaller<'a> {
    fn new(stub: &'a dyn ChaincodeStub, resolver: &'a dyn IdentityResolver) -> Self {
        Self {
            stub,
            resolver,
            resolved: None,
        }
    }

    fn get(&mut self) -> Result<&CallerIdentity, ChaincodeError> {
        let identity = match self.resolved.take() {
            Some(identity) => identity,
            None => {
                let creator = self.stub.get_creator()?;
                let identity = self.resolver.resolve(&creator)?;
                debug!(
                    common_name = %identity.common_name,
                    organization = %identity.organization,
                    "caller identified"
                );
                identity
            }
        };
        Ok(self.resolved.insert(identity))
    }
}

/// Access policy for one chaincode module.
#[derive(Clone)]
pub struct PolicyGate {
    policy: &'static ModulePolicy,
    resolver: Arc<dyn IdentityResolver>,
}

impl PolicyGate {
    pub fn new(policy: &'static ModulePolicy, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { policy, resolver }
    }

    pub fn module(&self) -> &'static str {
        self.policy.name
    }

    /// Admit or refuse an invocation of `function` with `args`.
    pub fn admit(
        &self,
        stub: &dyn ChaincodeStub,
        function: &str,
        args: &[String],
    ) -> Result<Plan, ChaincodeError> {
        let policy = self
            .policy
            .function(function)
            .ok_or_else(|| ChaincodeError::UnknownFunction(function.to_string()))?;

        if policy.probe.matches(args) {
            info!(module = self.policy.name, "health status ok");
            return Ok(Plan::Liveness);
        }

        let mut caller = LazyCaller::new(stub, self.resolver.as_ref());

        let rule = match policy.org_independent_rule() {
            Some(rule) => {
                rule.arity.check(args)?;
                if rule.caller == Caller::AnyIdentity {
                    caller.get()?;
                }
                rule
            }
            None => {
                let identity = caller.get()?;
                match policy.rule_for(identity.known_organization()) {
                    Some(rule) => {
                        rule.arity.check(args)?;
                        rule
                    }
                    None => return unmatched(policy, identity),
                }
            }
        };

        plan(rule, args, &mut caller)
    }
}

fn unmatched(policy: &FunctionPolicy, identity: &CallerIdentity) -> Result<Plan, ChaincodeError> {
    let outcome = policy.unmatched(&identity.organization);

    debug!(
        function = policy.name,
        organization = %identity.organization,
        ?outcome,
        "no rule for caller organization"
    );

    match outcome {
        Unmatched::IdentityError => Err(IdentityError::EmptyOrganization.into()),
        Unmatched::Forbid => Err(ChaincodeError::Forbidden {
            organization: identity.organization.clone(),
            function: policy.name.to_string(),
        }),
        Unmatched::Empty => Ok(Plan::Empty),
    }
}

fn build_key(
    rule: &Rule,
    args: &[String],
    caller: &mut LazyCaller<'_>,
) -> Result<Option<String>, ChaincodeError> {
    let key = match rule.key {
        KeyRule::None => None,
        KeyRule::Argument(i) => Some(arg(args, i)?.to_string()),
        KeyRule::CallerWith(i) => {
            let second = arg(args, i)?;
            Some(CompositeKey::new(&caller.get()?.common_name, second).into())
        }
        KeyRule::Arguments(i, j) => Some(CompositeKey::new(arg(args, i)?, arg(args, j)?).into()),
    };
    Ok(key)
}

fn plan(
    rule: &Rule,
    args: &[String],
    caller: &mut LazyCaller<'_>,
) -> Result<Plan, ChaincodeError> {
    let key = build_key(rule, args, caller)?.unwrap_or_default();

    let plan = match rule.action {
        Action::Read => Plan::Read { key },
        Action::QueryByPrice => Plan::QueryByPrice {
            price: int_arg(args, 0, "price")?,
        },
        Action::RecordNegotiation => {
            let vin = arg(args, 0)?.to_string();
            let final_price = int_arg(args, 1, "price")?;
            let identity = caller.get()?;
            Plan::WriteNegotiation {
                key,
                record: NegotiationRecord {
                    ssn: identity.common_name.clone(),
                    vin,
                    final_price,
                    org: identity.organization.clone(),
                },
            }
        }
        Action::SubmitLoan => {
            let loan_id = arg(args, 0)?.to_string();
            let vin = arg(args, 1)?.to_string();
            let amount = int_arg(args, 2, "amount")?;
            let loan_period = int_arg(args, 3, "loanPeriod")?;
            let apr = int_arg(args, 4, "apr")?;
            let monthly_payment = int_arg(args, 5, "monthlyPayment")?;
            let identity = caller.get()?;
            Plan::WriteLoan {
                key,
                record: LoanRecord {
                    loan_id,
                    vin,
                    amount,
                    ssn: identity.common_name.clone(),
                    loan_period,
                    apr,
                    monthly_payment,
                    status: STATUS_APPLIED.to_string(),
                    org: identity.organization.clone(),
                },
            }
        }
        Action::UpdateLoanStatus => Plan::UpdateLoanStatus {
            key,
            status: arg(args, 2)?.to_string(),
        },
    };

    Ok(plan)
}
