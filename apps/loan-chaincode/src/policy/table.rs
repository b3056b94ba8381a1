// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Policy table vocabulary.
//!
//! A [`ModulePolicy`] lists the functions a chaincode exposes. Each
//! [`FunctionPolicy`] holds one [`Rule`] per kind of caller, and says what
//! happens to callers that match no rule.

use crate::identity::Organization;

use super::Arity;

/// Liveness probe argument.
pub const LIVENESS_PROBE: &str = "health";

/// Where a function recognises the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// No probe.
    None,
    /// Probe is the one and only argument.
    SoleArgument,
    /// Probe is the first argument, checked before anything else.
    LeadingArgument,
}

impl Probe {
    pub fn matches(&self, args: &[String]) -> bool {
        match self {
            Probe::None => false,
            Probe::SoleArgument => matches!(args, [only] if only == LIVENESS_PROBE),
            Probe::LeadingArgument => args.first().is_some_and(|a| a == LIVENESS_PROBE),
        }
    }
}

/// Who a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// Anyone; identity is only resolved if the rule's key or action needs it.
    Public,
    /// Any caller with a resolvable identity, whatever its organization.
    AnyIdentity,
    /// Callers of one organization.
    Org(Organization),
}

/// How the ledger key is built from the arguments and the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRule {
    /// No single key.
    None,
    /// The argument at this position, used verbatim.
    Argument(usize),
    /// `caller.common_name@args[i]`.
    CallerWith(usize),
    /// `args[i]@args[j]`.
    Arguments(usize, usize),
}

/// What an admitted invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write a negotiation record from `(vin, price)`.
    RecordNegotiation,
    /// Return the bytes stored at the key.
    Read,
    /// Rich query for negotiations at `args[0]` price.
    QueryByPrice,
    /// Write a new loan application from
    /// `(loanId, vin, amount, loanPeriod, apr, monthlyPayment)`.
    SubmitLoan,
    /// Replace the status of an existing loan with `args[2]`.
    UpdateLoanStatus,
}

/// Outcome for a caller whose organization matches no rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unmatched {
    /// Fail with an identity error.
    IdentityError,
    /// Reject with 403.
    Forbid,
    /// Succeed with an empty payload.
    Empty,
}

/// Outcomes for callers that match none of an organization-specific
/// function's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallback {
    /// Caller whose organization shortname is empty.
    pub empty_org: Unmatched,
    /// Caller whose organization has no rule.
    pub unknown_org: Unmatched,
}

impl Fallback {
    pub const FORBID: Fallback = Fallback {
        empty_org: Unmatched::Forbid,
        unknown_org: Unmatched::Forbid,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub caller: Caller,
    pub arity: Arity,
    pub key: KeyRule,
    pub action: Action,
}

#[derive(Debug)]
pub struct FunctionPolicy {
    pub name: &'static str,
    pub probe: Probe,
    pub rules: &'static [Rule],
    /// Set only when rules are per organization; a single org-independent
    /// rule admits every caller.
    pub fallback: Option<Fallback>,
}

impl FunctionPolicy {
    /// The single rule of a function that does not discriminate by
    /// organization. Its arity is checked before identity is resolved.
    pub fn org_independent_rule(&self) -> Option<&Rule> {
        match self.rules {
            [rule] if !matches!(rule.caller, Caller::Org(_)) => Some(rule),
            _ => None,
        }
    }

    /// Outcome for a caller of `organization` that no rule matched.
    /// Forbidden when the function declares no fallback.
    pub fn unmatched(&self, organization: &str) -> Unmatched {
        let fallback = self.fallback.unwrap_or(Fallback::FORBID);
        if organization.is_empty() {
            fallback.empty_org
        } else {
            fallback.unknown_org
        }
    }

    /// Rule for a caller of the given organization.
    pub fn rule_for(&self, organization: Option<Organization>) -> Option<&Rule> {
        self.rules.iter().find(|rule| match rule.caller {
            Caller::Public | Caller::AnyIdentity => true,
            Caller::Org(org) => Some(org) == organization,
        })
    }
}

#[derive(Debug)]
pub struct ModulePolicy {
    pub name: &'static str,
    pub functions: &'static [FunctionPolicy],
}

impl ModulePolicy {
    pub fn function(&self, name: &str) -> Option<&FunctionPolicy> {
        self.functions.iter().find(|f| f.name == name)
    }
}
