// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Organizations that appear in the access policy tables.

/// Organizations with their own access rules.
///
/// Callers from any other organization (dealers, for instance) are still
/// valid identities; they simply match no organization-specific rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Organization {
    /// Department of motor vehicles; submits loan applications on behalf of
    /// the applicant named by the certificate.
    Dmv,
    /// Lender; reviews applications and sets their status.
    Banker,
}

impl Organization {
    /// Parse an organization shortname (exact, case-sensitive).
    pub fn from_short_name(s: &str) -> Option<Organization> {
        match s {
            "dmv" => Some(Organization::Dmv),
            "banker" => Some(Organization::Banker),
            _ => None,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Organization::Dmv => "dmv",
            Organization::Banker => "banker",
        }
    }
}

impl std::fmt::Display for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}
