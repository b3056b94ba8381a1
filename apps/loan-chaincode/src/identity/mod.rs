// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Caller Identity
//!
//! Every invocation carries the caller's identity as raw creator bytes: an
//! MSP envelope wrapping a PEM-encoded X.509 certificate. This module turns
//! those bytes into a [`CallerIdentity`].
//!
//! ## Resolution
//!
//! 1. Take the span between the first and last `-----` boundary marker
//! 2. Decode the PEM envelope to DER
//! 3. Parse the X.509 certificate
//! 4. Read the subject common name and the first issuer organization
//! 5. Keep the organization up to its first `.` (`dmv.example.com` → `dmv`)
//!
//! Any failure is an [`IdentityError`]; the invocation is rejected before
//! touching the world state.
//!
//! Resolution is a strategy ([`IdentityResolver`]) injected into each
//! chaincode, so tests can substitute a fixed identity.

pub mod certificate;
pub mod error;
pub mod organization;

pub use certificate::X509IdentityResolver;
pub use error::IdentityError;
pub use organization::Organization;

/// Identity of the caller for a single invocation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Subject common name. For dmv callers this is the applicant's ssn.
    pub common_name: String,
    /// Organization shortname taken from the issuer.
    pub organization: String,
}

impl CallerIdentity {
    pub fn new(common_name: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            organization: organization.into(),
        }
    }

    /// The policy-relevant organization, if the shortname is one we know.
    pub fn known_organization(&self) -> Option<Organization> {
        Organization::from_short_name(&self.organization)
    }
}

/// Strategy for deriving a [`CallerIdentity`] from creator bytes.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, creator: &[u8]) -> Result<CallerIdentity, IdentityError>;
}

/// Resolver that ignores the creator bytes and returns a fixed identity.
///
/// Used by tests to exercise policy without certificates. The gate still
/// reads the creator before resolving, so the stub must carry creator bytes;
/// empty ones will do.
#[derive(Debug, Clone)]
pub struct StaticIdentityResolver {
    identity: CallerIdentity,
}

impl StaticIdentityResolver {
    pub fn new(identity: CallerIdentity) -> Self {
        Self { identity }
    }
}

impl IdentityResolver for StaticIdentityResolver {
    fn resolve(&self, _creator: &[u8]) -> Result<CallerIdentity, IdentityError> {
        Ok(self.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_organization_maps_policy_orgs() {
        assert_eq!(
            CallerIdentity::new("123", "dmv").known_organization(),
            Some(Organization::Dmv)
        );
        assert_eq!(
            CallerIdentity::new("bank", "banker").known_organization(),
            Some(Organization::Banker)
        );
        assert_eq!(CallerIdentity::new("x", "dealer").known_organization(), None);
        assert_eq!(CallerIdentity::new("x", "").known_organization(), None);
    }

    #[test]
    fn static_resolver_ignores_creator_bytes() {
        let resolver = StaticIdentityResolver::new(CallerIdentity::new("123-45-6789", "dmv"));
        let identity = resolver.resolve(b"").unwrap();
        assert_eq!(identity.common_name, "123-45-6789");
        assert_eq!(identity.organization, "dmv");
    }
}
