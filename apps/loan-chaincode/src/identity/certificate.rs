// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! X.509 creator certificate resolution.

use tracing::debug;

use super::{CallerIdentity, IdentityError, IdentityResolver};

/// PEM boundary marker delimiting the certificate inside the creator bytes.
const PEM_BOUNDARY: &[u8] = b"-----";

/// Resolves callers from the PEM certificate embedded in their creator bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509IdentityResolver;

impl X509IdentityResolver {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityResolver for X509IdentityResolver {
    fn resolve(&self, creator: &[u8]) -> Result<CallerIdentity, IdentityError> {
        let block = pem_block(creator)?;
        let pem = pem::parse(block)?;

        let (_, cert) = x509_parser::parse_x509_certificate(pem.contents())
            .map_err(|e| IdentityError::Certificate(e.to_string()))?;

        let organization = cert
            .issuer()
            .iter_organization()
            .next()
            .ok_or(IdentityError::MissingOrganization)?
            .as_str()
            .map_err(|e| IdentityError::Certificate(e.to_string()))?;

        // A certificate without a subject CN still identifies an organization.
        let common_name = match cert.subject().iter_common_name().next() {
            Some(cn) => cn
                .as_str()
                .map_err(|e| IdentityError::Certificate(e.to_string()))?,
            None => "",
        };

        debug!(common_name, organization, "resolved caller certificate");

        Ok(CallerIdentity::new(common_name, short_name(organization)))
    }
}

/// Slice from the first boundary marker through the end of the last one.
fn pem_block(raw: &[u8]) -> Result<&[u8], IdentityError> {
    let mut markers = raw
        .windows(PEM_BOUNDARY.len())
        .enumerate()
        .filter(|(_, window)| *window == PEM_BOUNDARY)
        .map(|(i, _)| i);

    let first = markers.next().ok_or(IdentityError::NoPemBlock)?;
    let last = markers.last().unwrap_or(first);

    Ok(&raw[first..last + PEM_BOUNDARY.len()])
}

/// Leading dot-separated segment of an organization name.
fn short_name(organization: &str) -> &str {
    organization
        .split_once('.')
        .map_or(organization, |(head, _)| head)
}
