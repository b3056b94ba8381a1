// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity resolution errors.

/// Why a caller identity could not be established.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Creator bytes contain no `-----` PEM boundary
    #[error("no PEM certificate block found in creator identity")]
    NoPemBlock,

    /// PEM envelope could not be decoded
    #[error("cannot decode PEM certificate block: {0}")]
    Pem(#[from] pem::PemError),

    /// DER payload is not a valid X.509 certificate
    #[error("cannot parse X.509 certificate: {0}")]
    Certificate(String),

    /// Issuer has no organization attribute
    #[error("certificate issuer has no organization")]
    MissingOrganization,

    /// Issuer organization resolved to an empty shortname
    #[error("cannot get organization of caller")]
    EmptyOrganization,
}
