// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the development peer. All types derive
//! `ToSchema` for the OpenAPI document served at `/docs`.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::chaincode::Response;

/// Invocation of one chaincode function.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvokeRequest {
    /// Function name, e.g. `loan` or `qryNegotiate`.
    pub function: String,
    /// Positional string arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Caller identity bytes as text: a PEM certificate, optionally preceded
    /// by MSP framing. Omitted for anonymous calls.
    #[serde(default)]
    pub creator: Option<String>,
}

/// How [`ChaincodeResponse::payload`] encodes the payload bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// Bytes were valid UTF-8 and are returned as-is.
    Utf8,
    /// Bytes were not valid UTF-8; standard base64 with padding.
    Base64,
}

/// Chaincode response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ChaincodeResponse {
    /// 200 success, 403 rejection, 500 failure.
    pub status: i32,
    /// Error message; empty on success.
    pub message: String,
    /// Payload bytes, as text when they are UTF-8 (records are JSON).
    pub payload: String,
    pub payload_encoding: PayloadEncoding,
}

impl From<Response> for ChaincodeResponse {
    fn from(response: Response) -> Self {
        let (payload, payload_encoding) = match String::from_utf8(response.payload) {
            Ok(text) => (text, PayloadEncoding::Utf8),
            Err(e) => (STANDARD.encode(e.into_bytes()), PayloadEncoding::Base64),
        };
        Self {
            status: response.status,
            message: response.message,
            payload,
            payload_encoding,
        }
    }
}
