// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chaincode invocation endpoints.
//!
//! Each request runs as one ledger transaction: the chaincode reads committed
//! state, its writes are buffered, and the write set is committed only when
//! the response status is 200.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::chaincode::{Chaincode, Response};
use crate::error::ApiError;
use crate::ledger::ChaincodeStub;
use crate::models::{ChaincodeResponse, InvokeRequest};
use crate::state::AppState;

fn lookup(state: &AppState, name: &str) -> Result<Arc<dyn Chaincode>, ApiError> {
    state
        .chaincode(name)
        .ok_or_else(|| ApiError::not_found(format!("unknown chaincode {name:?}")))
}

/// HTTP status mirroring the envelope status.
fn http_status(response: &Response) -> StatusCode {
    u16::try_from(response.status)
        .ok()
        .and_then(|status| StatusCode::from_u16(status).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Run `call` against a fresh transaction, committing only on success.
async fn run_transaction<F>(
    state: AppState,
    creator: Vec<u8>,
    call: F,
) -> Result<(StatusCode, Json<ChaincodeResponse>), ApiError>
where
    F: FnOnce(&mut dyn ChaincodeStub) -> Response + Send + 'static,
{
    let response = tokio::task::spawn_blocking(move || -> Result<Response, ApiError> {
        let _serialized = state
            .invocation_lock
            .lock()
            .map_err(|_| ApiError::internal("invocation lock poisoned"))?;

        let mut stub = state.ledger.transaction(creator);
        let response = call(&mut stub);

        if response.is_success() {
            let written = stub.commit()?;
            debug!(written, "transaction committed");
        } else {
            debug!(
                status = response.status,
                discarded = stub.write_set().count(),
                "transaction discarded"
            );
        }
        Ok(response)
    })
    .await??;

    Ok((http_status(&response), Json(response.into())))
}

#[utoipa::path(
    post,
    path = "/v1/chaincodes/{name}/invoke",
    tag = "Chaincodes",
    params(("name" = String, Path, description = "Chaincode module name (dealer or banker)")),
    request_body = InvokeRequest,
    responses(
        (status = 200, description = "Invocation succeeded", body = ChaincodeResponse),
        (status = 403, description = "Invocation rejected", body = ChaincodeResponse),
        (status = 500, description = "Invocation failed", body = ChaincodeResponse),
        (status = 404, description = "Unknown chaincode")
    )
)]
pub async fn invoke(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<InvokeRequest>,
) -> Result<(StatusCode, Json<ChaincodeResponse>), ApiError> {
    let chaincode = lookup(&state, &name)?;
    let creator = request.creator.unwrap_or_default().into_bytes();
    let (function, args) = (request.function, request.args);

    run_transaction(state, creator, move |stub| {
        chaincode.invoke(stub, &function, &args)
    })
    .await
}

#[utoipa::path(
    post,
    path = "/v1/chaincodes/{name}/init",
    tag = "Chaincodes",
    params(("name" = String, Path, description = "Chaincode module name (dealer or banker)")),
    responses(
        (status = 200, description = "Chaincode initialized", body = ChaincodeResponse),
        (status = 404, description = "Unknown chaincode")
    )
)]
pub async fn init(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<ChaincodeResponse>), ApiError> {
    let chaincode = lookup(&state, &name)?;
    run_transaction(state, Vec::new(), move |stub| chaincode.init(stub)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::ledger::RedbLedger;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        Router,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const DMV_PEM: &str = include_str!("../../tests/fixtures/dmv.pem");
    const BANKER_PEM: &str = include_str!("../../tests/fixtures/banker.pem");

    fn test_state() -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = RedbLedger::open(&dir.path().join("ledger.redb")).unwrap();
        (dir, AppState::new(ledger))
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn loan_submission_is_committed_and_readable() {
        let (_dir, state) = test_state();

        let (status, body) = post(
            router(state.clone()),
            "/v1/chaincodes/banker/invoke",
            json!({
                "function": "loan",
                "args": ["L-1", "1HGCM82633A004352", "18000", "60", "4", "330"],
                "creator": DMV_PEM,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 200);

        let stored = state
            .ledger
            .get("123-45-6789@1HGCM82633A004352")
            .unwrap()
            .expect("committed");
        let stored: Value = serde_json::from_slice(&stored).unwrap();
        assert_eq!(stored["status"], "Applied");
        assert_eq!(stored["org"], "dmv");

        let (status, body) = post(
            router(state),
            "/v1/chaincodes/banker/invoke",
            json!({
                "function": "query",
                "args": ["123-45-6789", "1HGCM82633A004352"],
                "creator": BANKER_PEM,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let payload: Value = serde_json::from_str(body["payload"].as_str().unwrap()).unwrap();
        assert_eq!(payload["loanId"], "L-1");
    }

    #[tokio::test]
    async fn rejection_maps_to_forbidden() {
        let (_dir, state) = test_state();

        let (status, body) = post(
            router(state),
            "/v1/chaincodes/banker/invoke",
            json!({ "function": "loan", "args": ["a", "b"], "creator": DMV_PEM }),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["status"], 403);
        assert_eq!(body["message"], "incorrect number of arguments");
    }

    #[tokio::test]
    async fn anonymous_health_probe_succeeds() {
        let (_dir, state) = test_state();

        let (status, body) = post(
            router(state),
            "/v1/chaincodes/dealer/invoke",
            json!({ "function": "query", "args": ["health"] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payload"], "");
        assert_eq!(body["payload_encoding"], "utf8");
    }

    #[tokio::test]
    async fn unknown_chaincode_is_not_found() {
        let (_dir, state) = test_state();

        let (status, body) = post(
            router(state),
            "/v1/chaincodes/insurer/invoke",
            json!({ "function": "query", "args": ["health"] }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown chaincode \"insurer\"");
    }

    #[tokio::test]
    async fn init_succeeds_for_hosted_chaincodes() {
        let (_dir, state) = test_state();

        for name in ["dealer", "banker"] {
            let (status, body) = post(
                router(state.clone()),
                &format!("/v1/chaincodes/{name}/init"),
                json!({}),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], 200);
        }
    }

    #[tokio::test]
    async fn binary_payload_survives_over_http() {
        let (_dir, state) = test_state();
        let mut tx = state.ledger.transaction(Vec::new());
        tx.put_state("raw", vec![0xff, 0xfe, 0x00]).unwrap();
        tx.commit().unwrap();

        let (status, body) = post(
            router(state),
            "/v1/chaincodes/dealer/invoke",
            json!({ "function": "query", "args": ["raw"] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payload_encoding"], "base64");
        assert_eq!(body["payload"], "//4A");
    }

    /// Writes, then fails.
    struct Faulty;

    impl Chaincode for Faulty {
        fn name(&self) -> &'static str {
            "faulty"
        }

        fn init(&self, _stub: &mut dyn ChaincodeStub) -> Response {
            Response::success(Vec::new())
        }

        fn invoke(&self, stub: &mut dyn ChaincodeStub, _function: &str, _args: &[String]) -> Response {
            stub.put_state("k", b"v".to_vec()).unwrap();
            Response::error("late failure")
        }
    }

    #[tokio::test]
    async fn failed_invocation_discards_writes() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = RedbLedger::open(&dir.path().join("ledger.redb")).unwrap();
        let state = AppState::with_chaincodes(ledger, vec![Arc::new(Faulty)]);

        let (status, body) = post(
            router(state.clone()),
            "/v1/chaincodes/faulty/invoke",
            json!({ "function": "anything" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "late failure");
        assert!(state.ledger.get("k").unwrap().is_none());
    }
}
