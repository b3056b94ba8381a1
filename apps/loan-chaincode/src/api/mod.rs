// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{ChaincodeResponse, InvokeRequest, PayloadEncoding},
    state::AppState,
};

pub mod chaincodes;
pub mod health;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/chaincodes/{name}/invoke", post(chaincodes::invoke))
        .route("/chaincodes/{name}/init", post(chaincodes::init))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        chaincodes::invoke,
        chaincodes::init,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            InvokeRequest,
            ChaincodeResponse,
            PayloadEncoding,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Chaincodes", description = "Dealer and banker chaincode invocation"),
        (name = "Health", description = "Liveness and readiness")
    )
)]
struct ApiDoc;
