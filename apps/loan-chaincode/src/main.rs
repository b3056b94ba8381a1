// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use loan_chaincode::{
    api::router,
    config::{HarnessConfig, LogFormat, DEFAULT_LOG_FILTER},
    ledger::RedbLedger,
    state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() {
    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    let ledger = match RedbLedger::open(&config.ledger_path) {
        Ok(ledger) => ledger,
        Err(e) => {
            error!(path = %config.ledger_path.display(), error = %e, "cannot open ledger");
            std::process::exit(1);
        }
    };

    let app = router(AppState::new(ledger));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "cannot bind listener");
            std::process::exit(1);
        }
    };

    info!(
        addr = %config.bind_addr,
        ledger = %config.ledger_path.display(),
        "loan chaincode peer listening (docs at /docs)"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
