// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Health probes. Mounted outside `/api`, so the authorization gate never
//! sees them.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Probe result with per-component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// "ok" or "degraded".
    pub status: &'static str,
    /// Crate version of the running server.
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub service: &'static str,
    /// Content database availability.
    pub database: &'static str,
    /// Issuer the token verifier expects.
    pub token_issuer: String,
}

/// Liveness body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

fn probe(state: &AppState) -> (StatusCode, Json<ReadyResponse>) {
    let database_ok = state.db.is_available();

    let response = ReadyResponse {
        status: if database_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            service: "ok",
            database: if database_ok { "ok" } else { "unavailable" },
            token_issuer: state.verifier.issuer().to_string(),
        },
    };

    if !database_ok {
        tracing::warn!("Health probe failed: content database unavailable");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(response));
    }
    (StatusCode::OK, Json(response))
}

/// Full health check: 200 when every component is up, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    probe(&state)
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is running", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to serve content", body = ReadyResponse),
        (status = 503, description = "Content database unavailable", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    probe(&state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::DEFAULT_ISSUER;
    use crate::state::test_state;

    #[tokio::test]
    async fn ready_with_open_database() {
        let (state, _dir) = test_state();
        let (status, Json(response)) = readiness(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.checks.database, "ok");
        assert_eq!(response.checks.token_issuer, DEFAULT_ISSUER);
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let Json(response) = liveness().await;
        assert_eq!(response.status, "ok");
    }
}
