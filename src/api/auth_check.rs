// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Probe for exercising the authorization gate.
//!
//! `GET` answers without a token; `POST` and `DELETE` only reach the handler
//! when the gate accepted the token. The token itself is never echoed.

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, Method},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::OptionalAuth;

/// Result of an auth probe.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthCheckResponse {
    pub success: bool,
    pub message: String,
    /// HTTP method of the probe.
    pub method: String,
    /// Whether the request carried an `Authorization` header.
    pub authorization_header: bool,
    /// Verified username, when a valid token was presented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Verified user id, when a valid token was presented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/auth-check",
    tag = "Auth",
    responses(
        (status = 200, body = AuthCheckResponse),
        (status = 401, description = "Mutating probe without a valid token")
    )
)]
pub async fn auth_check(
    method: Method,
    headers: HeaderMap,
    OptionalAuth(user): OptionalAuth,
) -> Json<AuthCheckResponse> {
    let message = if method == Method::GET {
        format!("{method} request succeeded without authentication")
    } else {
        format!("{method} request succeeded with authentication")
    };

    Json(AuthCheckResponse {
        success: true,
        message,
        method: method.to_string(),
        authorization_header: headers.contains_key(AUTHORIZATION),
        username: user.as_ref().map(|u| u.username.clone()),
        user_id: user.map(|u| u.user_id),
    })
}
