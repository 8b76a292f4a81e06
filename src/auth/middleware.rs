// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate for Axum.
//!
//! Read-only requests pass untouched so the blog stays publicly readable.
//! Mutating requests (`POST`, `PUT`, `PATCH`, `DELETE`) must carry a valid
//! `Authorization: Bearer <token>` header; the verified identity is then
//! inserted into the request extensions for the `Auth` extractor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let api = Router::new()
//!     .route("/articles", get(list).post(create))
//!     .layer(axum::middleware::from_fn_with_state(
//!         verifier.clone(),
//!         authorization_gate,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::header::extract_token;
use super::{AuthError, AuthenticatedUser, TokenVerifier};

/// Methods that change server-side state and therefore require a token.
pub const MUTATING_METHODS: [Method; 4] = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

/// Outcome of the gate for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Request proceeds; carries the identity when a token was verified
    Pass(Option<AuthenticatedUser>),
    /// Request is short-circuited with a 401
    Reject(AuthError),
}

/// Whether the method requires authorization.
pub fn is_mutating(method: &Method) -> bool {
    MUTATING_METHODS.contains(method)
}

/// Decide whether a request may proceed.
///
/// Pure function over the method and headers; the request body is never
/// inspected.
pub fn evaluate(method: &Method, headers: &HeaderMap, verifier: &TokenVerifier) -> GateDecision {
    if !is_mutating(method) {
        return GateDecision::Pass(None);
    }

    match authenticate(headers, verifier) {
        Ok(user) => GateDecision::Pass(Some(user)),
        Err(e) => GateDecision::Reject(e),
    }
}

/// Run header extraction and token verification.
pub fn authenticate(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
) -> Result<AuthenticatedUser, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::HeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::HeaderMalformed)?;

    let token = extract_token(header).ok_or(AuthError::HeaderMalformed)?;
    let claims = verifier.verify(token)?;

    Ok(AuthenticatedUser::from_claims(claims))
}

/// Authorization gate middleware function.
pub async fn authorization_gate(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    match evaluate(request.method(), request.headers(), &verifier) {
        GateDecision::Pass(Some(user)) => {
            debug!(
                method = %request.method(),
                path = %request.uri().path(),
                user_id = user.user_id,
                "Authorized mutating request"
            );
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        GateDecision::Pass(None) => next.run(request).await,
        GateDecision::Reject(e) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = e.error_code(),
                "Rejected unauthorized request"
            );
            e.into_response()
        }
    }
}
