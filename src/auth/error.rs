// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authorization failure taxonomy.
///
/// Every variant is terminal for the current request and is reported as
/// `401 Unauthorized`. The response body carries a short public message
/// only; the detailed reason stays in the server logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    HeaderMissing,
    /// Header is not `Bearer <token>`
    HeaderMalformed,
    /// Token could not be decoded or its claims are incomplete
    MalformedToken,
    /// Signature mismatch or unexpected algorithm
    SignatureInvalid,
    /// Token has expired
    TokenExpired,
    /// Token `nbf` lies in the future
    TokenNotYetValid,
    /// Token issuer differs from the configured issuer
    IssuerMismatch,
    /// Token subject differs from the configured subject
    SubjectMismatch,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "header_missing",
            AuthError::HeaderMalformed => "header_malformed",
            AuthError::MalformedToken => "malformed_token",
            AuthError::SignatureInvalid => "signature_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::IssuerMismatch => "issuer_mismatch",
            AuthError::SubjectMismatch => "subject_mismatch",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// Message returned to the caller.
    ///
    /// Verification failures other than expiry collapse into one message so
    /// the response never reveals which check rejected the token.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "missing authorization header",
            AuthError::HeaderMalformed => "invalid authorization header format",
            AuthError::TokenExpired => "token expired",
            _ => "token verification failed",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::HeaderMissing => write!(f, "Authorization header is required"),
            AuthError::HeaderMalformed => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::SignatureInvalid => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenNotYetValid => write!(f, "Token is not yet valid"),
            AuthError::IssuerMismatch => write!(f, "Token issuer is invalid"),
            AuthError::SubjectMismatch => write!(f, "Token subject is invalid"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            success: false,
            error: self.public_message(),
        });
        (self.status_code(), body).into_response()
    }
}
