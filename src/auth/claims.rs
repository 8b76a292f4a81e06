// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a user token issued by the identity service.
///
/// Only `username` and `userId` are mandatory. The registered claims are
/// optional and checked by the verifier when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    /// Login name of the token holder
    pub username: String,

    /// Numeric user identifier
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Not before timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

/// Authenticated user information extracted from a verified token.
///
/// The authorization gate stores this in the request extensions so that
/// handlers can fill authorship fields and apply the ownership policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Numeric user identifier (`userId` claim)
    pub user_id: i64,

    /// Login name (`username` claim)
    pub username: String,

    /// Token expiration (Unix timestamp), if the token carries one
    #[serde(skip)]
    pub expires_at: Option<i64>,
}

impl AuthenticatedUser {
    /// Create from verified claims.
    pub fn from_claims(claims: UserClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            expires_at: claims.exp,
        }
    }

    /// Check whether this user is the author/owner with the given id.
    pub fn is_user(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}
