// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Bearer-token authorization for the content API.
//!
//! ## Auth Flow
//!
//! 1. The identity service issues an RS256 JWT on login
//! 2. Clients send `Authorization: Bearer <JWT>` on mutating requests
//! 3. The server:
//!    - Lets `GET`/`HEAD`/`OPTIONS` through without checks
//!    - Verifies signature, expiry, not-before, issuer, subject
//!    - Extracts `username` and `userId` into [`AuthenticatedUser`]
//!
//! ## Security
//!
//! - The public key comes from configuration, never from source
//! - Verification is local; no key fetching per request
//! - Failure responses never include the token or key material

pub mod claims;
pub mod error;
pub mod extractor;
pub mod header;
pub mod middleware;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::{AuthenticatedUser, UserClaims};
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use header::{extract_token, format_header};
pub use middleware::{authorization_gate, GateDecision};
pub use verifier::TokenVerifier;
