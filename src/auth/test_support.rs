// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token fixtures shared by unit tests.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use super::verifier::{ALGORITHM, DEFAULT_ISSUER, DEFAULT_SUBJECT};
use super::{TokenVerifier, UserClaims};

pub const SIGNING_KEY: &str = include_str!("../../tests/fixtures/signing_key.pem");
pub const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/signing_key.pub.pem");
pub const FOREIGN_KEY: &str = include_str!("../../tests/fixtures/foreign_key.pem");

pub fn verifier() -> TokenVerifier {
    TokenVerifier::from_rsa_pem(PUBLIC_KEY.as_bytes(), DEFAULT_ISSUER, DEFAULT_SUBJECT)
        .expect("fixture public key parses")
}

/// Claims valid for an hour starting at `now`.
pub fn claims_at(username: &str, user_id: i64, now: i64) -> UserClaims {
    UserClaims {
        username: username.to_string(),
        user_id,
        iat: Some(now),
        exp: Some(now + 3600),
        nbf: Some(now),
        iss: Some(DEFAULT_ISSUER.to_string()),
        sub: Some(DEFAULT_SUBJECT.to_string()),
    }
}

pub fn claims(username: &str, user_id: i64) -> UserClaims {
    claims_at(username, user_id, Utc::now().timestamp())
}

pub fn sign(claims: &UserClaims) -> String {
    sign_with(claims, SIGNING_KEY)
}

pub fn sign_with(claims: &UserClaims, private_key_pem: &str) -> String {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).expect("fixture key parses");
    encode(&Header::new(ALGORITHM), claims, &key).expect("token encodes")
}
