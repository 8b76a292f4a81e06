// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

#![allow(dead_code)]

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use portfolio_server::{
    auth::{verifier::DEFAULT_ISSUER, verifier::DEFAULT_SUBJECT, TokenVerifier, UserClaims},
    state::AppState,
    storage::{ContentDatabase, OwnershipPolicy},
};
use tempfile::TempDir;

pub const SIGNING_KEY: &str = include_str!("../fixtures/signing_key.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/signing_key.pub.pem");
pub const FOREIGN_KEY: &str = include_str!("../fixtures/foreign_key.pem");

pub fn verifier() -> TokenVerifier {
    TokenVerifier::from_rsa_pem(PUBLIC_KEY.as_bytes(), DEFAULT_ISSUER, DEFAULT_SUBJECT).unwrap()
}

pub fn state(policy: OwnershipPolicy) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = ContentDatabase::open_in_dir(dir.path()).unwrap();
    (AppState::new(db, verifier(), policy), dir)
}

pub fn claims(username: &str, user_id: i64) -> UserClaims {
    let now = Utc::now().timestamp();
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

pub fn sign_with(claims: &UserClaims, private_key_pem: &str) -> String {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).unwrap();
    encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
}

pub fn token(username: &str, user_id: i64) -> String {
    sign_with(&claims(username, user_id), SIGNING_KEY)
}
