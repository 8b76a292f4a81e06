// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RS256 token verification against a configured public key.
//!
//! ## Checks
//!
//! 1. Signature and algorithm (RS256 only)
//! 2. Claim decoding (`username`, `userId` required)
//! 3. `exp`: rejected at or after expiry
//! 4. `nbf`: rejected before the start time
//! 5. `iss` / `sub`: must match configuration when present
//!
//! The key is loaded once at startup; verification never touches the
//! network.

use chrono::Utc;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use super::{AuthError, UserClaims};

/// Issuer stamped on tokens by the identity service.
pub const DEFAULT_ISSUER: &str = "hulio-user-service";

/// Subject stamped on user tokens by the identity service.
pub const DEFAULT_SUBJECT: &str = "user-token";

/// The only accepted signing algorithm.
pub const ALGORITHM: Algorithm = Algorithm::RS256;

/// Stateless token verifier.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    issuer: String,
    subject: String,
    /// Clock skew tolerance in seconds
    leeway: i64,
}

impl TokenVerifier {
    /// Create a verifier from a PEM-encoded RSA public key.
    pub fn from_rsa_pem(
        pem: &[u8],
        issuer: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_rsa_pem(pem)?;

        // Time and identity claims are optional in our tokens, so the crate
        // only checks the signature and algorithm; the rest happens in
        // `check_claims`.
        let mut validation = Validation::new(ALGORITHM);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            key,
            validation,
            issuer: issuer.into(),
            subject: subject.into(),
            leeway: 0,
        })
    }

    /// Allow some clock skew on `exp` and `nbf`.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = i64::try_from(seconds).unwrap_or(i64::MAX);
        self
    }

    /// Expected issuer.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Expected subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<UserClaims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as of `now` (Unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<UserClaims, AuthError> {
        let token_data =
            decode::<UserClaims>(token, &self.key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        AuthError::SignatureInvalid
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        let claims = token_data.claims;
        self.check_claims(&claims, now)?;
        Ok(claims)
    }

    /// Verify a token and discard the failure reason.
    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    fn check_claims(&self, claims: &UserClaims, now: i64) -> Result<(), AuthError> {
        if let Some(exp) = claims.exp {
            if now >= exp.saturating_add(self.leeway) {
                return Err(AuthError::TokenExpired);
            }
        }

        if let Some(nbf) = claims.nbf {
            if now.saturating_add(self.leeway) < nbf {
                return Err(AuthError::TokenNotYetValid);
            }
        }

        if let Some(iss) = &claims.iss {
            if iss != &self.issuer {
                return Err(AuthError::IssuerMismatch);
            }
        }

        if let Some(sub) = &claims.sub {
            if sub != &self.subject {
                return Err(AuthError::SubjectMismatch);
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &ALGORITHM)
            .field("issuer", &self.issuer)
            .field("subject", &self.subject)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{self, FOREIGN_KEY, SIGNING_KEY};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const NOW: i64 = 1_750_000_000;

    #[test]
    fn valid_token_returns_original_identity() {
        let claims = test_support::claims_at("hulio", 42, NOW);
        let token = test_support::sign(&claims);

        let verified = test_support::verifier().verify_at(&token, NOW).unwrap();
        assert_eq!(verified.username, "hulio");
        assert_eq!(verified.user_id, 42);
        assert_eq!(verified, claims);
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = test_support::claims_at("hulio", 1, NOW);
        claims.exp = Some(NOW - 1);
        let token = test_support::sign(&claims);

        let result = test_support::verifier().verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[test]
    fn token_expiring_now_is_rejected() {
        let mut claims = test_support::claims_at("hulio", 1, NOW);
        claims.exp = Some(NOW);
        let token = test_support::sign(&claims);

        let result = test_support::verifier().verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[test]
    fn leeway_extends_expiry() {
        let mut claims = test_support::claims_at("hulio", 1, NOW);
        claims.exp = Some(NOW - 5);
        let token = test_support::sign(&claims);

        let verifier = test_support::verifier().with_leeway(30);
        assert!(verifier.verify_at(&token, NOW).is_ok());
    }

    #[test]
    fn future_nbf_is_rejected() {
        let mut claims = test_support::claims_at("hulio", 1, NOW);
        claims.nbf = Some(NOW + 60);
        let token = test_support::sign(&claims);

        let result = test_support::verifier().verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::TokenNotYetValid));
    }

    #[test]
    fn foreign_key_signature_is_rejected() {
        let claims = test_support::claims_at("hulio", 1, NOW);
        let token = test_support::sign_with(&claims, FOREIGN_KEY);

        let result = test_support::verifier().verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::SignatureInvalid));
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let claims = test_support::claims_at("hulio", 1, NOW);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"shared-secret"),
        )
        .unwrap();

        let result = test_support::verifier().verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::SignatureInvalid));
    }

    #[test]
    fn rs512_with_right_key_is_rejected() {
        let claims = test_support::claims_at("hulio", 1, NOW);
        let token = encode(
            &Header::new(Algorithm::RS512),
            &claims,
            &EncodingKey::from_rsa_pem(SIGNING_KEY.as_bytes()).unwrap(),
        )
        .unwrap();

        let result = test_support::verifier().verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::SignatureInvalid));
    }

    #[test]
    fn issuer_and_subject_mismatches_are_reported() {
        let mut claims = test_support::claims_at("hulio", 1, NOW);
        claims.iss = Some("someone-else".to_string());
        let token = test_support::sign(&claims);
        assert_eq!(
            test_support::verifier().verify_at(&token, NOW),
            Err(AuthError::IssuerMismatch)
        );

        let mut claims = test_support::claims_at("hulio", 1, NOW);
        claims.sub = Some("refresh-token".to_string());
        let token = test_support::sign(&claims);
        assert_eq!(
            test_support::verifier().verify_at(&token, NOW),
            Err(AuthError::SubjectMismatch)
        );
    }

    #[test]
    fn absent_optional_claims_pass() {
        let claims = UserClaims {
            username: "hulio".to_string(),
            user_id: 3,
            iat: None,
            exp: None,
            nbf: None,
            iss: None,
            sub: None,
        };
        let token = test_support::sign(&claims);

        let verified = test_support::verifier().verify_at(&token, NOW).unwrap();
        assert_eq!(verified.user_id, 3);
    }

    #[test]
    fn missing_user_id_is_malformed() {
        let token = encode(
            &Header::new(ALGORITHM),
            &serde_json::json!({ "username": "hulio", "exp": NOW + 60 }),
            &EncodingKey::from_rsa_pem(SIGNING_KEY.as_bytes()).unwrap(),
        )
        .unwrap();

        let result = test_support::verifier().verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::MalformedToken));
    }

    #[test]
    fn garbage_is_malformed_and_invalid() {
        let verifier = test_support::verifier();
        assert_eq!(verifier.verify_at("not-a-jwt", NOW), Err(AuthError::MalformedToken));
        assert!(!verifier.is_valid("not-a-jwt"));
    }

    #[test]
    fn is_valid_accepts_fresh_token() {
        let token = test_support::sign(&test_support::claims("hulio", 1));
        assert!(test_support::verifier().is_valid(&token));
    }

    #[test]
    fn invalid_pem_is_an_error() {
        let result = TokenVerifier::from_rsa_pem(b"not a key", DEFAULT_ISSUER, DEFAULT_SUBJECT);
        assert!(result.is_err());
    }
}
