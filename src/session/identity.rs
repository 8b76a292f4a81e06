// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client for the external identity service.
//!
//! The service answers every call with the envelope
//! `{ success, code, message, data: { token, user } }`.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use super::state::UserProfile;
use crate::auth::format_header;

/// Default identity service endpoint.
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://www.hulio88.xyz/user-service/api/v1/user";

/// Login credentials.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Partial profile update. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// `data` of a successful identity response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserProfile,
}

/// Identity service response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The service answered `success: false`.
    #[error("{message}")]
    Rejected { code: Option<i64>, message: String },

    /// The service refused the bearer token (HTTP 401).
    #[error("token rejected: {0}")]
    Unauthorized(String),

    #[error("identity service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid identity service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unexpected identity service response: {0}")]
    InvalidResponse(String),
}

impl IdentityError {
    /// Whether the failure means the held token is no longer usable.
    pub fn is_token_problem(&self) -> bool {
        match self {
            IdentityError::Unauthorized(_) => true,
            IdentityError::Rejected { message, .. } => message.to_lowercase().contains("token"),
            _ => false,
        }
    }
}

/// Operations the session store needs from the identity service.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Exchange credentials for a token and profile.
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, IdentityError>;

    /// Fetch the profile behind `token`.
    async fn fetch_user(&self, token: &str) -> Result<AuthPayload, IdentityError>;

    /// Apply a partial profile update.
    async fn update_user(
        &self,
        token: &str,
        update: &UserUpdate,
    ) -> Result<AuthPayload, IdentityError>;
}

/// HTTPS client for the identity service.
#[derive(Debug, Clone)]
pub struct HttpIdentityService {
    http: reqwest::Client,
    base: String,
}

impl HttpIdentityService {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, IdentityError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, IdentityError> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            http,
            base: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, suffix: &str) -> Result<Url, IdentityError> {
        Ok(Url::parse(&format!("{}{suffix}", self.base))?)
    }
}

async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, IdentityError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let envelope = serde_json::from_slice::<Envelope<T>>(&bytes);

    if status == StatusCode::UNAUTHORIZED {
        let message = envelope
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| "unauthorized".to_string());
        return Err(IdentityError::Unauthorized(message));
    }

    let envelope = envelope.map_err(|e| {
        IdentityError::InvalidResponse(format!("HTTP {}: {e}", status.as_u16()))
    })?;

    if !envelope.success {
        return Err(IdentityError::Rejected {
            code: envelope.code,
            message: envelope
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("request failed with HTTP {}", status.as_u16())),
        });
    }

    envelope
        .data
        .ok_or_else(|| IdentityError::InvalidResponse("missing data".to_string()))
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, IdentityError> {
        let response = self
            .http
            .post(self.endpoint("/login")?)
            .json(credentials)
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn fetch_user(&self, token: &str) -> Result<AuthPayload, IdentityError> {
        let response = self
            .http
            .get(self.endpoint("")?)
            .header(AUTHORIZATION, format_header(token))
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn update_user(
        &self,
        token: &str,
        update: &UserUpdate,
    ) -> Result<AuthPayload, IdentityError> {
        let response = self
            .http
            .put(self.endpoint("")?)
            .header(AUTHORIZATION, format_header(token))
            .json(update)
            .send()
            .await?;
        read_envelope(response).await
    }
}
