// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded from them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding `content.redb` | `./data` |
//! | `JWT_PUBLIC_KEY` | RSA public key (PEM) used to verify tokens | one of the two key variables is required |
//! | `JWT_PUBLIC_KEY_FILE` | Path to the PEM public key | |
//! | `JWT_ISSUER` | Expected `iss` claim | `hulio-user-service` |
//! | `JWT_SUBJECT` | Expected `sub` claim | `user-token` |
//! | `JWT_LEEWAY_SECS` | Clock skew allowed on `exp`/`nbf` | `0` |
//! | `OWNERSHIP_POLICY` | `any-authenticated` or `author-only` | `any-authenticated` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::verifier::{DEFAULT_ISSUER, DEFAULT_SUBJECT};
use crate::auth::TokenVerifier;
use crate::logging::LogFormat;
use crate::storage::OwnershipPolicy;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the database directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable holding the PEM-encoded public key inline.
///
/// The key is configuration, not a source constant, so it can be rotated
/// without a rebuild.
pub const JWT_PUBLIC_KEY_ENV: &str = "JWT_PUBLIC_KEY";

/// Environment variable pointing at a PEM public key file.
///
/// Used when `JWT_PUBLIC_KEY` is not set.
pub const JWT_PUBLIC_KEY_FILE_ENV: &str = "JWT_PUBLIC_KEY_FILE";

/// Environment variable for the expected token issuer.
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";

/// Environment variable for the expected token subject.
pub const JWT_SUBJECT_ENV: &str = "JWT_SUBJECT";

/// Environment variable for the clock leeway in seconds.
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";

/// Environment variable selecting the ownership policy.
pub const OWNERSHIP_POLICY_ENV: &str = "OWNERSHIP_POLICY";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("either {JWT_PUBLIC_KEY_ENV} or {JWT_PUBLIC_KEY_FILE_ENV} must be set")]
    MissingPublicKey,

    #[error("failed to read public key file {path}: {source}")]
    PublicKeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid RSA public key: {0}")]
    InvalidPublicKey(#[source] jsonwebtoken::errors::Error),

    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

/// Settings for the token verifier.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// PEM bytes of the RSA public key.
    pub public_key_pem: Vec<u8>,
    pub issuer: String,
    pub subject: String,
    pub leeway_secs: u64,
}

impl JwtConfig {
    /// Build the verifier described by this configuration.
    pub fn build_verifier(&self) -> Result<TokenVerifier, ConfigError> {
        let verifier = TokenVerifier::from_rsa_pem(
            &self.public_key_pem,
            self.issuer.clone(),
            self.subject.clone(),
        )
        .map_err(ConfigError::InvalidPublicKey)?;
        Ok(verifier.with_leeway(self.leeway_secs))
    }
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt: JwtConfig,
    pub ownership: OwnershipPolicy,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var(PORT_ENV) {
            Some(value) => parse_value(PORT_ENV, &value)?,
            None => DEFAULT_PORT,
        };
        let data_dir = var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let public_key_pem = match (var(JWT_PUBLIC_KEY_ENV), var(JWT_PUBLIC_KEY_FILE_ENV)) {
            (Some(pem), _) => pem.replace("\\n", "\n").into_bytes(),
            (None, Some(path)) => {
                let path = PathBuf::from(path);
                std::fs::read(&path).map_err(|source| ConfigError::PublicKeyFile { path, source })?
            }
            (None, None) => return Err(ConfigError::MissingPublicKey),
        };

        let leeway_secs = match var(JWT_LEEWAY_ENV) {
            Some(value) => parse_value(JWT_LEEWAY_ENV, &value)?,
            None => 0,
        };

        let ownership = match var(OWNERSHIP_POLICY_ENV) {
            Some(value) => value
                .parse::<OwnershipPolicy>()
                .map_err(|message| ConfigError::InvalidValue {
                    name: OWNERSHIP_POLICY_ENV,
                    message,
                })?,
            None => OwnershipPolicy::default(),
        };

        let log_format = match var(LOG_FORMAT_ENV) {
            Some(value) => value
                .parse::<LogFormat>()
                .map_err(|message| ConfigError::InvalidValue {
                    name: LOG_FORMAT_ENV,
                    message,
                })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            data_dir,
            jwt: JwtConfig {
                public_key_pem,
                issuer: var(JWT_ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
                subject: var(JWT_SUBJECT_ENV).unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
                leeway_secs,
            },
            ownership,
            log_format,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                name: HOST_ENV,
                message: e.to_string(),
            })
    }
}

fn parse_value<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            message: e.to_string(),
        })
}
