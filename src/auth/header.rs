// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `Authorization` header parsing.

/// Authentication scheme accepted by the API.
pub const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization` header value.
///
/// The header must be exactly two space-separated parts, the first being
/// `Bearer`. Anything else (empty header, other scheme, empty token, extra
/// segments) yields `None`. The token itself is not validated here.
pub fn extract_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;

    if parts.next().is_some() || scheme != BEARER_SCHEME || token.is_empty() {
        return None;
    }

    Some(token)
}

/// Build an `Authorization` header value for a token.
pub fn format_header(token: &str) -> String {
    format!("{BEARER_SCHEME} {token}")
}
