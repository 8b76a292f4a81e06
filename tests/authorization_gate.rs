// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end checks of the authorization gate through the full router.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use portfolio_server::{api::router, storage::OwnershipPolicy};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn article_body(title: &str) -> Value {
    json!({ "title": title, "content": "# Hello", "category": "Programming" })
}

#[tokio::test]
async fn delete_without_header_is_rejected_before_lookup() {
    let (state, _dir) = common::state(OwnershipPolicy::AnyAuthenticated);
    let app = router(state);

    let (status, body) = call(&app, Method::DELETE, "/api/articles/5", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "success": false, "error": "missing authorization header" })
    );
}

#[tokio::test]
async fn unknown_api_paths_are_gated_and_enveloped() {
    let (state, _dir) = common::state(OwnershipPolicy::AnyAuthenticated);
    let app = router(state);

    for (method, uri) in [
        (Method::POST, "/api/unknown"),
        (Method::DELETE, "/api/articles/5/extra"),
    ] {
        let (status, body) = call(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "missing authorization header");
    }

    let (status, body) = call(&app, Method::GET, "/api/unknown", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Not found" }));

    let token = common::token("hulio", 1);
    let (status, body) = call(&app, Method::POST, "/api/unknown", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn reads_are_never_gated() {
    let (state, _dir) = common::state(OwnershipPolicy::AnyAuthenticated);
    let app = router(state);

    let (status, _) = call(&app, Method::GET, "/api/articles/5", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::GET, "/api/articles/5", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::GET, "/api/articles", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn malformed_and_forged_tokens_are_rejected() {
    let (state, _dir) = common::state(OwnershipPolicy::AnyAuthenticated);
    let app = router(state);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/articles",
        Some("a b"),
        Some(article_body("x")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid authorization header format");

    let forged = common::sign_with(&common::claims("hulio", 1), common::FOREIGN_KEY);
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/articles",
        Some(&forged),
        Some(article_body("x")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token verification failed");

    let mut expired = common::claims("hulio", 1);
    expired.exp = Some(chrono::Utc::now().timestamp() - 60);
    let expired = common::sign_with(&expired, common::SIGNING_KEY);
    let (status, body) = call(&app, Method::DELETE, "/api/projects/1", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token expired");

    let (_, listing) = call(&app, Method::GET, "/api/articles?includeDrafts=true", None, None).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn authorized_article_lifecycle() {
    let (state, _dir) = common::state(OwnershipPolicy::AnyAuthenticated);
    let app = router(state);
    let token = common::token("hulio", 7);

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/articles",
        Some(&token),
        Some(article_body("First")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["author_id"], 7);
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/articles/{id}"),
        Some(&token),
        Some(json!({ "status": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, public) = call(&app, Method::GET, "/api/articles", None, None).await;
    assert_eq!(public["total"], 0);

    let (status, deleted) = call(
        &app,
        Method::DELETE,
        &format!("/api/articles/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], true);

    let (status, _) = call(&app, Method::GET, &format!("/api/articles/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_only_policy_blocks_other_users() {
    let (state, _dir) = common::state(OwnershipPolicy::AuthorOnly);
    let app = router(state);
    let author = common::token("author", 1);
    let other = common::token("other", 2);

    let (_, created) = call(
        &app,
        Method::POST,
        "/api/articles",
        Some(&author),
        Some(article_body("Mine")),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/articles/{id}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = call(&app, Method::GET, &format!("/api/articles/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn auth_check_reports_identity_without_echoing_token() {
    let (state, _dir) = common::state(OwnershipPolicy::AnyAuthenticated);
    let app = router(state);
    let token = common::token("hulio", 3);

    let (status, body) = call(&app, Method::POST, "/api/auth-check", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "hulio");
    assert!(!body.to_string().contains(&token));

    let (status, _) = call(&app, Method::POST, "/api/auth-check", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_probes_sit_outside_the_gate() {
    let (state, _dir) = common::state(OwnershipPolicy::AnyAuthenticated);
    let app = router(state);

    for path in ["/health", "/health/live", "/health/ready"] {
        let (status, _) = call(&app, Method::GET, path, None, None).await;
        assert_eq!(status, StatusCode::OK, "{path}");
    }
}
