// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use super::parse_id;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        is_valid_category, is_valid_status, normalize_optional, Article, ArticleListResponse,
        CreateArticleRequest, DataResponse, MessageResponse, UpdateArticleRequest,
        PRESET_CATEGORIES, STATUS_PUBLISHED,
    },
    state::AppState,
    storage::{ArticleContent, ArticleQuery},
};

pub const DEFAULT_PAGE_SIZE: usize = 8;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListArticlesQuery {
    /// 1-based page number (default 1)
    pub page: Option<usize>,
    /// Page size (default 8, max 100)
    pub limit: Option<usize>,
    /// Only articles in this category
    pub category: Option<String>,
    /// Include drafts in the listing
    pub include_drafts: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct GetArticleQuery {
    /// Count this read (default true)
    pub increment_view: Option<bool>,
}

fn validate_category(category: Option<String>) -> Result<Option<String>, ApiError> {
    match normalize_optional(category) {
        Some(category) if !is_valid_category(&category) => Err(ApiError::bad_request(format!(
            "Invalid category, expected one of: {}",
            PRESET_CATEGORIES.join(", ")
        ))),
        category => Ok(category),
    }
}

fn validate_status(status: i16) -> Result<i16, ApiError> {
    if is_valid_status(status) {
        Ok(status)
    } else {
        Err(ApiError::bad_request("Status must be 0 (draft) or 1 (published)"))
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/articles",
    params(ListArticlesQuery),
    tag = "Articles",
    responses(
        (status = 200, body = ArticleListResponse),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_articles(
    State(state): State<AppState>,
    query: Result<Query<ListArticlesQuery>, QueryRejection>,
) -> Result<Json<ArticleListResponse>, ApiError> {
    let Query(params) = query?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let result = state.articles().list(&ArticleQuery {
        include_drafts: params.include_drafts.unwrap_or(false),
        category: normalize_optional(params.category),
        page,
        limit,
    })?;

    Ok(Json(ArticleListResponse {
        success: true,
        articles: result.articles,
        total: result.total,
        page,
        limit,
    }))
}

#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = CreateArticleRequest,
    tag = "Articles",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = DataResponse<Article>),
        (status = 400, description = "Missing title or content"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Author mismatch under the author-only policy")
    )
)]
pub async fn create_article(
    State(state): State<AppState>,
    Auth(user): Auth,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Article>>), ApiError> {
    let Json(request) = payload?;

    let title = request.title.trim();
    if title.is_empty() || request.content.trim().is_empty() {
        return Err(ApiError::bad_request("Title and content are required"));
    }

    let category = validate_category(request.category)?;
    let status = validate_status(request.status.unwrap_or(STATUS_PUBLISHED))?;
    let author_id = request.author_id.unwrap_or(user.user_id);
    state.ownership.authorize_author(&user, author_id)?;

    let article = state.articles().create(
        author_id,
        ArticleContent {
            title: title.to_string(),
            summary: normalize_optional(request.summary),
            content: request.content,
            category,
            tags: clean_tags(request.tags),
            status,
        },
    )?;

    info!(article_id = article.id, author_id, user_id = user.user_id, "Article created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(article, "Article created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(
        ("id" = i64, Path, description = "Article id"),
        GetArticleQuery
    ),
    tag = "Articles",
    responses(
        (status = 200, body = DataResponse<Article>),
        (status = 400, description = "Invalid article ID"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<GetArticleQuery>, QueryRejection>,
) -> Result<Json<DataResponse<Article>>, ApiError> {
    let id = parse_id(&id, "article")?;
    let Query(params) = query?;

    let article = if params.increment_view.unwrap_or(true) {
        state.articles().get_and_increment_views(id)?
    } else {
        state.articles().get(id)?
    };

    Ok(Json(DataResponse::new(article)))
}

#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    request_body = UpdateArticleRequest,
    tag = "Articles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = DataResponse<Article>),
        (status = 400, description = "Invalid id or missing title/content"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the author under the author-only policy"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn update_article(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    payload: Result<Json<UpdateArticleRequest>, JsonRejection>,
) -> Result<Json<DataResponse<Article>>, ApiError> {
    let id = parse_id(&id, "article")?;
    let Json(request) = payload?;
    let policy = state.ownership;
    let authorize = |article: &Article| policy.authorize(&user, article);

    let article = if request.is_status_only() {
        let status = validate_status(request.status.unwrap_or(STATUS_PUBLISHED))?;
        state.articles().update_status(id, status, authorize)?
    } else {
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let content = request.content.filter(|c| !c.trim().is_empty());
        let (Some(title), Some(content)) = (title, content) else {
            return Err(ApiError::bad_request("Title and content are required"));
        };

        let update = ArticleContent {
            title: title.to_string(),
            summary: normalize_optional(request.summary),
            content,
            category: validate_category(request.category)?,
            tags: clean_tags(request.tags.unwrap_or_default()),
            status: validate_status(request.status.unwrap_or(STATUS_PUBLISHED))?,
        };
        state.articles().update_full(id, update, authorize)?
    };

    info!(article_id = id, user_id = user.user_id, status = article.status, "Article updated");

    Ok(Json(DataResponse::with_message(
        article,
        "Article updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    tag = "Articles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid article ID"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the author under the author-only policy"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "article")?;
    let policy = state.ownership;

    state
        .articles()
        .delete(id, |article| policy.authorize(&user, article))?;

    info!(article_id = id, user_id = user.user_id, "Article deleted");

    Ok(Json(MessageResponse::new("Article deleted successfully")))
}
