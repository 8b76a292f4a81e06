// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed client for the content API.
//!
//! Mutating requests carry `Authorization: Bearer <token>` taken from a
//! [`TokenSource`], normally the [`SessionStore`](super::SessionStore).
//! Reads go out without credentials.

use std::sync::Arc;

use reqwest::{header::AUTHORIZATION, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::auth::{format_header, middleware::is_mutating};
use crate::models::{
    Article, ArticleListResponse, CategoryListResponse, CreateArticleRequest,
    CreateProjectRequest, DataResponse, MessageResponse, Project, ProjectListResponse,
    ProjectResponse, UpdateArticleRequest, UpdateProjectRequest,
};

/// Supplies the bearer token for mutating requests.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }
}

/// Fixed token, or none.
impl TokenSource for Option<String> {
    fn bearer_token(&self) -> Option<String> {
        self.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContentClientError {
    #[error("content request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid content API URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a non-success status.
    #[error("content API returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ContentClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ContentClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Listing filters for [`ContentClient::list_articles`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_drafts: Option<bool>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct ContentClient<T> {
    http: reqwest::Client,
    base: Url,
    tokens: T,
}

impl<T: TokenSource> ContentClient<T> {
    /// Client for the server at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str, tokens: T) -> Result<Self, ContentClientError> {
        Self::with_client(reqwest::Client::new(), base_url, tokens)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        tokens: T,
    ) -> Result<Self, ContentClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base, tokens })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ContentClientError> {
        let url = self.base.join(path.trim_start_matches('/'))?;
        let mut builder = self.http.request(method.clone(), url);
        if is_mutating(&method) {
            if let Some(token) = self.tokens.bearer_token() {
                builder = builder.header(AUTHORIZATION, format_header(&token));
            }
        }
        Ok(builder)
    }

    // =========================================================================
    // Articles
    // =========================================================================

    pub async fn list_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<ArticleListResponse, ContentClientError> {
        send(self.request(Method::GET, "api/articles")?.query(filter)).await
    }

    /// Fetch one article; `count_view` controls the view counter.
    pub async fn get_article(&self, id: i64, count_view: bool) -> Result<Article, ContentClientError> {
        let builder = self
            .request(Method::GET, &format!("api/articles/{id}"))?
            .query(&[("incrementView", count_view)]);
        Ok(send::<DataResponse<Article>>(builder).await?.data)
    }

    pub async fn create_article(
        &self,
        article: &CreateArticleRequest,
    ) -> Result<Article, ContentClientError> {
        let builder = self.request(Method::POST, "api/articles")?.json(article);
        Ok(send::<DataResponse<Article>>(builder).await?.data)
    }

    pub async fn update_article(
        &self,
        id: i64,
        update: &UpdateArticleRequest,
    ) -> Result<Article, ContentClientError> {
        let builder = self
            .request(Method::PUT, &format!("api/articles/{id}"))?
            .json(update);
        Ok(send::<DataResponse<Article>>(builder).await?.data)
    }

    pub async fn delete_article(&self, id: i64) -> Result<MessageResponse, ContentClientError> {
        send(self.request(Method::DELETE, &format!("api/articles/{id}"))?).await
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub async fn list_projects(&self) -> Result<Vec<Project>, ContentClientError> {
        let response: ProjectListResponse = send(self.request(Method::GET, "api/projects")?).await?;
        Ok(response.projects)
    }

    pub async fn get_project(&self, id: i64) -> Result<Project, ContentClientError> {
        let response: ProjectResponse =
            send(self.request(Method::GET, &format!("api/projects/{id}"))?).await?;
        Ok(response.project)
    }

    pub async fn create_project(
        &self,
        project: &CreateProjectRequest,
    ) -> Result<Project, ContentClientError> {
        let builder = self.request(Method::POST, "api/projects")?.json(project);
        Ok(send::<DataResponse<Project>>(builder).await?.data)
    }

    pub async fn update_project(
        &self,
        id: i64,
        update: &UpdateProjectRequest,
    ) -> Result<Project, ContentClientError> {
        let builder = self
            .request(Method::PUT, &format!("api/projects/{id}"))?
            .json(update);
        Ok(send::<DataResponse<Project>>(builder).await?.data)
    }

    pub async fn delete_project(&self, id: i64) -> Result<MessageResponse, ContentClientError> {
        send(self.request(Method::DELETE, &format!("api/projects/{id}"))?).await
    }

    pub async fn list_categories(&self) -> Result<Vec<String>, ContentClientError> {
        let response: CategoryListResponse =
            send(self.request(Method::GET, "api/categories")?).await?;
        Ok(response.categories)
    }
}

async fn send<R: DeserializeOwned>(builder: RequestBuilder) -> Result<R, ContentClientError> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error.or(body.message))
        .unwrap_or(text);
    Err(ContentClientError::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl TokenSource for Fixed {
        fn bearer_token(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn header_of(builder: RequestBuilder) -> Option<String> {
        builder
            .build()
            .unwrap()
            .headers()
            .get(AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn bearer_only_on_mutating_methods() {
        let client = ContentClient::new("http://localhost:8080", Fixed("abc")).unwrap();

        let read = client.request(Method::GET, "api/articles").unwrap();
        assert_eq!(header_of(read), None);

        let write = client.request(Method::DELETE, "api/articles/5").unwrap();
        assert_eq!(header_of(write).as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn missing_token_sends_no_header() {
        let client = ContentClient::new("http://localhost:8080", None::<String>).unwrap();
        let write = client.request(Method::POST, "api/articles").unwrap();
        assert_eq!(header_of(write), None);
    }

    #[test]
    fn base_path_is_preserved() {
        let client = ContentClient::new("http://host/blog", None::<String>).unwrap();
        let request = client
            .request(Method::GET, "/api/categories")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://host/blog/api/categories");
    }
}
