// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. Stored documents
//! and API payloads share the same types; all derive `ToSchema` for the
//! OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Articles**: blog posts with draft/published status
//! - **Projects**: portfolio entries
//! - **Envelopes**: the `{ success, ... }` wrappers every endpoint returns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Status & Categories
// =============================================================================

/// Article or project hidden from the public listing.
pub const STATUS_DRAFT: i16 = 0;

/// Article or project visible to everyone.
pub const STATUS_PUBLISHED: i16 = 1;

/// Preset article categories.
pub const PRESET_CATEGORIES: [&str; 2] = ["Programming", "Life"];

/// Whether a status value is one of the known states.
pub fn is_valid_status(status: i16) -> bool {
    status == STATUS_DRAFT || status == STATUS_PUBLISHED
}

/// Whether a category is one of the presets.
pub fn is_valid_category(category: &str) -> bool {
    PRESET_CATEGORIES.contains(&category)
}

// =============================================================================
// Article Models
// =============================================================================

/// A blog article.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Article {
    /// Unique numeric identifier.
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    /// Markdown source.
    pub content: String,
    /// User id of the author.
    pub author_id: i64,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    /// Number of detail-page reads.
    pub view_count: i64,
    /// `0` draft, `1` published.
    pub status: i16,
}

/// Request to create an article.
///
/// Missing text fields deserialize as empty so that validation can answer
/// with a 400 envelope instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Defaults to the caller's user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Defaults to published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i16>,
}

/// Request to update an article.
///
/// A body carrying only `status` is a publish/unpublish toggle; any other
/// body replaces the article and must include `title` and `content`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateArticleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i16>,
}

impl UpdateArticleRequest {
    /// Whether this body only toggles the status.
    pub fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.title.is_none()
            && self.summary.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }
}

/// Paginated article listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleListResponse {
    pub success: bool,
    pub articles: Vec<Article>,
    /// Number of articles matching the filter, across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

// =============================================================================
// Project Models
// =============================================================================

/// A portfolio project.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Live site.
    pub url: Option<String>,
    /// Source repository.
    pub github: Option<String>,
    /// Cover image URL.
    pub picture: Option<String>,
    pub status: i16,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
}

/// Request to create a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Partial project update. Blank strings clear optional fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i16>,
}

impl UpdateProjectRequest {
    /// Whether at least one field is present.
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.url.is_some()
            || self.github.is_some()
            || self.picture.is_some()
            || self.status.is_some()
    }
}

/// Project listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectListResponse {
    pub success: bool,
    pub projects: Vec<Project>,
}

/// Single project lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: Project,
}

// =============================================================================
// Envelopes
// =============================================================================

/// `{ success, data, message? }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// `{ success, message }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Category listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponse {
    pub success: bool,
    pub categories: Vec<String>,
}

/// Text cleanup shared by create/update paths: trims and maps blanks to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
