// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the content database.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using [`ContentDatabase`](super::ContentDatabase) for all transactions.

pub mod articles;
pub mod projects;

pub use articles::{ArticleContent, ArticlePage, ArticleQuery, ArticleRepository};
pub use projects::{NewProject, ProjectChanges, ProjectRepository};
