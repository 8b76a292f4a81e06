// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Content Storage Module
//!
//! Persistent storage for articles and projects in an embedded redb
//! database. All writes run in ACID transactions; ownership checks run
//! inside the same write transaction as the mutation they guard.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   content.redb     # articles, projects, sequences
//! ```

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{ContentDatabase, StorageError, StorageResult, DB_FILE_NAME};
pub use ownership::{OwnedResource, OwnershipPolicy};
pub use repository::{
    ArticleContent, ArticlePage, ArticleQuery, ArticleRepository, NewProject, ProjectChanges,
    ProjectRepository,
};
