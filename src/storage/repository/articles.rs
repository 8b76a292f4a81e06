// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Article repository.
//!
//! Articles are stored as JSON documents in the `articles` table, keyed by
//! an id drawn from the `articles` sequence.

use chrono::{DateTime, Utc};

use super::super::database::{ContentDatabase, ARTICLES};
use super::super::{OwnedResource, StorageError, StorageResult};
use crate::models::{Article, STATUS_PUBLISHED};

const SEQUENCE: &str = "articles";

impl OwnedResource for Article {
    fn owner_user_id(&self) -> i64 {
        self.author_id
    }

    fn describe(&self) -> String {
        format!("article {}", self.id)
    }
}

/// Fields supplied when creating or fully replacing an article.
#[derive(Debug, Clone, Default)]
pub struct ArticleContent {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub status: i16,
}

/// Listing filter.
#[derive(Debug, Clone)]
pub struct ArticleQuery {
    /// Include drafts alongside published articles.
    pub include_drafts: bool,
    pub category: Option<String>,
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            include_drafts: false,
            category: None,
            page: 1,
            limit: 8,
        }
    }
}

/// One page of articles plus the size of the filtered set.
#[derive(Debug, Clone)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total: usize,
}

/// Repository for article operations.
pub struct ArticleRepository<'a> {
    db: &'a ContentDatabase,
}

impl<'a> ArticleRepository<'a> {
    pub fn new(db: &'a ContentDatabase) -> Self {
        Self { db }
    }

    /// Store a new article attributed to `author_id`.
    pub fn create(&self, author_id: i64, content: ArticleContent) -> StorageResult<Article> {
        self.create_at(author_id, content, Utc::now())
    }

    fn create_at(
        &self,
        author_id: i64,
        content: ArticleContent,
        now: DateTime<Utc>,
    ) -> StorageResult<Article> {
        self.db.insert_document(ARTICLES, SEQUENCE, |id| Article {
            id,
            title: content.title,
            summary: content.summary,
            content: content.content,
            author_id,
            category: content.category,
            created_at: now,
            updated_at: now,
            tags: content.tags,
            view_count: 0,
            status: content.status,
        })
    }

    /// Get an article by ID.
    pub fn get(&self, id: i64) -> StorageResult<Article> {
        self.db
            .get_document(ARTICLES, id)?
            .ok_or(StorageError::NotFound {
                resource: "Article",
                id,
            })
    }

    /// Get an article and count the read in the same transaction.
    pub fn get_and_increment_views(&self, id: i64) -> StorageResult<Article> {
        self.db
            .modify_document::<Article>(ARTICLES, id, |article| {
                article.view_count += 1;
                Ok(())
            })?
            .ok_or(StorageError::NotFound {
                resource: "Article",
                id,
            })
    }

    /// List articles newest first.
    pub fn list(&self, query: &ArticleQuery) -> StorageResult<ArticlePage> {
        let mut articles: Vec<Article> = self
            .db
            .list_documents::<Article>(ARTICLES)?
            .into_iter()
            .filter(|a| query.include_drafts || a.status == STATUS_PUBLISHED)
            .filter(|a| match &query.category {
                Some(category) => a.category.as_deref() == Some(category.as_str()),
                None => true,
            })
            .collect();

        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = articles.len();
        let offset = query.page.saturating_sub(1).saturating_mul(query.limit);
        let articles = articles.into_iter().skip(offset).take(query.limit).collect();

        Ok(ArticlePage { articles, total })
    }

    /// Replace the editable fields of an article.
    ///
    /// `authorize` sees the stored article before anything is written.
    pub fn update_full(
        &self,
        id: i64,
        content: ArticleContent,
        authorize: impl FnOnce(&Article) -> StorageResult<()>,
    ) -> StorageResult<Article> {
        self.db
            .modify_document::<Article>(ARTICLES, id, |article| {
                authorize(article)?;
                article.title = content.title;
                article.summary = content.summary;
                article.content = content.content;
                article.category = content.category;
                article.tags = content.tags;
                article.status = content.status;
                article.updated_at = Utc::now();
                Ok(())
            })?
            .ok_or(StorageError::NotFound {
                resource: "Article",
                id,
            })
    }

    /// Publish or unpublish an article, leaving other fields untouched.
    pub fn update_status(
        &self,
        id: i64,
        status: i16,
        authorize: impl FnOnce(&Article) -> StorageResult<()>,
    ) -> StorageResult<Article> {
        self.db
            .modify_document::<Article>(ARTICLES, id, |article| {
                authorize(article)?;
                article.status = status;
                article.updated_at = Utc::now();
                Ok(())
            })?
            .ok_or(StorageError::NotFound {
                resource: "Article",
                id,
            })
    }

    /// Delete an article.
    pub fn delete(
        &self,
        id: i64,
        authorize: impl FnOnce(&Article) -> StorageResult<()>,
    ) -> StorageResult<()> {
        if self.db.remove_document(ARTICLES, id, authorize)? {
            Ok(())
        } else {
            Err(StorageError::NotFound {
                resource: "Article",
                id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATUS_DRAFT;
    use chrono::Duration;

    fn test_db() -> (ContentDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = ContentDatabase::open_in_dir(dir.path()).unwrap();
        (db, dir)
    }

    fn content(title: &str, category: Option<&str>, status: i16) -> ArticleContent {
        ArticleContent {
            title: title.to_string(),
            summary: None,
            content: format!("# {title}"),
            category: category.map(str::to_string),
            tags: vec!["rust".to_string()],
            status,
        }
    }

    fn allow(_: &Article) -> StorageResult<()> {
        Ok(())
    }

    #[test]
    fn create_and_get() {
        let (db, _dir) = test_db();
        let repo = ArticleRepository::new(&db);

        let created = repo
            .create(7, content("Hello", Some("Life"), STATUS_PUBLISHED))
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.author_id, 7);
        assert_eq!(created.view_count, 0);

        assert_eq!(repo.get(1).unwrap(), created);
        assert!(matches!(
            repo.get(99),
            Err(StorageError::NotFound { id: 99, .. })
        ));
    }

    #[test]
    fn views_are_counted() {
        let (db, _dir) = test_db();
        let repo = ArticleRepository::new(&db);
        repo.create(1, content("A", None, STATUS_PUBLISHED)).unwrap();

        repo.get_and_increment_views(1).unwrap();
        let article = repo.get_and_increment_views(1).unwrap();
        assert_eq!(article.view_count, 2);
        assert_eq!(repo.get(1).unwrap().view_count, 2);
    }

    #[test]
    fn list_filters_and_paginates() {
        let (db, _dir) = test_db();
        let repo = ArticleRepository::new(&db);
        let base = Utc::now();

        repo.create_at(1, content("old", Some("Life"), STATUS_PUBLISHED), base)
            .unwrap();
        repo.create_at(
            1,
            content("draft", Some("Life"), STATUS_DRAFT),
            base + Duration::seconds(1),
        )
        .unwrap();
        repo.create_at(
            1,
            content("code", Some("Programming"), STATUS_PUBLISHED),
            base + Duration::seconds(2),
        )
        .unwrap();
        repo.create_at(
            1,
            content("new", Some("Life"), STATUS_PUBLISHED),
            base + Duration::seconds(3),
        )
        .unwrap();

        let page = repo.list(&ArticleQuery::default()).unwrap();
        assert_eq!(page.total, 3);
        let titles: Vec<_> = page.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["new", "code", "old"]);

        let drafts = repo
            .list(&ArticleQuery {
                include_drafts: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(drafts.total, 4);

        let life = repo
            .list(&ArticleQuery {
                category: Some("Life".into()),
                page: 2,
                limit: 1,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(life.total, 2);
        assert_eq!(life.articles.len(), 1);
        assert_eq!(life.articles[0].title, "old");

        let beyond = repo
            .list(&ArticleQuery {
                page: 10,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(beyond.total, 3);
        assert!(beyond.articles.is_empty());
    }

    #[test]
    fn status_update_keeps_other_fields() {
        let (db, _dir) = test_db();
        let repo = ArticleRepository::new(&db);
        let created = repo
            .create(1, content("Keep", Some("Life"), STATUS_PUBLISHED))
            .unwrap();

        let updated = repo.update_status(created.id, STATUS_DRAFT, allow).unwrap();
        assert_eq!(updated.status, STATUS_DRAFT);
        assert_eq!(updated.title, "Keep");
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.tags, created.tags);
    }

    #[test]
    fn full_update_replaces_fields() {
        let (db, _dir) = test_db();
        let repo = ArticleRepository::new(&db);
        repo.create(1, content("Before", Some("Life"), STATUS_PUBLISHED))
            .unwrap();

        let updated = repo
            .update_full(1, content("After", None, STATUS_DRAFT), allow)
            .unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.category, None);
        assert_eq!(updated.author_id, 1);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[test]
    fn denied_mutations_change_nothing() {
        let (db, _dir) = test_db();
        let repo = ArticleRepository::new(&db);
        repo.create(1, content("Mine", None, STATUS_PUBLISHED)).unwrap();

        let deny = |article: &Article| {
            Err(StorageError::PermissionDenied {
                user_id: 2,
                resource: article.describe(),
            })
        };

        assert!(matches!(
            repo.update_status(1, STATUS_DRAFT, deny),
            Err(StorageError::PermissionDenied { .. })
        ));
        assert!(matches!(
            repo.delete(1, deny),
            Err(StorageError::PermissionDenied { .. })
        ));
        assert_eq!(repo.get(1).unwrap().status, STATUS_PUBLISHED);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let (db, _dir) = test_db();
        let repo = ArticleRepository::new(&db);
        repo.create(1, content("Gone", None, STATUS_PUBLISHED)).unwrap();

        repo.delete(1, allow).unwrap();
        assert!(matches!(
            repo.delete(1, allow),
            Err(StorageError::NotFound { id: 1, .. })
        ));
    }
}
