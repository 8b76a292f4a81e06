// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Project repository.

use chrono::Utc;

use super::super::database::{ContentDatabase, PROJECTS};
use super::super::{StorageError, StorageResult};
use crate::models::{Project, STATUS_PUBLISHED};

const SEQUENCE: &str = "projects";

/// Fields supplied when creating a project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub github: Option<String>,
    pub picture: Option<String>,
}

/// Partial project update.
///
/// Outer `None` leaves a field alone; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub github: Option<Option<String>>,
    pub picture: Option<Option<String>>,
    pub status: Option<i16>,
}

/// Repository for project operations.
pub struct ProjectRepository<'a> {
    db: &'a ContentDatabase,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(db: &'a ContentDatabase) -> Self {
        Self { db }
    }

    /// Store a new, published project.
    pub fn create(&self, project: NewProject) -> StorageResult<Project> {
        let now = Utc::now();
        self.db.insert_document(PROJECTS, SEQUENCE, |id| Project {
            id,
            name: project.name,
            description: project.description,
            url: project.url,
            github: project.github,
            picture: project.picture,
            status: STATUS_PUBLISHED,
            created_time: now,
            updated_time: now,
        })
    }

    /// Get a project by ID.
    pub fn get(&self, id: i64) -> StorageResult<Project> {
        self.db
            .get_document(PROJECTS, id)?
            .ok_or(StorageError::NotFound {
                resource: "Project",
                id,
            })
    }

    /// List all projects, newest first.
    pub fn list(&self) -> StorageResult<Vec<Project>> {
        let mut projects = self.db.list_documents::<Project>(PROJECTS)?;
        projects.sort_by(|a, b| b.created_time.cmp(&a.created_time).then(b.id.cmp(&a.id)));
        Ok(projects)
    }

    /// Apply a partial update.
    pub fn update(&self, id: i64, changes: ProjectChanges) -> StorageResult<Project> {
        self.db
            .modify_document::<Project>(PROJECTS, id, |project| {
                if let Some(name) = changes.name {
                    project.name = name;
                }
                if let Some(description) = changes.description {
                    project.description = description;
                }
                if let Some(url) = changes.url {
                    project.url = url;
                }
                if let Some(github) = changes.github {
                    project.github = github;
                }
                if let Some(picture) = changes.picture {
                    project.picture = picture;
                }
                if let Some(status) = changes.status {
                    project.status = status;
                }
                project.updated_time = Utc::now();
                Ok(())
            })?
            .ok_or(StorageError::NotFound {
                resource: "Project",
                id,
            })
    }

    /// Delete a project.
    pub fn delete(&self, id: i64) -> StorageResult<()> {
        if self.db.remove_document::<Project>(PROJECTS, id, |_| Ok(()))? {
            Ok(())
        } else {
            Err(StorageError::NotFound {
                resource: "Project",
                id,
            })
        }
    }
}
