// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded content database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `articles`: article id → serialized Article (JSON bytes)
//! - `projects`: project id → serialized Project (JSON bytes)
//! - `sequences`: sequence name → last issued id

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// Table of JSON documents keyed by numeric id.
pub(crate) type DocumentTable = TableDefinition<'static, i64, &'static [u8]>;

/// Articles: id → serialized Article.
pub(crate) const ARTICLES: DocumentTable = TableDefinition::new("articles");

/// Projects: id → serialized Project.
pub(crate) const PROJECTS: DocumentTable = TableDefinition::new("projects");

/// Sequences: name → last issued id.
const SEQUENCES: TableDefinition<&str, i64> = TableDefinition::new("sequences");

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "content.redb";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("permission denied: user {user_id} cannot modify {resource}")]
    PermissionDenied { user_id: i64, resource: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// ContentDatabase
// =============================================================================

/// Embedded ACID content database.
pub struct ContentDatabase {
    db: Database,
}

impl ContentDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ARTICLES)?;
            let _ = write_txn.open_table(PROJECTS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Open the database file inside a data directory.
    pub fn open_in_dir(data_dir: &Path) -> StorageResult<Self> {
        Self::open(&data_dir.join(DB_FILE_NAME))
    }

    /// Whether a read transaction can be started.
    pub fn is_available(&self) -> bool {
        match self.db.begin_read() {
            Ok(txn) => txn.open_table(ARTICLES).is_ok(),
            Err(_) => false,
        }
    }

    // =========================================================================
    // Document helpers
    // =========================================================================

    /// Read one document.
    pub(crate) fn get_document<T: DeserializeOwned>(
        &self,
        table: DocumentTable,
        id: i64,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Read every document in a table.
    ///
    /// Rows that no longer deserialize are skipped with a warning.
    pub(crate) fn list_documents<T: DeserializeOwned>(
        &self,
        table: DocumentTable,
    ) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;

        let mut documents = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            match serde_json::from_slice(value.value()) {
                Ok(document) => documents.push(document),
                Err(e) => tracing::warn!(id = key.value(), error = %e, "Skipping unreadable document"),
            }
        }
        Ok(documents)
    }

    /// Allocate the next id from `sequence` and store the document built for it.
    pub(crate) fn insert_document<T: Serialize>(
        &self,
        table: DocumentTable,
        sequence: &str,
        build: impl FnOnce(i64) -> T,
    ) -> StorageResult<T> {
        let write_txn = self.db.begin_write()?;
        let document = {
            let mut sequences = write_txn.open_table(SEQUENCES)?;
            let id = sequences.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
            sequences.insert(sequence, id)?;

            let document = build(id);
            let json = serde_json::to_vec(&document)?;
            let mut documents = write_txn.open_table(table)?;
            documents.insert(id, json.as_slice())?;
            document
        };
        write_txn.commit()?;
        Ok(document)
    }

    /// Read-modify-write a document in one transaction.
    ///
    /// Returns `Ok(None)` when the id does not exist. If `modify` fails the
    /// transaction is dropped and nothing is written.
    pub(crate) fn modify_document<T: Serialize + DeserializeOwned>(
        &self,
        table: DocumentTable,
        id: i64,
        modify: impl FnOnce(&mut T) -> StorageResult<()>,
    ) -> StorageResult<Option<T>> {
        let write_txn = self.db.begin_write()?;
        let document = {
            let mut documents = write_txn.open_table(table)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = match documents.get(id)? {
                Some(existing) => existing.value().to_vec(),
                None => return Ok(None),
            };

            let mut document: T = serde_json::from_slice(&existing_bytes)?;
            modify(&mut document)?;

            let json = serde_json::to_vec(&document)?;
            documents.insert(id, json.as_slice())?;
            document
        };
        write_txn.commit()?;
        Ok(Some(document))
    }

    /// Delete a document after `check` approves it.
    ///
    /// Returns `false` when the id does not exist.
    pub(crate) fn remove_document<T: DeserializeOwned>(
        &self,
        table: DocumentTable,
        id: i64,
        check: impl FnOnce(&T) -> StorageResult<()>,
    ) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        {
            let mut documents = write_txn.open_table(table)?;

            let existing_bytes = match documents.get(id)? {
                Some(existing) => existing.value().to_vec(),
                None => return Ok(false),
            };

            let document: T = serde_json::from_slice(&existing_bytes)?;
            check(&document)?;
            documents.remove(id)?;
        }
        write_txn.commit()?;
        Ok(true)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: i64,
        text: String,
    }

    fn temp_db() -> (ContentDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = ContentDatabase::open_in_dir(dir.path()).unwrap();
        (db, dir)
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let (db, _dir) = temp_db();
        let first = db
            .insert_document(ARTICLES, "articles", |id| Note { id, text: "a".into() })
            .unwrap();
        let second = db
            .insert_document(ARTICLES, "articles", |id| Note { id, text: "b".into() })
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let loaded: Note = db.get_document(ARTICLES, 2).unwrap().unwrap();
        assert_eq!(loaded, second);
    }

    #[test]
    fn sequences_are_independent() {
        let (db, _dir) = temp_db();
        db.insert_document(ARTICLES, "articles", |id| Note { id, text: "a".into() })
            .unwrap();
        let project = db
            .insert_document(PROJECTS, "projects", |id| Note { id, text: "p".into() })
            .unwrap();
        assert_eq!(project.id, 1);
    }

    #[test]
    fn failed_modify_leaves_document_untouched() {
        let (db, _dir) = temp_db();
        db.insert_document(ARTICLES, "articles", |id| Note { id, text: "a".into() })
            .unwrap();

        let result = db.modify_document::<Note>(ARTICLES, 1, |note| {
            note.text = "changed".into();
            Err(StorageError::PermissionDenied {
                user_id: 2,
                resource: "note".into(),
            })
        });
        assert!(matches!(result, Err(StorageError::PermissionDenied { .. })));

        let loaded: Note = db.get_document(ARTICLES, 1).unwrap().unwrap();
        assert_eq!(loaded.text, "a");
    }

    #[test]
    fn remove_reports_missing_ids() {
        let (db, _dir) = temp_db();
        db.insert_document(PROJECTS, "projects", |id| Note { id, text: "p".into() })
            .unwrap();

        assert!(db.remove_document::<Note>(PROJECTS, 1, |_| Ok(())).unwrap());
        assert!(!db.remove_document::<Note>(PROJECTS, 1, |_| Ok(())).unwrap());
        assert!(db.list_documents::<Note>(PROJECTS).unwrap().is_empty());
    }

    #[test]
    fn reopen_keeps_data_and_sequence() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = ContentDatabase::open_in_dir(dir.path()).unwrap();
            db.insert_document(ARTICLES, "articles", |id| Note { id, text: "a".into() })
                .unwrap();
        }
        let db = ContentDatabase::open_in_dir(dir.path()).unwrap();
        assert!(db.is_available());
        let next = db
            .insert_document(ARTICLES, "articles", |id| Note { id, text: "b".into() })
            .unwrap();
        assert_eq!(next.id, 2);
    }
}
