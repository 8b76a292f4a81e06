// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::storage::{ArticleRepository, ContentDatabase, OwnershipPolicy, ProjectRepository};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<ContentDatabase>,
    pub verifier: Arc<TokenVerifier>,
    pub ownership: OwnershipPolicy,
}

impl AppState {
    pub fn new(db: ContentDatabase, verifier: TokenVerifier, ownership: OwnershipPolicy) -> Self {
        Self {
            db: Arc::new(db),
            verifier: Arc::new(verifier),
            ownership,
        }
    }

    pub fn articles(&self) -> ArticleRepository<'_> {
        ArticleRepository::new(&self.db)
    }

    pub fn projects(&self) -> ProjectRepository<'_> {
        ProjectRepository::new(&self.db)
    }
}

/// State over a fresh database in a temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the state is used.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    test_state_with(OwnershipPolicy::default())
}

#[cfg(test)]
pub(crate) fn test_state_with(ownership: OwnershipPolicy) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = ContentDatabase::open_in_dir(dir.path()).unwrap();
    let state = AppState::new(db, crate::auth::test_support::verifier(), ownership);
    (state, dir)
}
