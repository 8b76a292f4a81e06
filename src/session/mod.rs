// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Session
//!
//! Client-side counterpart of the content API: an observable session
//! holding the identity service token, its persistence, and a typed
//! content client that attaches the token to mutating requests.

pub mod content_client;
pub mod identity;
pub mod persistence;
pub mod state;
pub mod store;

pub use content_client::{ArticleFilter, ContentClient, ContentClientError, TokenSource};
pub use identity::{
    AuthPayload, Credentials, HttpIdentityService, IdentityError, IdentityService, UserUpdate,
    DEFAULT_IDENTITY_BASE_URL,
};
pub use persistence::{
    FileSessionPersistence, MemorySessionPersistence, PersistenceError, SessionPersistence,
    DEFAULT_NAMESPACE,
};
pub use state::{PersistedSession, Session, UserProfile};
pub use store::{SessionError, SessionStore, DEFAULT_TIMEOUT};
