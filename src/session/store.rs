// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side session store.
//!
//! Holds the current token and user profile, persists the durable part
//! through a [`SessionPersistence`] adapter and publishes every change on a
//! watch channel. Async operations are single-flight and time-bounded.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let store = SessionStore::new(
//!     HttpIdentityService::new(DEFAULT_IDENTITY_BASE_URL)?,
//!     FileSessionPersistence::in_dir(&config_dir),
//! );
//! store.refresh_user_info().await.ok();
//! if !store.snapshot().is_authenticated {
//!     store.login(&Credentials::new("hulio", password)).await?;
//! }
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::content_client::TokenSource;
use super::identity::{AuthPayload, Credentials, IdentityError, IdentityService, UserUpdate};
use super::persistence::SessionPersistence;
use super::state::{Session, UserProfile};

/// Default bound on a single identity service call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("identity service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("another session operation is already in progress")]
    OperationInProgress,

    #[error("no token found")]
    NotAuthenticated,

    /// `logout` ran while the call was in flight; its result was dropped.
    #[error("session was logged out while the request was in flight")]
    LoggedOut,
}

impl SessionError {
    /// Whether the failure means the held token is no longer usable.
    pub fn is_token_problem(&self) -> bool {
        match self {
            SessionError::Identity(e) => e.is_token_problem(),
            SessionError::NotAuthenticated => true,
            _ => false,
        }
    }
}

/// Persisted, observable session state.
pub struct SessionStore<I, P> {
    identity: I,
    persistence: P,
    state: watch::Sender<Session>,
    in_flight: Mutex<()>,
    /// Bumped by every `logout`.
    logouts: AtomicU64,
    timeout: Duration,
}

impl<I, P> SessionStore<I, P>
where
    I: IdentityService,
    P: SessionPersistence,
{
    /// Create a store, rehydrating whatever `persistence` holds.
    pub fn new(identity: I, persistence: P) -> Self {
        let session = match persistence.load() {
            Ok(Some(persisted)) => persisted.into_session(),
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted session");
                Session::default()
            }
        };
        debug!(
            authenticated = session.is_authenticated,
            has_token = session.token.is_some(),
            "Session rehydrated"
        );

        let (state, _) = watch::channel(session);
        Self {
            identity,
            persistence,
            state,
            in_flight: Mutex::new(()),
            logouts: AtomicU64::new(0),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound each identity service call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Current state.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    // =========================================================================
    // Async operations
    // =========================================================================

    /// Log in with `credentials`.
    ///
    /// On failure the error is stored and the previous identity is kept.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let _guard = self.begin()?;
        self.start_loading();

        match self.call(self.identity.login(credentials)).await {
            Err(SessionError::LoggedOut) => Err(SessionError::LoggedOut),
            Ok(AuthPayload { token, user }) => {
                info!(user_id = user.id, username = %user.username, "Logged in");
                self.update_persisted(|s| {
                    s.user = Some(user);
                    s.token = Some(token);
                    s.is_authenticated = true;
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Restore the identity behind a held token.
    ///
    /// Only acts when a token is held but the session is not yet marked
    /// authenticated, which is the state right after rehydration. A token
    /// problem logs the session out.
    pub async fn refresh_user_info(&self) -> Result<(), SessionError> {
        let _guard = self.begin()?;

        let token = {
            let state = self.state.borrow();
            match (&state.token, state.is_authenticated) {
                (Some(token), false) => token.clone(),
                _ => return Ok(()),
            }
        };

        self.start_loading();

        match self.call(self.identity.fetch_user(&token)).await {
            Err(SessionError::LoggedOut) => Err(SessionError::LoggedOut),
            Ok(AuthPayload { token, user }) => {
                debug!(user_id = user.id, "Session refreshed");
                self.update_persisted(|s| {
                    s.user = Some(user);
                    s.token = Some(token);
                    s.is_authenticated = true;
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                if e.is_token_problem() {
                    warn!(error = %e, "Held token rejected, logging out");
                    self.logout();
                } else {
                    warn!(error = %e, "Session refresh failed");
                }
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Send a partial profile update and cache the returned profile.
    pub async fn update_user_info(&self, update: &UserUpdate) -> Result<(), SessionError> {
        let _guard = self.begin()?;

        let Some(token) = self.token() else {
            let e = SessionError::NotAuthenticated;
            self.fail(&e);
            return Err(e);
        };

        self.start_loading();

        match self.call(self.identity.update_user(&token, update)).await {
            Err(SessionError::LoggedOut) => Err(SessionError::LoggedOut),
            Ok(AuthPayload { user, .. }) => {
                self.update_persisted(|s| {
                    s.user = Some(user);
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Profile update failed");
                self.fail(&e);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Synchronous operations
    // =========================================================================

    /// Forget the session and its persisted entry. Idempotent.
    pub fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.persistence.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.state.send_modify(|s| {
            s.user = None;
            s.token = None;
            s.is_authenticated = false;
            s.is_loading = false;
            s.error = None;
        });
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Replace the cached profile.
    ///
    /// The session only counts as authenticated when a token is held.
    pub fn set_user(&self, user: UserProfile) {
        self.update_persisted(|s| {
            s.user = Some(user);
            s.is_authenticated = s.token.is_some();
        });
    }

    /// Adopt `token` as the session token.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.update_persisted(|s| {
            s.token = Some(token);
            s.is_authenticated = true;
        });
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn begin(&self) -> Result<MutexGuard<'_, ()>, SessionError> {
        self.in_flight
            .try_lock()
            .map_err(|_| SessionError::OperationInProgress)
    }

    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, IdentityError>>,
    ) -> Result<T, SessionError> {
        let logouts = self.logouts.load(Ordering::SeqCst);
        let result = tokio::time::timeout(self.timeout, request).await;

        if self.logouts.load(Ordering::SeqCst) != logouts {
            debug!("Dropping identity response that raced a logout");
            return Err(SessionError::LoggedOut);
        }
        match result {
            Ok(result) => Ok(result?),
            Err(_) => Err(SessionError::Timeout(self.timeout)),
        }
    }

    fn start_loading(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn fail(&self, error: &SessionError) {
        let message = error.to_string();
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(message);
        });
    }

    fn update_persisted(&self, modify: impl FnOnce(&mut Session)) {
        self.state.send_modify(modify);
        let persisted = self.state.borrow().persisted();
        if let Err(e) = self.persistence.save(&persisted) {
            warn!(error = %e, "Failed to persist session");
        }
    }
}

impl<I, P> TokenSource for SessionStore<I, P>
where
    I: IdentityService,
    P: SessionPersistence,
{
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}
