// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership policy for mutating stored content.
//!
//! The authorization gate proves *that* a caller is authenticated. Whether
//! the caller must also be the author of the resource is a deployment
//! decision captured by [`OwnershipPolicy`]: a single-admin site accepts any
//! authenticated user, a multi-author site restricts edits to the author.

use std::str::FromStr;

use crate::auth::AuthenticatedUser;

use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> i64;

    /// Short description used in permission errors.
    fn describe(&self) -> String;
}

/// Who may modify an owned resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnershipPolicy {
    /// Any authenticated user may modify any resource
    #[default]
    AnyAuthenticated,
    /// Only the resource owner may modify it
    AuthorOnly,
}

impl OwnershipPolicy {
    /// Verify that `user` may modify `resource`.
    ///
    /// # Errors
    /// Returns `StorageError::PermissionDenied` under `AuthorOnly` when the
    /// user is not the owner.
    pub fn authorize<R: OwnedResource>(
        &self,
        user: &AuthenticatedUser,
        resource: &R,
    ) -> StorageResult<()> {
        match self {
            OwnershipPolicy::AnyAuthenticated => Ok(()),
            OwnershipPolicy::AuthorOnly if user.is_user(resource.owner_user_id()) => Ok(()),
            OwnershipPolicy::AuthorOnly => Err(StorageError::PermissionDenied {
                user_id: user.user_id,
                resource: resource.describe(),
            }),
        }
    }

    /// Verify that `user` may create content attributed to `author_id`.
    pub fn authorize_author(&self, user: &AuthenticatedUser, author_id: i64) -> StorageResult<()> {
        match self {
            OwnershipPolicy::AnyAuthenticated => Ok(()),
            OwnershipPolicy::AuthorOnly if user.is_user(author_id) => Ok(()),
            OwnershipPolicy::AuthorOnly => Err(StorageError::PermissionDenied {
                user_id: user.user_id,
                resource: format!("content of author {author_id}"),
            }),
        }
    }

    /// Configuration name of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipPolicy::AnyAuthenticated => "any-authenticated",
            OwnershipPolicy::AuthorOnly => "author-only",
        }
    }
}

impl FromStr for OwnershipPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "any-authenticated" | "any_authenticated" => Ok(OwnershipPolicy::AnyAuthenticated),
            "author-only" | "author_only" => Ok(OwnershipPolicy::AuthorOnly),
            other => Err(format!(
                "unknown ownership policy '{other}' (expected 'any-authenticated' or 'author-only')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        owner: i64,
    }

    impl OwnedResource for TestResource {
        fn owner_user_id(&self) -> i64 {
            self.owner
        }

        fn describe(&self) -> String {
            "test resource".to_string()
        }
    }

    fn make_user(user_id: i64) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            username: format!("user{user_id}"),
            expires_at: None,
        }
    }

    #[test]
    fn any_authenticated_allows_non_owner() {
        let resource = TestResource { owner: 1 };
        assert!(OwnershipPolicy::AnyAuthenticated
            .authorize(&make_user(2), &resource)
            .is_ok());
    }

    #[test]
    fn author_only_passes_for_owner() {
        let resource = TestResource { owner: 1 };
        assert!(OwnershipPolicy::AuthorOnly
            .authorize(&make_user(1), &resource)
            .is_ok());
    }

    #[test]
    fn author_only_fails_for_non_owner() {
        let resource = TestResource { owner: 1 };
        let result = OwnershipPolicy::AuthorOnly.authorize(&make_user(2), &resource);
        assert!(matches!(
            result,
            Err(StorageError::PermissionDenied { user_id: 2, .. })
        ));
    }

    #[test]
    fn author_only_restricts_attribution() {
        let user = make_user(3);
        assert!(OwnershipPolicy::AuthorOnly.authorize_author(&user, 3).is_ok());
        assert!(OwnershipPolicy::AuthorOnly.authorize_author(&user, 4).is_err());
        assert!(OwnershipPolicy::AnyAuthenticated.authorize_author(&user, 4).is_ok());
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(
            "author-only".parse::<OwnershipPolicy>(),
            Ok(OwnershipPolicy::AuthorOnly)
        );
        assert_eq!(
            "Any-Authenticated".parse::<OwnershipPolicy>(),
            Ok(OwnershipPolicy::AnyAuthenticated)
        );
        assert!("owner".parse::<OwnershipPolicy>().is_err());
        assert_eq!(OwnershipPolicy::AuthorOnly.as_str(), "author-only");
    }
}
