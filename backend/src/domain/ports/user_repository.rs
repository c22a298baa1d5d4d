//! Driven port for user persistence adapters.

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::define_store_error;

define_store_error! {
    /// Persistence errors raised by user store adapters.
    pub enum UserStoreError {
        /// Store connection could not be established.
        Connection => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "user store query failed: {message}",
        /// Stored document could not be encoded or decoded.
        Serialization => "user store serialization failed: {message}",
    }
}

/// Store contract for user documents.
///
/// Lookup and deletion are keyed by email, matching how accounts are
/// addressed everywhere else; `find_by_id` exists for resolving the id kept
/// in the session cookie.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Fetch every stored user.
    async fn find_all(&self) -> Result<Vec<User>, UserStoreError>;

    /// Persist a new user document.
    async fn create(&self, user: &User) -> Result<(), UserStoreError>;

    /// Replace the document currently keyed by `email` with `user`,
    /// re-keying the document when the email changed.
    async fn update(&self, email: &EmailAddress, user: &User) -> Result<(), UserStoreError>;

    /// Delete a user by email, returning whether a document existed.
    async fn delete(&self, email: &EmailAddress) -> Result<bool, UserStoreError>;
}
