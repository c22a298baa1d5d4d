//! Driving port for account lifecycle use-cases.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{EmailAddress, Error, User};

/// Registration request carrying raw inputs; the service validates and
/// normalises them.
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub name: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

/// Full profile replacement, mirroring the edit form.
#[derive(Debug, Clone)]
pub struct ProfilePatch {
    pub name: String,
    pub email: String,
}

/// Domain use-case port for managing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Register a new account, hashing the password and rejecting duplicate
    /// emails case-insensitively.
    async fn register(&self, request: RegisterAccount) -> Result<User, Error>;

    /// Replace the profile stored for `email`, re-checking email uniqueness
    /// against other accounts.
    async fn update_profile(&self, email: &EmailAddress, patch: ProfilePatch)
        -> Result<User, Error>;

    /// Delete the account stored for `email`.
    async fn remove(&self, email: &EmailAddress) -> Result<(), Error>;

    /// List every account.
    async fn list(&self) -> Result<Vec<User>, Error>;

    /// Fetch one account by email.
    async fn find(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Find accounts whose name contains `fragment`, case-insensitively.
    async fn search(&self, fragment: &str) -> Result<Vec<User>, Error>;
}
