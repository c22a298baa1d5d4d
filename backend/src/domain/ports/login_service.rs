//! Driving port for login use-cases.
//!
//! Inbound adapters call this port to authenticate credentials without
//! knowing the backing store or hash scheme, which keeps handler tests
//! deterministic: they substitute a test double instead of wiring
//! persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// `Unauthorized("invalid credentials")` so the response does not reveal
    /// which accounts exist.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
