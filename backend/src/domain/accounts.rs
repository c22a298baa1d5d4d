//! Account lifecycle service: registration, profile edits, and login.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AccountDirectory, LoginService, ProfilePatch, RegisterAccount, UserRepository,
};
use crate::domain::verification::map_user_store_error;
use crate::domain::{EmailAddress, Error, LoginCredentials, User, UserId};

/// Account service backed by the user store and Argon2id hashing.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
}

impl<U> AccountService<U> {
    /// Create the service over a user store.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    fn hash_password(password: &str) -> Result<String, Error> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| Error::internal(format!("password hashing failed: {error}")))
    }

    fn verify_password(password: &str, stored: &str) -> Result<bool, Error> {
        let parsed = PasswordHash::new(stored)
            .map_err(|error| Error::internal(format!("stored password hash is invalid: {error}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(Error::internal(format!("password verification failed: {error}"))),
        }
    }

    fn validated_name(name: &str) -> Result<String, Error> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_request("name must not be empty"));
        }
        Ok(trimmed.to_owned())
    }
}

impl<U> AccountService<U>
where
    U: UserRepository,
{
    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, Error> {
        Ok(self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_store_error)?
            .is_some())
    }
}

#[async_trait]
impl<U> AccountDirectory for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, request: RegisterAccount) -> Result<User, Error> {
        let name = Self::validated_name(&request.name)?;
        let email = EmailAddress::new(&request.email)
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        if self.email_taken(&email).await? {
            return Err(Error::conflict("email already registered"));
        }
        let password_hash = Self::hash_password(&request.password)?;
        let user = User::new(name, email, password_hash);
        self.users
            .create(&user)
            .await
            .map_err(map_user_store_error)?;
        info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    async fn update_profile(
        &self,
        email: &EmailAddress,
        patch: ProfilePatch,
    ) -> Result<User, Error> {
        let current = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let name = Self::validated_name(&patch.name)?;
        let new_email = EmailAddress::new(&patch.email)
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        if new_email != current.email && self.email_taken(&new_email).await? {
            return Err(Error::conflict("email already registered"));
        }
        let updated = User {
            id: current.id,
            name,
            email: new_email,
            password_hash: current.password_hash,
        };
        self.users
            .update(email, &updated)
            .await
            .map_err(map_user_store_error)?;
        Ok(updated)
    }

    async fn remove(&self, email: &EmailAddress) -> Result<(), Error> {
        let deleted = self
            .users
            .delete(email)
            .await
            .map_err(map_user_store_error)?;
        if deleted {
            info!(email = %email, "account removed");
            Ok(())
        } else {
            Err(Error::not_found("user not found"))
        }
    }

    async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.find_all().await.map_err(map_user_store_error)
    }

    async fn find(&self, email: &EmailAddress) -> Result<User, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn search(&self, fragment: &str) -> Result<Vec<User>, Error> {
        let needle = fragment.trim().to_lowercase();
        let users = self.users.find_all().await.map_err(map_user_store_error)?;
        Ok(users
            .into_iter()
            .filter(|user| user.name.to_lowercase().contains(&needle))
            .collect())
    }
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_store_error)?
        else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        if Self::verify_password(credentials.password(), &user.password_hash)? {
            Ok(user.id)
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
