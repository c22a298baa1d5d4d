//! In-memory store adapters.
//!
//! Back the repository ports with mutex-guarded maps. Used by unit and
//! integration tests and by standalone runs when no Redis URL is configured.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{
    GroupRepository, GroupStoreError, RestaurantRepository, RestaurantStoreError, UserRepository,
    UserStoreError,
};
use crate::domain::{EmailAddress, Group, GroupId, Restaurant, RestaurantId, User, UserId};

/// In-memory user store, keyed by email.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    rows: Mutex<HashMap<String, User>>,
}

impl InMemoryUserStore {
    fn rows(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, User>>, UserStoreError> {
        self.rows
            .lock()
            .map_err(|_| UserStoreError::query("user store mutex poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError> {
        Ok(self.rows()?.get(email.as_str()).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        Ok(self.rows()?.values().find(|user| user.id == *id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, UserStoreError> {
        Ok(self.rows()?.values().cloned().collect())
    }

    async fn create(&self, user: &User) -> Result<(), UserStoreError> {
        self.rows()?.insert(user.email.as_str().to_owned(), user.clone());
        Ok(())
    }

    async fn update(&self, email: &EmailAddress, user: &User) -> Result<(), UserStoreError> {
        let mut rows = self.rows()?;
        rows.remove(email.as_str());
        rows.insert(user.email.as_str().to_owned(), user.clone());
        Ok(())
    }

    async fn delete(&self, email: &EmailAddress) -> Result<bool, UserStoreError> {
        Ok(self.rows()?.remove(email.as_str()).is_some())
    }
}

/// In-memory restaurant store, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryRestaurantStore {
    rows: Mutex<HashMap<String, Restaurant>>,
}

impl InMemoryRestaurantStore {
    fn rows(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, Restaurant>>, RestaurantStoreError> {
        self.rows
            .lock()
            .map_err(|_| RestaurantStoreError::query("restaurant store mutex poisoned"))
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRestaurantStore {
    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantStoreError> {
        Ok(self.rows()?.get(&id.to_string()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Restaurant>, RestaurantStoreError> {
        Ok(self.rows()?.values().cloned().collect())
    }

    async fn create(&self, restaurant: &Restaurant) -> Result<(), RestaurantStoreError> {
        self.rows()?.insert(restaurant.id.to_string(), restaurant.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &RestaurantId,
        restaurant: &Restaurant,
    ) -> Result<(), RestaurantStoreError> {
        self.rows()?.insert(id.to_string(), restaurant.clone());
        Ok(())
    }

    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantStoreError> {
        Ok(self.rows()?.remove(&id.to_string()).is_some())
    }
}

/// In-memory group store, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    rows: Mutex<HashMap<String, Group>>,
}

impl InMemoryGroupStore {
    fn rows(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Group>>, GroupStoreError> {
        self.rows
            .lock()
            .map_err(|_| GroupStoreError::query("group store mutex poisoned"))
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupStore {
    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupStoreError> {
        Ok(self.rows()?.get(&id.to_string()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Group>, GroupStoreError> {
        Ok(self.rows()?.values().cloned().collect())
    }

    async fn create(&self, group: &Group) -> Result<(), GroupStoreError> {
        self.rows()?.insert(group.id().to_string(), group.clone());
        Ok(())
    }

    async fn update(&self, id: &GroupId, group: &Group) -> Result<(), GroupStoreError> {
        self.rows()?.insert(id.to_string(), group.clone());
        Ok(())
    }

    async fn delete(&self, id: &GroupId) -> Result<bool, GroupStoreError> {
        Ok(self.rows()?.remove(&id.to_string()).is_some())
    }
}
