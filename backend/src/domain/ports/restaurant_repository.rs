//! Driven port for restaurant persistence adapters.

use async_trait::async_trait;

use crate::domain::{Restaurant, RestaurantId};

use super::define_store_error;

define_store_error! {
    /// Persistence errors raised by restaurant store adapters.
    pub enum RestaurantStoreError {
        /// Store connection could not be established.
        Connection => "restaurant store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "restaurant store query failed: {message}",
        /// Stored document could not be encoded or decoded.
        Serialization => "restaurant store serialization failed: {message}",
    }
}

/// Store contract for restaurant documents, keyed by [`RestaurantId`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Fetch a restaurant by identifier.
    async fn find_by_id(&self, id: &RestaurantId)
        -> Result<Option<Restaurant>, RestaurantStoreError>;

    /// Fetch every stored restaurant.
    async fn find_all(&self) -> Result<Vec<Restaurant>, RestaurantStoreError>;

    /// Persist a new restaurant document.
    async fn create(&self, restaurant: &Restaurant) -> Result<(), RestaurantStoreError>;

    /// Replace the stored document for `id` with `restaurant`.
    async fn update(
        &self,
        id: &RestaurantId,
        restaurant: &Restaurant,
    ) -> Result<(), RestaurantStoreError>;

    /// Delete a restaurant, returning whether a document existed.
    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantStoreError>;
}
