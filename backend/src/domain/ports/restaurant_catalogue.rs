//! Driving port for the restaurant catalogue use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Restaurant, RestaurantId};

/// Inbound shape for creating or replacing a restaurant.
#[derive(Debug, Clone)]
pub struct RestaurantDraft {
    pub name: String,
    pub description: String,
    pub location: String,
}

/// Domain use-case port for managing the restaurant catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantCatalogue: Send + Sync {
    /// Add a restaurant to the catalogue.
    async fn create(&self, draft: RestaurantDraft) -> Result<Restaurant, Error>;

    /// Replace the stored fields of an existing restaurant.
    async fn update(&self, id: &RestaurantId, draft: RestaurantDraft) -> Result<Restaurant, Error>;

    /// Remove a restaurant from the catalogue.
    async fn remove(&self, id: &RestaurantId) -> Result<(), Error>;

    /// List every restaurant.
    async fn list(&self) -> Result<Vec<Restaurant>, Error>;

    /// Fetch one restaurant by identifier.
    async fn find(&self, id: &RestaurantId) -> Result<Restaurant, Error>;
}
