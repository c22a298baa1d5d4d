//! Restaurant catalogue service.
//!
//! Plain CRUD over the restaurant store; restaurants live independently of
//! groups, which reference them by id.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{RestaurantCatalogue, RestaurantDraft, RestaurantRepository};
use crate::domain::verification::map_restaurant_store_error;
use crate::domain::{Error, Restaurant, RestaurantId};

/// Catalogue service backed by the restaurant store.
#[derive(Clone)]
pub struct CatalogueService<R> {
    restaurants: Arc<R>,
}

impl<R> CatalogueService<R> {
    /// Create the service over a restaurant store.
    pub fn new(restaurants: Arc<R>) -> Self {
        Self { restaurants }
    }

    fn validated(draft: RestaurantDraft) -> Result<RestaurantDraft, Error> {
        if draft.name.trim().is_empty() {
            return Err(Error::invalid_request("restaurant name must not be empty"));
        }
        Ok(draft)
    }
}

#[async_trait]
impl<R> RestaurantCatalogue for CatalogueService<R>
where
    R: RestaurantRepository,
{
    async fn create(&self, draft: RestaurantDraft) -> Result<Restaurant, Error> {
        let draft = Self::validated(draft)?;
        let restaurant = Restaurant::new(draft.name.trim(), draft.description, draft.location);
        self.restaurants
            .create(&restaurant)
            .await
            .map_err(map_restaurant_store_error)?;
        info!(restaurant_id = %restaurant.id, "restaurant created");
        Ok(restaurant)
    }

    async fn update(&self, id: &RestaurantId, draft: RestaurantDraft) -> Result<Restaurant, Error> {
        let draft = Self::validated(draft)?;
        let current = self.find(id).await?;
        let updated = Restaurant {
            id: current.id,
            name: draft.name.trim().to_owned(),
            description: draft.description,
            location: draft.location,
        };
        self.restaurants
            .update(id, &updated)
            .await
            .map_err(map_restaurant_store_error)?;
        Ok(updated)
    }

    async fn remove(&self, id: &RestaurantId) -> Result<(), Error> {
        let deleted = self
            .restaurants
            .delete(id)
            .await
            .map_err(map_restaurant_store_error)?;
        if deleted {
            info!(restaurant_id = %id, "restaurant removed");
            Ok(())
        } else {
            Err(Error::not_found("restaurant not found"))
        }
    }

    async fn list(&self) -> Result<Vec<Restaurant>, Error> {
        self.restaurants
            .find_all()
            .await
            .map_err(map_restaurant_store_error)
    }

    async fn find(&self, id: &RestaurantId) -> Result<Restaurant, Error> {
        self.restaurants
            .find_by_id(id)
            .await
            .map_err(map_restaurant_store_error)?
            .ok_or_else(|| Error::not_found("restaurant not found"))
    }
}
