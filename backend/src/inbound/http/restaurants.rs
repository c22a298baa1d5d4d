//! Restaurant catalogue API handlers.
//!
//! All routes require a session; restaurants are managed independently of
//! groups and referenced from them by id.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RestaurantDraft;
use crate::domain::{Error, Restaurant, RestaurantId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for creating or replacing a restaurant.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RestaurantRequest {
    pub name: String,
    pub description: String,
    pub location: String,
}

/// Restaurant shape returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestaurantResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Trattoria da Ana")]
    pub name: String,
    pub description: String,
    pub location: String,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id.to_string(),
            name: restaurant.name,
            description: restaurant.description,
            location: restaurant.location,
        }
    }
}

pub(crate) fn parse_restaurant_id(raw: &str) -> Result<RestaurantId, Error> {
    RestaurantId::new(raw).map_err(|error| Error::invalid_request(error.to_string()))
}

fn draft_from(body: RestaurantRequest) -> RestaurantDraft {
    RestaurantDraft {
        name: body.name,
        description: body.description,
        location: body.location,
    }
}

/// Add a restaurant to the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants",
    request_body = RestaurantRequest,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "createRestaurant"
)]
#[post("/restaurants")]
pub async fn create_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RestaurantRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let restaurant = state.catalogue.create(draft_from(payload.into_inner())).await?;
    Ok(HttpResponse::Created().json(RestaurantResponse::from(restaurant)))
}

/// List the whole catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants",
    responses(
        (status = 200, description = "Restaurants", body = [RestaurantResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "listRestaurants"
)]
#[get("/restaurants")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RestaurantResponse>>> {
    session.require_user_id()?;
    let restaurants = state.catalogue.list().await?;
    Ok(web::Json(
        restaurants.into_iter().map(RestaurantResponse::from).collect(),
    ))
}

/// Fetch one restaurant.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Restaurant", body = RestaurantResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown restaurant", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "findRestaurant"
)]
#[get("/restaurants/{id}")]
pub async fn find_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    session.require_user_id()?;
    let id = parse_restaurant_id(&path.into_inner())?;
    let restaurant = state.catalogue.find(&id).await?;
    Ok(web::Json(RestaurantResponse::from(restaurant)))
}

/// Replace a restaurant's stored fields.
#[utoipa::path(
    put,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id")),
    request_body = RestaurantRequest,
    responses(
        (status = 200, description = "Updated restaurant", body = RestaurantResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown restaurant", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "updateRestaurant"
)]
#[put("/restaurants/{id}")]
pub async fn update_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RestaurantRequest>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    session.require_user_id()?;
    let id = parse_restaurant_id(&path.into_inner())?;
    let restaurant = state
        .catalogue
        .update(&id, draft_from(payload.into_inner()))
        .await?;
    Ok(web::Json(RestaurantResponse::from(restaurant)))
}

/// Remove a restaurant from the catalogue.
#[utoipa::path(
    delete,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Restaurant deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown restaurant", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "deleteRestaurant"
)]
#[delete("/restaurants/{id}")]
pub async fn delete_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_restaurant_id(&path.into_inner())?;
    state.catalogue.remove(&id).await?;
    Ok(HttpResponse::Ok().finish())
}
