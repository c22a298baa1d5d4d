//! Group and voting API handlers.
//!
//! ```text
//! PUT  /api/v1/groups {"participants":["ana@example.com"]}
//! POST /api/v1/groups/{id}/restaurants/{restaurant_id}
//! POST /api/v1/groups/{id}/users/{email}
//! POST /api/v1/groups/{id}/users/{email}/vote/{restaurant_id}
//! GET  /api/v1/groups/{id}/winner
//! GET  /api/v1/groups/{id}/not-visited
//! ```
//!
//! All routes require a session.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::NewGroup;
use crate::domain::{Error, Group, GroupId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::restaurants::{RestaurantResponse, parse_restaurant_id};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{UserResponse, parse_email};

/// Body for `PUT /api/v1/groups`: the founding members' emails.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NewGroupRequest {
    pub participants: Vec<String>,
}

/// One ballot line: a restaurant and its running vote count.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BallotEntryResponse {
    pub restaurant: RestaurantResponse,
    pub votes: u32,
}

/// One visit-history line: a restaurant and its latest visit date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitResponse {
    pub restaurant: RestaurantResponse,
    pub visited_at: DateTime<Utc>,
}

/// Group shape returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub participants: Vec<UserResponse>,
    pub restaurants: Vec<RestaurantResponse>,
    pub visited: Vec<VisitResponse>,
    pub ballot: Vec<BallotEntryResponse>,
    pub voters: Vec<String>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id().to_string(),
            created_at: group.created_at(),
            participants: group
                .participants()
                .iter()
                .cloned()
                .map(UserResponse::from)
                .collect(),
            restaurants: group
                .restaurants()
                .iter()
                .cloned()
                .map(RestaurantResponse::from)
                .collect(),
            visited: group
                .visited()
                .iter()
                .map(|record| VisitResponse {
                    restaurant: RestaurantResponse::from(record.restaurant.clone()),
                    visited_at: record.visited_at,
                })
                .collect(),
            ballot: group
                .ballot()
                .iter()
                .map(|entry| BallotEntryResponse {
                    restaurant: RestaurantResponse::from(entry.restaurant.clone()),
                    votes: entry.votes,
                })
                .collect(),
            voters: group
                .voters()
                .iter()
                .map(|email| email.as_str().to_owned())
                .collect(),
        }
    }
}

fn parse_group_id(raw: &str) -> Result<GroupId, Error> {
    GroupId::new(raw).map_err(|error| Error::invalid_request(error.to_string()))
}

/// Create a group from its founding members.
#[utoipa::path(
    put,
    path = "/api/v1/groups",
    request_body = NewGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown member email", body = Error),
        (status = 422, description = "No participants", body = Error)
    ),
    tags = ["groups"],
    operation_id = "createGroup"
)]
#[put("/groups")]
pub async fn create_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewGroupRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let group = state
        .groups
        .create_group(NewGroup {
            participant_emails: payload.into_inner().participants,
        })
        .await?;
    Ok(HttpResponse::Created().json(GroupResponse::from(group)))
}

/// List every group.
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    responses(
        (status = 200, description = "Groups", body = [GroupResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["groups"],
    operation_id = "listGroups"
)]
#[get("/groups")]
pub async fn list_groups(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<GroupResponse>>> {
    session.require_user_id()?;
    let groups = state.groups.list_groups().await?;
    Ok(web::Json(groups.into_iter().map(GroupResponse::from).collect()))
}

/// Fetch one group.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group", body = GroupResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown group", body = Error)
    ),
    tags = ["groups"],
    operation_id = "findGroup"
)]
#[get("/groups/{id}")]
pub async fn find_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<GroupResponse>> {
    session.require_user_id()?;
    let id = parse_group_id(&path.into_inner())?;
    let group = state.groups.find_group(&id).await?;
    Ok(web::Json(GroupResponse::from(group)))
}

/// Delete a group.
#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown group", body = Error)
    ),
    tags = ["groups"],
    operation_id = "deleteGroup"
)]
#[delete("/groups/{id}")]
pub async fn delete_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_group_id(&path.into_inner())?;
    state.groups.remove_group(&id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Propose a restaurant into a group.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/restaurants/{restaurant_id}",
    params(
        ("id" = String, Path, description = "Group id"),
        ("restaurant_id" = String, Path, description = "Restaurant id")
    ),
    responses(
        (status = 200, description = "Updated group", body = GroupResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown group or restaurant", body = Error),
        (status = 409, description = "Restaurant already in group", body = Error)
    ),
    tags = ["groups"],
    operation_id = "addRestaurantToGroup"
)]
#[post("/groups/{id}/restaurants/{restaurant_id}")]
pub async fn add_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<GroupResponse>> {
    session.require_user_id()?;
    let (group_id, restaurant_id) = path.into_inner();
    let group_id = parse_group_id(&group_id)?;
    let restaurant_id = parse_restaurant_id(&restaurant_id)?;
    let group = state.groups.add_restaurant(&group_id, &restaurant_id).await?;
    Ok(web::Json(GroupResponse::from(group)))
}

/// Join a registered user into a group.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/users/{email}",
    params(
        ("id" = String, Path, description = "Group id"),
        ("email" = String, Path, description = "Member email")
    ),
    responses(
        (status = 200, description = "Updated group", body = GroupResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown group or user", body = Error),
        (status = 409, description = "User already in group", body = Error)
    ),
    tags = ["groups"],
    operation_id = "joinGroup"
)]
#[post("/groups/{id}/users/{email}")]
pub async fn join_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<GroupResponse>> {
    session.require_user_id()?;
    let (group_id, email) = path.into_inner();
    let group_id = parse_group_id(&group_id)?;
    let email = parse_email(&email)?;
    let group = state.groups.join_group(&group_id, &email).await?;
    Ok(web::Json(GroupResponse::from(group)))
}

/// Cast one vote in the group's current round.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/users/{email}/vote/{restaurant_id}",
    params(
        ("id" = String, Path, description = "Group id"),
        ("email" = String, Path, description = "Voter email"),
        ("restaurant_id" = String, Path, description = "Restaurant id")
    ),
    responses(
        (status = 200, description = "Updated group", body = GroupResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown group, user, or restaurant", body = Error),
        (status = 409, description = "Repeat vote or restaurant not in group", body = Error)
    ),
    tags = ["groups"],
    operation_id = "castVote"
)]
#[post("/groups/{id}/users/{email}/vote/{restaurant_id}")]
pub async fn cast_vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String, String)>,
) -> ApiResult<web::Json<GroupResponse>> {
    session.require_user_id()?;
    let (group_id, email, restaurant_id) = path.into_inner();
    let group_id = parse_group_id(&group_id)?;
    let email = parse_email(&email)?;
    let restaurant_id = parse_restaurant_id(&restaurant_id)?;
    let group = state.groups.cast_vote(&email, &restaurant_id, &group_id).await?;
    Ok(web::Json(GroupResponse::from(group)))
}

/// Close the round and return the winner.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/winner",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Winning restaurant", body = RestaurantResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown group", body = Error),
        (status = 422, description = "Empty ballot", body = Error)
    ),
    tags = ["groups"],
    operation_id = "determineWinner"
)]
#[get("/groups/{id}/winner")]
pub async fn winner(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    session.require_user_id()?;
    let id = parse_group_id(&path.into_inner())?;
    let restaurant = state.groups.determine_winner(&id).await?;
    Ok(web::Json(RestaurantResponse::from(restaurant)))
}

/// Restaurants not visited since the start of the current week.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/not-visited",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Eligible restaurants", body = [RestaurantResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown group", body = Error)
    ),
    tags = ["groups"],
    operation_id = "listNotVisited"
)]
#[get("/groups/{id}/not-visited")]
pub async fn not_visited(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RestaurantResponse>>> {
    session.require_user_id()?;
    let id = parse_group_id(&path.into_inner())?;
    let restaurants = state.groups.eligible_restaurants(&id).await?;
    Ok(web::Json(
        restaurants.into_iter().map(RestaurantResponse::from).collect(),
    ))
}
