//! OpenAPI document for the REST API.
//!
//! Served as JSON at `/api-docs/openapi.json` in debug builds and available
//! to external tooling through [`ApiDoc::openapi`].

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::groups::{
    BallotEntryResponse, GroupResponse, NewGroupRequest, VisitResponse,
};
use crate::inbound::http::restaurants::{RestaurantRequest, RestaurantResponse};
use crate::inbound::http::users::{
    LoginRequest, ProfileRequest, RegisterRequest, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document covering accounts, the restaurant catalogue, groups, and
/// health probes.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Group dining backend API",
        description = "Propose restaurants into groups, vote weekly, and rotate winners."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::search_users,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::find_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::restaurants::create_restaurant,
        crate::inbound::http::restaurants::list_restaurants,
        crate::inbound::http::restaurants::find_restaurant,
        crate::inbound::http::restaurants::update_restaurant,
        crate::inbound::http::restaurants::delete_restaurant,
        crate::inbound::http::groups::create_group,
        crate::inbound::http::groups::list_groups,
        crate::inbound::http::groups::find_group,
        crate::inbound::http::groups::delete_group,
        crate::inbound::http::groups::add_restaurant,
        crate::inbound::http::groups::join_group,
        crate::inbound::http::groups::cast_vote,
        crate::inbound::http::groups::winner,
        crate::inbound::http::groups::not_visited,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        ProfileRequest,
        UserResponse,
        RestaurantRequest,
        RestaurantResponse,
        NewGroupRequest,
        GroupResponse,
        BallotEntryResponse,
        VisitResponse,
    )),
    tags(
        (name = "users", description = "Account registration, login, and profiles"),
        (name = "restaurants", description = "Restaurant catalogue"),
        (name = "groups", description = "Groups, voting rounds, and eligibility"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
