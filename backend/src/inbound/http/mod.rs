//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers stay thin: parse path and body input, call a driving port from
//! [`state::HttpState`], and let the shared [`error`] mapping turn domain
//! failures into status codes. Domain structs never serialise directly;
//! every response body is a DTO defined next to its handler.

pub mod error;
pub mod groups;
pub mod health;
pub mod restaurants;
pub mod session;
pub mod state;
pub mod users;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Register every API endpoint on the given service config.
///
/// Used by the server assembly and by tests so both expose the same routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::search_users)
        .service(users::list_users)
        .service(users::find_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(restaurants::create_restaurant)
        .service(restaurants::list_restaurants)
        .service(restaurants::find_restaurant)
        .service(restaurants::update_restaurant)
        .service(restaurants::delete_restaurant)
        .service(groups::create_group)
        .service(groups::list_groups)
        .service(groups::winner)
        .service(groups::not_visited)
        .service(groups::find_group)
        .service(groups::delete_group)
        .service(groups::add_restaurant)
        .service(groups::join_group)
        .service(groups::cast_vote);
}
