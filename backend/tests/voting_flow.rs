//! End-to-end voting workflow over the fully assembled application.
//!
//! Drives the real app factory (correlation middleware, cookie sessions,
//! every route) against in-memory stores and a pinned clock.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use backend::domain::accounts::AccountService;
use backend::domain::catalogue::CatalogueService;
use backend::domain::ports::FixtureClock;
use backend::domain::voting::VotingService;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    InMemoryGroupStore, InMemoryRestaurantStore, InMemoryUserStore,
};
use backend::server::build_app;

/// Wednesday 2024-05-15; the corresponding week starts on day 12.
fn pinned_state() -> HttpState {
    let users = Arc::new(InMemoryUserStore::default());
    let restaurants = Arc::new(InMemoryRestaurantStore::default());
    let groups = Arc::new(InMemoryGroupStore::default());
    let clock = Arc::new(FixtureClock(
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).single().expect("valid date"),
    ));
    let accounts = Arc::new(AccountService::new(Arc::clone(&users)));
    HttpState::new(
        accounts.clone(),
        accounts,
        Arc::new(CatalogueService::new(Arc::clone(&restaurants))),
        Arc::new(VotingService::new(groups, users, restaurants, clock)),
    )
}

trait AppService:
    actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >
{
}

impl<S> AppService for S where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >
{
}

async fn post_json(app: &impl AppService, uri: &str, body: Value) -> actix_web::dev::ServiceResponse {
    test::call_service(
        app,
        test::TestRequest::post().uri(uri).set_json(&body).to_request(),
    )
    .await
}

async fn authed_post(
    app: &impl AppService,
    cookie: &Cookie<'static>,
    uri: &str,
) -> actix_web::dev::ServiceResponse {
    test::call_service(
        app,
        test::TestRequest::post().uri(uri).cookie(cookie.clone()).to_request(),
    )
    .await
}

async fn authed_get_json(app: &impl AppService, cookie: &Cookie<'static>, uri: &str) -> Value {
    let res = test::call_service(
        app,
        test::TestRequest::get().uri(uri).cookie(cookie.clone()).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "GET {uri}");
    test::read_body_json(res).await
}

async fn register(app: &impl AppService, name: &str) {
    let res = post_json(
        app,
        "/api/v1/users",
        json!({
            "name": name,
            "email": format!("{name}@example.com"),
            "password": "correct horse battery staple",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn login(app: &impl AppService, name: &str) -> Cookie<'static> {
    let res = post_json(
        app,
        "/api/v1/login",
        json!({
            "email": format!("{name}@example.com"),
            "password": "correct horse battery staple",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

async fn create_restaurant(app: &impl AppService, cookie: &Cookie<'static>, name: &str) -> String {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/restaurants")
            .cookie(cookie.clone())
            .set_json(&json!({
                "name": name,
                "description": "a description",
                "location": "Rua F",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    body.get("id").and_then(Value::as_str).expect("restaurant id").to_owned()
}

#[actix_web::test]
async fn a_week_of_group_dining() {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let app =
        test::init_service(build_app(pinned_state(), Key::generate(), false, health)).await;

    for name in ["ana", "rui", "eva"] {
        register(&app, name).await;
    }
    let cookie = login(&app, "ana").await;

    let trattoria = create_restaurant(&app, &cookie, "Trattoria").await;
    let cantina = create_restaurant(&app, &cookie, "Cantina").await;
    let bistro = create_restaurant(&app, &cookie, "Bistro").await;

    // Ana founds the group with Rui; Eva joins through the membership route.
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/groups")
            .cookie(cookie.clone())
            .set_json(&json!({
                "participants": ["ana@example.com", "rui@example.com"],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.headers().contains_key("x-request-id"));
    let created: Value = test::read_body_json(res).await;
    let group = created.get("id").and_then(Value::as_str).expect("group id").to_owned();

    let res = authed_post(
        &app,
        &cookie,
        &format!("/api/v1/groups/{group}/users/eva@example.com"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    for restaurant in [&trattoria, &cantina, &bistro] {
        let res = authed_post(
            &app,
            &cookie,
            &format!("/api/v1/groups/{group}/restaurants/{restaurant}"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    // The ballot tracks the restaurant list entry for entry.
    let state = authed_get_json(&app, &cookie, &format!("/api/v1/groups/{group}")).await;
    assert_eq!(state.get("restaurants").and_then(Value::as_array).map(Vec::len), Some(3));
    assert_eq!(state.get("ballot").and_then(Value::as_array).map(Vec::len), Some(3));

    // Nothing visited yet, so the whole list is eligible.
    let eligible =
        authed_get_json(&app, &cookie, &format!("/api/v1/groups/{group}/not-visited")).await;
    assert_eq!(eligible.as_array().map(Vec::len), Some(3));

    // Cantina takes the round two votes to one.
    for (voter, restaurant) in [("ana", &cantina), ("rui", &cantina), ("eva", &trattoria)] {
        let res = authed_post(
            &app,
            &cookie,
            &format!("/api/v1/groups/{group}/users/{voter}@example.com/vote/{restaurant}"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    // A repeat vote bounces without touching the tallies.
    let res = authed_post(
        &app,
        &cookie,
        &format!("/api/v1/groups/{group}/users/ana@example.com/vote/{trattoria}"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("message").and_then(Value::as_str), Some("user already voted"));

    let winner = authed_get_json(&app, &cookie, &format!("/api/v1/groups/{group}/winner")).await;
    assert_eq!(winner.get("name").and_then(Value::as_str), Some("Cantina"));

    // Closing the round resets the tallies and records the visit.
    let state = authed_get_json(&app, &cookie, &format!("/api/v1/groups/{group}")).await;
    let ballot = state.get("ballot").and_then(Value::as_array).expect("ballot");
    assert!(ballot.iter().all(|entry| entry.get("votes").and_then(Value::as_u64) == Some(0)));
    assert_eq!(state.get("voters").and_then(Value::as_array).map(Vec::len), Some(0));
    assert_eq!(state.get("visited").and_then(Value::as_array).map(Vec::len), Some(1));

    // This week's winner is off the ballot list until next week.
    let eligible =
        authed_get_json(&app, &cookie, &format!("/api/v1/groups/{group}/not-visited")).await;
    let names: Vec<_> = eligible
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|entry| entry.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["Trattoria", "Bistro"]);

    // Votes open again immediately in the next round.
    let res = authed_post(
        &app,
        &cookie,
        &format!("/api/v1/groups/{group}/users/ana@example.com/vote/{trattoria}"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn the_api_is_closed_without_a_session() {
    let health = web::Data::new(HealthState::new());
    let app =
        test::init_service(build_app(pinned_state(), Key::generate(), false, health)).await;

    for uri in [
        "/api/v1/users",
        "/api/v1/restaurants",
        "/api/v1/groups",
    ] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "GET {uri}");
    }

    // Registration stays open so first users can join.
    let res = post_json(
        &app,
        "/api/v1/users",
        json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "correct horse battery staple",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
}
