//! Test helpers for the inbound HTTP layer.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::accounts::AccountService;
use crate::domain::catalogue::CatalogueService;
use crate::domain::ports::FixtureClock;
use crate::domain::voting::VotingService;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::memory::{
    InMemoryGroupStore, InMemoryRestaurantStore, InMemoryUserStore,
};

/// Session middleware with a fresh key and the `Secure` flag off for plain
/// HTTP test requests.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Wednesday 2024-05-15 noon; the corresponding week starts on day 12.
pub(crate) fn test_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).single().expect("valid date")
}

/// Handler state over fresh in-memory stores and a pinned clock.
pub(crate) fn test_state() -> HttpState {
    let users = Arc::new(InMemoryUserStore::default());
    let restaurants = Arc::new(InMemoryRestaurantStore::default());
    let groups = Arc::new(InMemoryGroupStore::default());
    let accounts = Arc::new(AccountService::new(Arc::clone(&users)));
    HttpState::new(
        accounts.clone(),
        accounts,
        Arc::new(CatalogueService::new(Arc::clone(&restaurants))),
        Arc::new(VotingService::new(
            groups,
            users,
            restaurants,
            Arc::new(FixtureClock(test_instant())),
        )),
    )
}
