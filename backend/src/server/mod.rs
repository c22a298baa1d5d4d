//! Server assembly: state construction, app wiring, and the run loop.

pub mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use crate::domain::accounts::AccountService;
use crate::domain::catalogue::CatalogueService;
use crate::domain::ports::{GroupRepository, RestaurantRepository, SystemClock, UserRepository};
use crate::domain::voting::VotingService;
use crate::inbound::http;
use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::state::HttpState;
use crate::middleware::request_id::Correlation;
use crate::outbound::persistence::{
    InMemoryGroupStore, InMemoryRestaurantStore, InMemoryUserStore, RedisGroupStore,
    RedisRestaurantStore, RedisUserStore, connect_pool,
};

fn state_from_stores<G, U, R>(groups: Arc<G>, users: Arc<U>, restaurants: Arc<R>) -> HttpState
where
    G: GroupRepository + 'static,
    U: UserRepository + 'static,
    R: RestaurantRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(Arc::clone(&users)));
    HttpState::new(
        accounts.clone(),
        accounts,
        Arc::new(CatalogueService::new(Arc::clone(&restaurants))),
        Arc::new(VotingService::new(
            groups,
            users,
            restaurants,
            Arc::new(SystemClock),
        )),
    )
}

/// Build the handler state, preferring Redis stores when a URL is configured.
pub async fn build_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    match &config.redis_url {
        Some(url) => {
            let pool = connect_pool(url).await.map_err(|error| {
                std::io::Error::other(format!("failed to connect to redis: {error}"))
            })?;
            info!("using redis document stores");
            Ok(state_from_stores(
                Arc::new(RedisGroupStore::new(pool.clone())),
                Arc::new(RedisUserStore::new(pool.clone())),
                Arc::new(RedisRestaurantStore::new(pool)),
            ))
        }
        None => {
            warn!("REDIS_URL not set; using in-memory stores, data is lost on restart");
            Ok(state_from_stores(
                Arc::new(InMemoryGroupStore::default()),
                Arc::new(InMemoryUserStore::default()),
                Arc::new(InMemoryRestaurantStore::default()),
            ))
        }
    }
}

/// Assemble the application: correlation middleware, cookie sessions around
/// the `/api/v1` scope, health probes at the root, and (in debug builds) the
/// OpenAPI document.
pub fn build_app(
    state: HttpState,
    key: Key,
    cookie_secure: bool,
    health_state: web::Data<HealthState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    let api = web::scope("/api/v1").wrap(session).configure(http::configure);

    let mut app = App::new()
        .app_data(web::Data::new(state))
        .app_data(health_state)
        .wrap(Correlation)
        .service(api)
        .service(health::ready)
        .service(health::live);

    #[cfg(debug_assertions)]
    {
        app = app.service(openapi_json);
    }

    app
}

/// Serve the generated OpenAPI document for local tooling.
#[cfg(debug_assertions)]
#[actix_web::get("/api-docs/openapi.json")]
async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(<crate::ApiDoc as utoipa::OpenApi>::openapi())
}

/// Bind and run the server until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = build_state(&config).await?;
    let health_state = web::Data::new(HealthState::new());
    let server_health = health_state.clone();
    let key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;

    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            key.clone(),
            cookie_secure,
            server_health.clone(),
        )
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "listening");
    server.run().await
}
