//! Account API handlers.
//!
//! ```text
//! POST /api/v1/users {"name":"Ana","email":"ana@example.com","password":"..."}
//! POST /api/v1/login {"email":"ana@example.com","password":"..."}
//! GET  /api/v1/users
//! ```
//!
//! Registration and login are open; every other route requires a session.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{ProfilePatch, RegisterAccount};
use crate::domain::{EmailAddress, Error, LoginCredentials, LoginValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile replacement body for `PUT /api/v1/users/{email}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProfileRequest {
    pub name: String,
    pub email: String,
}

/// Account shape returned to clients; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email.into(),
        }
    }
}

pub(crate) fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|error| Error::invalid_request(error.to_string()))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let user = state
        .accounts
        .register(RegisterAccount {
            name: body.name,
            email: body.email,
            password: Zeroizing::new(body.password),
        })
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Find accounts whose name contains the fragment.
#[utoipa::path(
    get,
    path = "/api/v1/users/search/{name}",
    params(("name" = String, Path, description = "Name fragment, matched case-insensitively")),
    responses(
        (status = 200, description = "Matching accounts", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/users/search/{name}")]
pub async fn search_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    session.require_user_id()?;
    let hits = state.accounts.search(&path.into_inner()).await?;
    Ok(web::Json(hits.into_iter().map(UserResponse::from).collect()))
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Accounts", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    session.require_user_id()?;
    let users = state.accounts.list().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch one account by email.
#[utoipa::path(
    get,
    path = "/api/v1/users/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown account", body = Error)
    ),
    tags = ["users"],
    operation_id = "findUser"
)]
#[get("/users/{email}")]
pub async fn find_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    session.require_user_id()?;
    let email = parse_email(&path.into_inner())?;
    let user = state.accounts.find(&email).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Replace an account's profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/{email}",
    params(("email" = String, Path, description = "Current account email")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown account", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{email}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    session.require_user_id()?;
    let email = parse_email(&path.into_inner())?;
    let body = payload.into_inner();
    let user = state
        .accounts
        .update_profile(
            &email,
            ProfilePatch {
                name: body.name,
                email: body.email,
            },
        )
        .await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Delete an account by email.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown account", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{email}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let email = parse_email(&path.into_inner())?;
    state.accounts.remove(&email).await?;
    Ok(HttpResponse::Ok().finish())
}
