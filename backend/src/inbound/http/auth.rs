//! Account registration, login and logout handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"ada","email":"ada@example.com",...}
//! POST /api/v1/auth/login {"username":"ada","password":"correct horse"}
//! POST /api/v1/auth/logout
//! ```
//!
//! Also hosts the helpers other handlers use to turn the session cookie into
//! an [`Actor`].

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Actor, Error, LoginCredentials, LoginValidationError, Registration, RegistrationParts,
    RegistrationValidationError, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the session to an actor.
///
/// A session naming an unknown user is treated as anonymous.
pub(crate) async fn current_actor(
    state: &HttpState,
    session: &SessionContext,
) -> ApiResult<Option<Actor>> {
    let Some(user_id) = session.user_id()? else {
        return Ok(None);
    };
    let user = state.users.find_user(&user_id).await?;
    if user.is_none() {
        tracing::warn!(user_id = %user_id, "session references an unknown user");
    }
    Ok(user.as_ref().map(Actor::from))
}

/// Resolve the session to an actor or fail with `401 Unauthorized`.
pub(crate) async fn require_actor(state: &HttpState, session: &SessionContext) -> ApiResult<Actor> {
    current_actor(state, session)
        .await?
        .ok_or_else(|| Error::unauthorized("login required"))
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub password_confirmation: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    let (field, code) = match &err {
        RegistrationValidationError::Profile(profile) => match profile {
            UserValidationError::EmptyUsername => ("username", "empty_username"),
            UserValidationError::UsernameLength { .. } => ("username", "username_length"),
            UserValidationError::UsernameInvalidCharacters => {
                ("username", "username_invalid_characters")
            }
            UserValidationError::InvalidEmail => ("email", "invalid_email"),
            UserValidationError::EmptyDisplayName => ("displayName", "empty_display_name"),
            UserValidationError::DisplayNameTooLong { .. } => {
                ("displayName", "display_name_too_long")
            }
            UserValidationError::EmptyId | UserValidationError::InvalidId => ("id", "invalid_id"),
        },
        RegistrationValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
        RegistrationValidationError::PasswordMismatch => {
            ("passwordConfirmation", "password_mismatch")
        }
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create a member account. Does not start a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let registration = Registration::try_from_parts(RegistrationParts {
        username: &payload.username,
        email: &payload.email,
        display_name: &payload.display_name,
        password: &payload.password,
        password_confirmation: &payload.password_confirmation,
    })
    .map_err(map_registration_error)?;
    let user = state.accounts.register(&registration).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(user))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
