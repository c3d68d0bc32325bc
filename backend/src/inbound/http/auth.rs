//! Login and logout handlers.
//!
//! ```text
//! POST /api/v1/login  {"username":"ada","password":"..."}
//! POST /api/v1/logout
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, NoData};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MSG_WRONG_SCHEMA;
use crate::inbound::http::validation::login_credentials;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Verify credentials and store the caller id in the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; or envelope 400 for blank fields", body = Envelope<NoData>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed JSON", body = Envelope<NoData>),
        (status = 401, description = "Invalid credentials", body = Envelope<NoData>),
        (status = 500, description = "Internal server error", body = Envelope<NoData>)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = match login_credentials(&payload.username, &payload.password) {
        Ok(credentials) => credentials,
        Err(violations) => {
            return Ok(
                Envelope::<NoData>::invalid(violations, MSG_WRONG_SCHEMA).respond(StatusCode::OK)
            );
        }
    };
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(Envelope::<NoData>::ok(None, "Logged in").respond(StatusCode::OK))
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Session cleared", body = Envelope<NoData>)),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    Envelope::<NoData>::ok(None, "Logged out").respond(StatusCode::OK)
}
