//! Account handlers for the authenticated caller and the user listing.
//!
//! ```text
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me            {"firstName":"Ada"}
//! PUT   /api/v1/users/me/password   {"oldPassword":"...","newPassword":"..."}
//! GET   /api/v1/users/me/home
//! GET   /api/v1/users?limit=50&offset=100
//! ```
//!
//! Each handler keeps its own transport-status policy; see the responses
//! listed on each `utoipa::path`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, patch, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{ErrorCode, HomeSummary, PasswordChangeOutcome, Post, UserListing, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, FailureTransport, NoData, failure_response};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    password_change_from_json, profile_update_from_json, user_page,
};

pub const MSG_OK: &str = "OK";
pub const MSG_NO_USER: &str = "NO USER FOUNDED";
pub const MSG_WRONG_SCHEMA: &str = "Wrong data schema";
pub const MSG_CHANGES_SAVED: &str = "Changes saved";
pub const MSG_INCORRECT_OLD_PASSWORD: &str = "Incorrect old password";
pub const MSG_PASSWORD_UPDATED: &str = "Your password has been successfully updated";
pub const MSG_USERS: &str = "USERS";

/// Profile columns as exposed to their owner.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRowDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub followers: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostRowDto {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    pub content: String,
    /// RFC 3339 timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// `data` of a profile response: the profile row and the caller's posts.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub user_info: Vec<ProfileRowDto>,
    pub user_posts: Vec<PostRowDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeRowDto {
    pub first_name: String,
    pub username: String,
}

/// Listing row; exactly these three keys are serialized.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserRowDto {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "firstName")]
    pub first_name: String,
    pub username: String,
}

impl From<Post> for PostRowDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: *post.user_id.as_uuid(),
            content: post.content,
            created_at: post.created_at.to_rfc3339(),
        }
    }
}

impl From<UserProfile> for ProfilePayload {
    fn from(profile: UserProfile) -> Self {
        let info = profile.info;
        Self {
            user_info: vec![ProfileRowDto {
                first_name: info.first_name,
                last_name: info.last_name,
                email: info.email,
                username: info.username,
                followers: info.followers,
            }],
            user_posts: profile.posts.into_iter().map(PostRowDto::from).collect(),
        }
    }
}

impl From<HomeSummary> for HomeRowDto {
    fn from(row: HomeSummary) -> Self {
        Self {
            first_name: row.first_name,
            username: row.username,
        }
    }
}

impl From<UserListing> for UserRowDto {
    fn from(row: UserListing) -> Self {
        Self {
            id: *row.id.as_uuid(),
            first_name: row.first_name,
            username: row.username,
        }
    }
}

/// Optional paging for `GET /api/v1/users`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Page size, 1..=500. Omit both parameters to list every user.
    pub limit: Option<u32>,
    /// Rows to skip; requires `limit`.
    pub offset: Option<u32>,
}

/// Fetch the caller's profile and posts.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile, or envelope 400 when the caller has no row", body = Envelope<ProfilePayload>),
        (status = 401, description = "Login required", body = Envelope<NoData>),
        (status = 500, description = "Internal server error", body = Envelope<NoData>),
        (status = 503, description = "Database unavailable", body = Envelope<NoData>)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/me")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let response = match state.profile.fetch_profile(&user_id).await? {
        Some(profile) => {
            Envelope::ok(Some(ProfilePayload::from(profile)), MSG_OK).respond(StatusCode::OK)
        }
        None => Envelope::<NoData>::rejected(StatusCode::BAD_REQUEST, MSG_NO_USER)
            .respond(StatusCode::OK),
    };
    Ok(response)
}

/// Update allowlisted profile fields of the caller.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body(content = Object, description = "Any non-empty subset of firstName, lastName, email, username"),
    responses(
        (status = 200, description = "Saved; or envelope 400 with violations; or envelope 409 when username/email is taken", body = Envelope<NoData>),
        (status = 400, description = "Malformed JSON", body = Envelope<NoData>),
        (status = 401, description = "Login required", body = Envelope<NoData>),
        (status = 500, description = "Internal server error", body = Envelope<NoData>)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/users/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let update = match profile_update_from_json(&payload) {
        Ok(update) => update,
        Err(violations) => {
            debug!(%user_id, count = violations.len(), "profile update rejected");
            return Ok(
                Envelope::<NoData>::invalid(violations, MSG_WRONG_SCHEMA).respond(StatusCode::OK)
            );
        }
    };

    match state.profile_command.update_profile(&user_id, &update).await {
        Ok(()) => Ok(Envelope::<NoData>::ok(None, MSG_CHANGES_SAVED).respond(StatusCode::OK)),
        Err(error) if error.code() == ErrorCode::Conflict => Ok(
            Envelope::<NoData>::rejected(StatusCode::CONFLICT, error.message())
                .respond(StatusCode::OK),
        ),
        Err(error) => Err(error),
    }
}

/// Replace the caller's password after verifying the old one.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/password",
    request_body(content = Object, description = "{\"oldPassword\": string, \"newPassword\": string (8..=128)}"),
    responses(
        (status = 200, description = "Updated; or envelope 400 on violations or incorrect old password", body = Envelope<NoData>),
        (status = 400, description = "Malformed JSON", body = Envelope<NoData>),
        (status = 401, description = "Login required", body = Envelope<NoData>),
        (status = 500, description = "Internal server error", body = Envelope<NoData>)
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[put("/users/me/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let change = match password_change_from_json(&payload) {
        Ok(change) => change,
        Err(violations) => {
            return Ok(
                Envelope::<NoData>::invalid(violations, MSG_WRONG_SCHEMA).respond(StatusCode::OK)
            );
        }
    };

    let response = match state.profile_command.change_password(&user_id, &change).await? {
        PasswordChangeOutcome::Changed => {
            Envelope::<NoData>::ok(None, MSG_PASSWORD_UPDATED).respond(StatusCode::OK)
        }
        PasswordChangeOutcome::IncorrectOldPassword => {
            Envelope::<NoData>::rejected(StatusCode::BAD_REQUEST, MSG_INCORRECT_OLD_PASSWORD)
                .respond(StatusCode::OK)
        }
    };
    Ok(response)
}

/// First name and username of the caller, as stored.
///
/// Failures are reported only in the envelope; the transport status stays
/// `200`.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/home",
    responses(
        (status = 200, description = "Rows (possibly empty), or envelope 500/503 on failure", body = Envelope<Vec<HomeRowDto>>),
        (status = 401, description = "Login required", body = Envelope<NoData>)
    ),
    tags = ["users"],
    operation_id = "getHome"
)]
#[get("/users/me/home")]
pub async fn get_home(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let response = match state.profile.fetch_home_summary(&user_id).await {
        Ok(rows) => {
            let rows: Vec<HomeRowDto> = rows.into_iter().map(HomeRowDto::from).collect();
            Envelope::ok(Some(rows), MSG_OK).respond(StatusCode::OK)
        }
        Err(error) => failure_response(&error, FailureTransport::Suppress),
    };
    Ok(response)
}

/// List users. Without parameters every row is returned.
///
/// Failures are reported only in the envelope; the transport status stays
/// `200`.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Users; envelope 400 on bad paging; envelope 500/503 on failure", body = Envelope<Vec<UserRowDto>>),
        (status = 400, description = "Malformed query string", body = Envelope<NoData>),
        (status = 401, description = "Login required", body = Envelope<NoData>)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ListUsersParams>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let page = match user_page(params.limit, params.offset) {
        Ok(page) => page,
        Err(violations) => {
            return Ok(
                Envelope::<NoData>::invalid(violations, MSG_WRONG_SCHEMA).respond(StatusCode::OK)
            );
        }
    };

    let response = match state.users.list_users(&user_id, page).await {
        Ok(rows) => {
            let rows: Vec<UserRowDto> = rows.into_iter().map(UserRowDto::from).collect();
            Envelope::ok(Some(rows), MSG_USERS).respond(StatusCode::OK)
        }
        Err(error) => failure_response(&error, FailureTransport::Suppress),
    };
    Ok(response)
}
