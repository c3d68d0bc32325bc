//! OpenAPI documentation for the account API.
//!
//! Registers every `/api/v1` handler plus the health probes and the session
//! cookie security scheme. Swagger UI serves it at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ErrorCode;
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::envelope::{FailureDetail, NoData};
use crate::inbound::http::users::{
    HomeRowDto, PostRowDto, ProfilePayload, ProfileRowDto, UserRowDto,
};
use crate::inbound::http::validation::FieldViolation;

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

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Accounts API",
        description = "Session-authenticated profile, password, and user listing endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::get_home,
        crate::inbound::http::users::list_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorCode,
        FailureDetail,
        FieldViolation,
        NoData,
        LoginRequest,
        ProfilePayload,
        ProfileRowDto,
        PostRowDto,
        HomeRowDto,
        UserRowDto,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "users", description = "Caller profile and user listing"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
