//! HTTP inbound adapter exposing the account endpoints.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler together with the JSON and query decode
/// error handlers. Callers wrap the scope in session middleware.
///
/// ```
/// use actix_web::{App, web};
/// use accounts::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(envelope::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(envelope::query_error_handler))
        .service(auth::login)
        .service(auth::logout)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(users::change_password)
        .service(users::get_home)
        .service(users::list_users);
}
