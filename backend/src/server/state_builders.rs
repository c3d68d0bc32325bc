//! Builders wiring the outbound adapters into HTTP handler state.

use std::sync::Arc;

use accounts::domain::AccountService;
use accounts::inbound::http::state::HttpState;
use accounts::outbound::persistence::{DbPool, DieselAccountRepository};
use accounts::outbound::security::Argon2CredentialHasher;
use actix_web::web;

/// Service backing every account endpoint in production.
pub(crate) type ProductionAccountService =
    AccountService<DieselAccountRepository, Argon2CredentialHasher>;

/// Build the account service over the PostgreSQL repository.
///
/// # Errors
/// Returns [`std::io::Error`] when the hasher rejects its cost parameters.
pub(crate) fn build_account_service(pool: DbPool) -> std::io::Result<ProductionAccountService> {
    let hasher = Argon2CredentialHasher::new()
        .map_err(|err| std::io::Error::other(format!("credential hasher setup failed: {err}")))?;
    Ok(AccountService::new(
        Arc::new(DieselAccountRepository::new(pool)),
        Arc::new(hasher),
    ))
}

/// Build shared handler state from the configured pool.
pub(crate) fn build_http_state(pool: DbPool) -> std::io::Result<web::Data<HttpState>> {
    let service = build_account_service(pool)?;
    Ok(web::Data::new(HttpState::from_service(Arc::new(service))))
}
