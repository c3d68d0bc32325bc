//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they are testable without a database.

use std::sync::Arc;

use crate::domain::ports::{LoginService, UserProfileCommand, UserProfileQuery, UsersQuery};

/// Port implementations used by the account handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub profile_command: Arc<dyn UserProfileCommand>,
    pub users: Arc<dyn UsersQuery>,
}

impl HttpState {
    /// Build state from one value implementing every driving port.
    ///
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::AccountService;
    /// use accounts::inbound::http::state::HttpState;
    /// use accounts::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
    /// use accounts::outbound::security::Argon2CredentialHasher;
    ///
    /// # async fn build() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
    /// let service = AccountService::new(
    ///     Arc::new(DieselAccountRepository::new(pool)),
    ///     Arc::new(Argon2CredentialHasher::new()?),
    /// );
    /// let state = HttpState::from_service(Arc::new(service));
    /// # let _ = state;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: LoginService + UserProfileQuery + UserProfileCommand + UsersQuery + 'static,
    {
        Self {
            login: service.clone(),
            profile: service.clone(),
            profile_command: service.clone(),
            users: service,
        }
    }
}
