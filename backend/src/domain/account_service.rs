//! Account domain service.
//!
//! Implements every driving port over the account repository and credential
//! hasher. Persistence failures are classified here: connection loss becomes
//! `service_unavailable`, query failures become `internal_error`, uniqueness
//! violations become `conflict`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, CredentialHashError, CredentialHasher,
    LoginService, UserProfileCommand, UserProfileQuery, UsersQuery,
};
use crate::domain::{
    Error, HomeSummary, LoginCredentials, PasswordChange, PasswordChangeOutcome, ProfileUpdate,
    UserId, UserListing, UserPage, UserProfile,
};

/// Message surfaced when a profile update collides with another account.
pub const DUPLICATE_ACCOUNT_MESSAGE: &str = "username or email already in use";

/// Account service implementing the driving ports.
#[derive(Clone)]
pub struct AccountService<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountService<R, H> {
    /// Create a new service over the given adapters.
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }
}

impl<R, H> AccountService<R, H>
where
    R: AccountRepository,
    H: CredentialHasher,
{
    fn map_persistence_error(error: AccountPersistenceError) -> Error {
        match error {
            AccountPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("account repository unavailable: {message}"))
            }
            AccountPersistenceError::Query { message } => {
                Error::internal(format!("account repository error: {message}"))
            }
            AccountPersistenceError::Duplicate { message } => {
                debug!(%message, "profile update hit a uniqueness constraint");
                Error::conflict(DUPLICATE_ACCOUNT_MESSAGE)
            }
        }
    }

    fn map_hash_error(error: CredentialHashError) -> Error {
        Error::internal(error.to_string())
    }
}

#[async_trait]
impl<R, H> LoginService for AccountService<R, H>
where
    R: AccountRepository,
    H: CredentialHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .repository
            .find_credentials(credentials.username())
            .await
            .map_err(Self::map_persistence_error)?;
        let Some(stored) = stored else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(Self::map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized("invalid credentials"));
        }
        info!(user_id = %stored.user_id, "user authenticated");
        Ok(stored.user_id)
    }
}

#[async_trait]
impl<R, H> UserProfileQuery for AccountService<R, H>
where
    R: AccountRepository,
    H: CredentialHasher,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, Error> {
        let Some(info) = self
            .repository
            .find_profile(user_id)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            return Ok(None);
        };
        let posts = self
            .repository
            .find_posts(user_id)
            .await
            .map_err(Self::map_persistence_error)?;
        Ok(Some(UserProfile { info, posts }))
    }

    async fn fetch_home_summary(&self, user_id: &UserId) -> Result<Vec<HomeSummary>, Error> {
        self.repository
            .find_home_summary(user_id)
            .await
            .map_err(Self::map_persistence_error)
    }
}

#[async_trait]
impl<R, H> UserProfileCommand for AccountService<R, H>
where
    R: AccountRepository,
    H: CredentialHasher,
{
    async fn update_profile(&self, user_id: &UserId, update: &ProfileUpdate) -> Result<(), Error> {
        let touched = self
            .repository
            .update_profile(user_id, update)
            .await
            .map_err(Self::map_persistence_error)?;
        if touched == 0 {
            warn!(%user_id, "profile update matched no row");
        } else {
            debug!(%user_id, fields = ?update.fields(), "profile update applied");
        }
        Ok(())
    }

    async fn change_password(
        &self,
        user_id: &UserId,
        change: &PasswordChange,
    ) -> Result<PasswordChangeOutcome, Error> {
        let Some(current) = self
            .repository
            .find_password_hash(user_id)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            return Err(Error::internal(format!(
                "no stored credentials for authenticated user {user_id}"
            )));
        };

        let matches = self
            .hasher
            .verify(change.old_password(), &current)
            .await
            .map_err(Self::map_hash_error)?;
        if !matches {
            return Ok(PasswordChangeOutcome::IncorrectOldPassword);
        }

        let replacement = self
            .hasher
            .hash(change.new_password())
            .await
            .map_err(Self::map_hash_error)?;
        let replaced = self
            .repository
            .replace_password_hash(user_id, &current, &replacement)
            .await
            .map_err(Self::map_persistence_error)?;
        if !replaced {
            warn!(%user_id, "password changed concurrently; rejecting stale change");
            return Ok(PasswordChangeOutcome::IncorrectOldPassword);
        }
        info!(%user_id, "password updated");
        Ok(PasswordChangeOutcome::Changed)
    }
}

#[async_trait]
impl<R, H> UsersQuery for AccountService<R, H>
where
    R: AccountRepository,
    H: CredentialHasher,
{
    async fn list_users(
        &self,
        authenticated_user: &UserId,
        page: Option<UserPage>,
    ) -> Result<Vec<UserListing>, Error> {
        debug!(%authenticated_user, ?page, "listing users");
        self.repository
            .list_users(page)
            .await
            .map_err(Self::map_persistence_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
