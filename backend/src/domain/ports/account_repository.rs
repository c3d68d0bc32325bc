//! Driven port for account persistence.
//!
//! Every method is scoped by the caller's own identifier except the global
//! listing and the username lookup used by login.

use async_trait::async_trait;

use crate::domain::{
    HomeSummary, Post, ProfileInfo, ProfileUpdate, StoredPasswordHash, UserId, UserListing,
    UserPage,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// A unique column (username, email) already holds the written value.
        Duplicate { message: String } => "account repository uniqueness violated: {message}",
    }
}

/// Stored login material for a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password_hash: StoredPasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Profile columns for `user_id`, or `None` when no row exists.
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProfileInfo>, AccountPersistenceError>;

    /// Every post owned by `user_id`.
    async fn find_posts(&self, user_id: &UserId) -> Result<Vec<Post>, AccountPersistenceError>;

    /// First name and username rows for `user_id`; empty when no row exists.
    async fn find_home_summary(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HomeSummary>, AccountPersistenceError>;

    /// All users, or one ordered slice of them when `page` is given.
    async fn list_users(
        &self,
        page: Option<UserPage>,
    ) -> Result<Vec<UserListing>, AccountPersistenceError>;

    /// Apply `update` to the row of `user_id`, returning the number of rows
    /// touched.
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<u64, AccountPersistenceError>;

    /// Stored password hash for `user_id`.
    async fn find_password_hash(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StoredPasswordHash>, AccountPersistenceError>;

    /// Identifier and password hash for `username`.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountPersistenceError>;

    /// Replace the password hash only if it still equals `expected`.
    ///
    /// Returns `false` when the stored hash changed since it was read, so a
    /// concurrent change is never silently overwritten.
    async fn replace_password_hash(
        &self,
        user_id: &UserId,
        expected: &StoredPasswordHash,
        replacement: &StoredPasswordHash,
    ) -> Result<bool, AccountPersistenceError>;
}
