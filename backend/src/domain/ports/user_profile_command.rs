//! Driving port for the caller's own profile mutations.

use async_trait::async_trait;

use crate::domain::{Error, PasswordChange, PasswordChangeOutcome, ProfileUpdate, UserId};

#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Write the allowlisted fields of `update` to the row of `user_id`.
    async fn update_profile(&self, user_id: &UserId, update: &ProfileUpdate) -> Result<(), Error>;

    /// Verify the old password and replace the stored hash.
    ///
    /// A missing user row is an internal error, not a rejection.
    async fn change_password(
        &self,
        user_id: &UserId,
        change: &PasswordChange,
    ) -> Result<PasswordChangeOutcome, Error>;
}
