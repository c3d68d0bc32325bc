//! Driving port for the global user listing.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserListing, UserPage};

#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// List users visible to `authenticated_user`; everyone when `page` is
    /// `None`.
    async fn list_users(
        &self,
        authenticated_user: &UserId,
        page: Option<UserPage>,
    ) -> Result<Vec<UserListing>, Error>;
}
