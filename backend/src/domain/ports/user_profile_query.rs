//! Driving port for the caller's own profile reads.

use async_trait::async_trait;

use crate::domain::{Error, HomeSummary, UserId, UserProfile};

#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Profile and posts of `user_id`; `None` when the user row is missing.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, Error>;

    /// Home screen rows of `user_id`, returned as stored (possibly empty).
    async fn fetch_home_summary(&self, user_id: &UserId) -> Result<Vec<HomeSummary>, Error>;
}
