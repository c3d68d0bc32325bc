//! Read models returned by the profile, home, and listing queries.
//!
//! These mirror rows as stored. They are not re-validated on the way out:
//! legacy rows must still be readable even if they predate current rules.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserId;

/// Profile columns readable by their owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub followers: i32,
}

/// A post authored by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Profile together with every post owned by the same user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub info: ProfileInfo,
    pub posts: Vec<Post>,
}

/// Lightweight greeting data for the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeSummary {
    pub first_name: String,
    pub username: String,
}

/// One entry of the global user listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListing {
    pub id: UserId,
    pub first_name: String,
    pub username: String,
}

/// Maximum page size accepted by the listing.
pub const USER_PAGE_MAX: u32 = 500;

/// Validation failures for [`UserPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPageError {
    LimitOutOfRange { max: u32 },
}

impl std::fmt::Display for UserPageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LimitOutOfRange { max } => write!(f, "limit must be between 1 and {max}"),
        }
    }
}

impl std::error::Error for UserPageError {}

/// Optional slice of the user listing, ordered by identifier.
///
/// # Examples
/// ```
/// use accounts::domain::UserPage;
///
/// let page = UserPage::new(50, 100).unwrap();
/// assert_eq!((page.limit(), page.offset()), (50, 100));
/// assert!(UserPage::new(0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPage {
    limit: u32,
    offset: u32,
}

impl UserPage {
    /// Validate and construct a page.
    pub fn new(limit: u32, offset: u32) -> Result<Self, UserPageError> {
        if limit == 0 || limit > USER_PAGE_MAX {
            return Err(UserPageError::LimitOutOfRange {
                max: USER_PAGE_MAX,
            });
        }
        Ok(Self { limit, offset })
    }

    /// Maximum number of rows to return.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}
