//! PostgreSQL-backed `AccountRepository` implementation using Diesel.
//!
//! Each method checks out one connection and issues one statement; no
//! connection is held across calls.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountPersistenceError, AccountRepository, StoredCredentials};
use crate::domain::{
    HomeSummary, Post, ProfileInfo, ProfileUpdate, StoredPasswordHash, UserId, UserListing,
    UserPage,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CredentialRow, HomeSummaryRow, PostRow, ProfileChangeset, ProfileRow, UserListingRow,
};
use super::pool::DbPool;
use super::schema::{posts, users};

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn changeset(update: &ProfileUpdate) -> ProfileChangeset<'_> {
    ProfileChangeset {
        first_name: update.first_name().map(AsRef::as_ref),
        last_name: update.last_name().map(AsRef::as_ref),
        email: update.email().map(AsRef::as_ref),
        username: update.username().map(AsRef::as_ref),
    }
}

impl From<ProfileRow> for ProfileInfo {
    fn from(row: ProfileRow) -> Self {
        Self {
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            username: row.username,
            followers: row.followers,
        }
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

impl From<HomeSummaryRow> for HomeSummary {
    fn from(row: HomeSummaryRow) -> Self {
        Self {
            first_name: row.first_name,
            username: row.username,
        }
    }
}

impl From<UserListingRow> for UserListing {
    fn from(row: UserListingRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            first_name: row.first_name,
            username: row.username,
        }
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProfileInfo>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(ProfileInfo::from))
    }

    async fn find_posts(&self, user_id: &UserId) -> Result<Vec<Post>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostRow> = posts::table
            .filter(posts::user_id.eq(user_id.as_uuid()))
            .order((posts::created_at.asc(), posts::id.asc()))
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_home_summary(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HomeSummary>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HomeSummaryRow> = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(HomeSummaryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(HomeSummary::from).collect())
    }

    async fn list_users(
        &self,
        page: Option<UserPage>,
    ) -> Result<Vec<UserListing>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = users::table
            .order(users::id.asc())
            .select(UserListingRow::as_select())
            .into_boxed();
        if let Some(page) = page {
            query = query
                .limit(i64::from(page.limit()))
                .offset(i64::from(page.offset()));
        }
        let rows: Vec<UserListingRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(UserListing::from).collect())
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<u64, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let touched = diesel::update(users::table.filter(users::id.eq(user_id.as_uuid())))
            .set(&changeset(update))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(touched as u64)
    }

    async fn find_password_hash(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StoredPasswordHash>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let hash: Option<String> = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(users::password_hash)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(hash.map(StoredPasswordHash::new))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CredentialRow> = users::table
            .filter(users::username.eq(username))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| StoredCredentials {
            user_id: UserId::from_uuid(row.id),
            password_hash: StoredPasswordHash::new(row.password_hash),
        }))
    }

    async fn replace_password_hash(
        &self,
        user_id: &UserId,
        expected: &StoredPasswordHash,
        replacement: &StoredPasswordHash,
    ) -> Result<bool, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let touched = diesel::update(
            users::table
                .filter(users::id.eq(user_id.as_uuid()))
                .filter(users::password_hash.eq(expected.as_str())),
        )
        .set(users::password_hash.eq(replacement.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(touched == 1)
    }
}
