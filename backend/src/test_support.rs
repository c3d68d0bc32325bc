//! Test utilities shared by unit tests and integration tests.
//!
//! Compiled for `cfg(test)` and for the `test-support` feature, which the
//! crate's own dev-dependency enables for `tests/`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{AccountPersistenceError, AccountRepository, StoredCredentials};
use crate::domain::{
    HomeSummary, Post, ProfileInfo, ProfileUpdate, StoredPasswordHash, UserId, UserListing,
    UserPage,
};
use crate::outbound::security::{Argon2CredentialHasher, HashingParams};

/// Injected repository failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Behave as if no pooled connection were available.
    Connection,
    /// Behave as if the statement failed.
    Query,
}

impl FailureMode {
    fn to_error(self) -> AccountPersistenceError {
        match self {
            Self::Connection => AccountPersistenceError::connection("pool checkout timed out"),
            Self::Query => AccountPersistenceError::query("relation \"users\" does not exist"),
        }
    }
}

/// One stored account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub followers: i32,
    pub password_hash: StoredPasswordHash,
}

impl AccountRecord {
    /// Record with a random id, derived email, and zero followers.
    pub fn new(first_name: &str, username: &str, password_hash: StoredPasswordHash) -> Self {
        Self {
            id: UserId::random(),
            first_name: first_name.to_owned(),
            last_name: "Tester".to_owned(),
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            followers: 0,
            password_hash,
        }
    }

    fn profile(&self) -> ProfileInfo {
        ProfileInfo {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            followers: self.followers,
        }
    }
}

#[derive(Default)]
struct State {
    users: BTreeMap<Uuid, AccountRecord>,
    posts: Vec<Post>,
    failure: Option<FailureMode>,
    profile_writes: usize,
}

/// `AccountRepository` backed by process memory.
///
/// Mirrors the database contract: listing is ordered by id, email and
/// username are unique, and password replacement is compare-and-swap.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    state: Mutex<State>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn guard(&self) -> Result<MutexGuard<'_, State>, AccountPersistenceError> {
        let state = self.lock();
        match state.failure {
            Some(mode) => Err(mode.to_error()),
            None => Ok(state),
        }
    }

    pub fn insert_user(&self, record: AccountRecord) {
        self.lock().users.insert(*record.id.as_uuid(), record);
    }

    pub fn insert_post(&self, owner: &UserId, content: &str) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: *owner,
            content: content.to_owned(),
            created_at: chrono::Utc::now(),
        };
        self.lock().posts.push(post.clone());
        post
    }

    /// Delete a user while keeping any session that still names them.
    pub fn remove_user(&self, id: &UserId) -> Option<AccountRecord> {
        self.lock().users.remove(id.as_uuid())
    }

    pub fn user(&self, id: &UserId) -> Option<AccountRecord> {
        self.lock().users.get(id.as_uuid()).cloned()
    }

    /// Fail every subsequent call, or stop failing with `None`.
    pub fn fail_with(&self, failure: Option<FailureMode>) {
        self.lock().failure = failure;
    }

    /// Number of profile update statements executed.
    pub fn profile_writes(&self) -> usize {
        self.lock().profile_writes
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProfileInfo>, AccountPersistenceError> {
        let state = self.guard()?;
        Ok(state.users.get(user_id.as_uuid()).map(AccountRecord::profile))
    }

    async fn find_posts(&self, user_id: &UserId) -> Result<Vec<Post>, AccountPersistenceError> {
        let state = self.guard()?;
        Ok(state
            .posts
            .iter()
            .filter(|post| post.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn find_home_summary(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HomeSummary>, AccountPersistenceError> {
        let state = self.guard()?;
        Ok(state
            .users
            .get(user_id.as_uuid())
            .map(|record| HomeSummary {
                first_name: record.first_name.clone(),
                username: record.username.clone(),
            })
            .into_iter()
            .collect())
    }

    async fn list_users(
        &self,
        page: Option<UserPage>,
    ) -> Result<Vec<UserListing>, AccountPersistenceError> {
        let state = self.guard()?;
        let (skip, take) = page.map_or((0, usize::MAX), |page| {
            (page.offset() as usize, page.limit() as usize)
        });
        Ok(state
            .users
            .values()
            .skip(skip)
            .take(take)
            .map(|record| UserListing {
                id: record.id,
                first_name: record.first_name.clone(),
                username: record.username.clone(),
            })
            .collect())
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<u64, AccountPersistenceError> {
        let mut state = self.guard()?;
        let clashes = state.users.values().any(|other| {
            other.id != *user_id
                && (update.email().is_some_and(|email| other.email == email.as_ref())
                    || update
                        .username()
                        .is_some_and(|username| other.username == username.as_ref()))
        });
        if clashes {
            return Err(AccountPersistenceError::duplicate("users unique key"));
        }
        state.profile_writes += 1;
        let Some(record) = state.users.get_mut(user_id.as_uuid()) else {
            return Ok(0);
        };
        let mut info = record.profile();
        update.apply_to(&mut info);
        record.first_name = info.first_name;
        record.last_name = info.last_name;
        record.email = info.email;
        record.username = info.username;
        Ok(1)
    }

    async fn find_password_hash(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StoredPasswordHash>, AccountPersistenceError> {
        let state = self.guard()?;
        Ok(state
            .users
            .get(user_id.as_uuid())
            .map(|record| record.password_hash.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountPersistenceError> {
        let state = self.guard()?;
        Ok(state
            .users
            .values()
            .find(|record| record.username == username)
            .map(|record| StoredCredentials {
                user_id: record.id,
                password_hash: record.password_hash.clone(),
            }))
    }

    async fn replace_password_hash(
        &self,
        user_id: &UserId,
        expected: &StoredPasswordHash,
        replacement: &StoredPasswordHash,
    ) -> Result<bool, AccountPersistenceError> {
        let mut state = self.guard()?;
        match state.users.get_mut(user_id.as_uuid()) {
            Some(record) if record.password_hash == *expected => {
                record.password_hash = replacement.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Argon2id hasher with minimal cost, for fast tests.
pub fn fast_hasher() -> Result<Argon2CredentialHasher, crate::domain::ports::CredentialHashError> {
    Argon2CredentialHasher::with_params(HashingParams {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
}
