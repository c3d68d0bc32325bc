//! Driven port for salted password hashing.

use async_trait::async_trait;

use crate::domain::{PlainPassword, StoredPasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashing adapters.
    pub enum CredentialHashError {
        /// Computing a new hash failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produce a freshly salted hash of `password`.
    async fn hash(&self, password: &PlainPassword)
    -> Result<StoredPasswordHash, CredentialHashError>;

    /// Check `password` against `stored`. A mismatch is `Ok(false)`, not an
    /// error.
    async fn verify(
        &self,
        password: &PlainPassword,
        stored: &StoredPasswordHash,
    ) -> Result<bool, CredentialHashError>;
}
