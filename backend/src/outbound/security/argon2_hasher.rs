//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Hashing and verification are CPU-bound, so both run on the blocking pool
//! via `tokio::task::spawn_blocking`. Hashes are stored in PHC string format,
//! which embeds salt and parameters; verification reads parameters from the
//! stored string, so hashes written with older settings still verify.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;

use crate::domain::ports::{CredentialHashError, CredentialHasher};
use crate::domain::{PlainPassword, StoredPasswordHash};

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingParams {
    /// m=19456 KiB, t=2, p=1.
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Argon2id credential hasher with fixed cost parameters.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Build a hasher with the production parameters.
    pub fn new() -> Result<Self, CredentialHashError> {
        Self::with_params(HashingParams::default())
    }

    /// Build a hasher with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialHashError::Hashing`] when Argon2 rejects the
    /// parameters (for example memory below `8 * parallelism`).
    pub fn with_params(params: HashingParams) -> Result<Self, CredentialHashError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|err| CredentialHashError::hashing(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

fn hash_blocking(
    argon2: &Argon2<'_>,
    password: &PlainPassword,
) -> Result<StoredPasswordHash, CredentialHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|err| CredentialHashError::hashing(err.to_string()))?;
    Ok(StoredPasswordHash::new(hash.to_string()))
}

/// Only PHC strings this hasher can parse verify. Hashes written by other
/// schemes (bcrypt `$2b$...` rows included) come back as `MalformedHash` or
/// `Hashing` errors and must be migrated before their owners can log in or
/// change password.
fn verify_blocking(
    argon2: &Argon2<'_>,
    password: &PlainPassword,
    stored: &StoredPasswordHash,
) -> Result<bool, CredentialHashError> {
    let parsed = PasswordHash::new(stored.as_str())
        .map_err(|err| CredentialHashError::malformed_hash(err.to_string()))?;
    match argon2.verify_password(password.expose().as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialHashError::hashing(err.to_string())),
    }
}

fn join_error(err: tokio::task::JoinError) -> CredentialHashError {
    CredentialHashError::hashing(format!("hashing task failed: {err}"))
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(
        &self,
        password: &PlainPassword,
    ) -> Result<StoredPasswordHash, CredentialHashError> {
        let argon2 = self.argon2.clone();
        let password = password.clone();
        tokio::task::spawn_blocking(move || hash_blocking(&argon2, &password))
            .await
            .map_err(join_error)?
    }

    async fn verify(
        &self,
        password: &PlainPassword,
        stored: &StoredPasswordHash,
    ) -> Result<bool, CredentialHashError> {
        let argon2 = self.argon2.clone();
        let password = password.clone();
        let stored = stored.clone();
        tokio::task::spawn_blocking(move || verify_blocking(&argon2, &password, &stored))
            .await
            .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn hasher() -> Argon2CredentialHasher {
        Argon2CredentialHasher::with_params(HashingParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("cheap test params")
    }

    fn password(raw: &str) -> PlainPassword {
        PlainPassword::presented(raw).expect("non-empty password")
    }

    #[rstest]
    #[tokio::test]
    async fn verifies_the_password_it_hashed(hasher: Argon2CredentialHasher) {
        let stored = hasher.hash(&password("correct horse")).await.expect("hash");
        assert!(stored.as_str().starts_with("$argon2id$"));
        assert!(hasher
            .verify(&password("correct horse"), &stored)
            .await
            .expect("verify"));
        assert!(!hasher
            .verify(&password("battery staple"), &stored)
            .await
            .expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn salts_every_hash(hasher: Argon2CredentialHasher) {
        let first = hasher.hash(&password("same")).await.expect("hash");
        let second = hasher.hash(&password("same")).await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[case::truncated("$2a$10$legacybcrypt")]
    #[case::bcrypt("$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW")]
    #[case::plain("hunter2")]
    #[tokio::test]
    async fn rejects_non_argon2_stored_hash(hasher: Argon2CredentialHasher, #[case] stored: &str) {
        let error = hasher
            .verify(&password("pw"), &StoredPasswordHash::new(stored))
            .await
            .expect_err("not a PHC argon2 string");
        assert!(matches!(
            error,
            CredentialHashError::MalformedHash { .. } | CredentialHashError::Hashing { .. }
        ));
    }

    #[rstest]
    fn rejects_invalid_params() {
        let result = Argon2CredentialHasher::with_params(HashingParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }

    #[rstest]
    fn production_params_are_fixed() {
        assert_eq!(
            HashingParams::default(),
            HashingParams {
                memory_kib: 19_456,
                iterations: 2,
                parallelism: 1
            }
        );
    }
}
