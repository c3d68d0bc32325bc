//! Credential primitives: login credentials, plaintext passwords, and stored
//! password hashes.
//!
//! Plaintext is kept in zeroizing buffers and never printed by `Debug`.

use std::fmt;

use zeroize::Zeroizing;

/// Minimum length of a newly chosen password.
pub const PASSWORD_MIN: usize = 8;
/// Maximum length of a newly chosen password.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// A newly chosen password is shorter than the policy allows.
    PasswordTooShort { min: usize },
    /// A newly chosen password is longer than the policy allows.
    PasswordTooLong { max: usize },
}

impl CredentialValidationError {
    /// Stable snake-case code reported to clients alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::EmptyPassword => "empty_value",
            Self::PasswordTooShort { .. } => "too_short",
            Self::PasswordTooLong { .. } => "too_long",
        }
    }
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Plaintext password as submitted by the caller.
///
/// Whitespace is preserved so comparisons match exactly what the user typed.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Accept a password presented for verification; it only has to be
    /// non-empty, since older passwords may predate the current policy.
    pub fn presented(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Accept a newly chosen password, enforcing the length policy.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::PlainPassword;
    ///
    /// assert!(PlainPassword::chosen("correct horse").is_ok());
    /// assert!(PlainPassword::chosen("short").is_err());
    /// ```
    pub fn chosen(raw: &str) -> Result<Self, CredentialValidationError> {
        let length = raw.chars().count();
        if length < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(CredentialValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Borrow the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(<redacted>)")
    }
}

/// Salted one-way hash in PHC string format, as persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredPasswordHash(String);

impl StoredPasswordHash {
    /// Wrap an encoded hash produced by a credential hasher or read from
    /// storage.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for StoredPasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredPasswordHash(<redacted>)")
    }
}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use accounts::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("  ada ", "pw").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: PlainPassword,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: PlainPassword::presented(password)?,
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// Request to replace the caller's password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    old_password: PlainPassword,
    new_password: PlainPassword,
}

impl PasswordChange {
    pub fn new(old_password: PlainPassword, new_password: PlainPassword) -> Self {
        Self {
            old_password,
            new_password,
        }
    }

    pub fn old_password(&self) -> &PlainPassword {
        &self.old_password
    }

    pub fn new_password(&self) -> &PlainPassword {
        &self.new_password
    }
}

/// Result of a password change that did not fail on infrastructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordChangeOutcome {
    /// The new hash replaced the old one.
    Changed,
    /// The old password did not match the stored hash; nothing was written.
    IncorrectOldPassword,
}
