//! Domain primitives, ports, and the account service.
//!
//! Purpose: define strongly typed values for accounts and the ports through
//! which adapters reach them. Types validate on construction so handlers and
//! repositories never see raw, unchecked input.
//!
//! Public surface:
//! - Error / ErrorCode: classified failure carried to the HTTP boundary.
//! - TraceId: request correlation identifier held in task-local scope.
//! - UserId, PersonName, Email, Username: validated account values.
//! - ProfileUpdate: allowlisted profile mutation.
//! - PlainPassword, StoredPasswordHash: credential material.
//! - AccountService: implementation of every driving port.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod profile;
pub mod profile_update;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, DUPLICATE_ACCOUNT_MESSAGE};
pub use self::auth::{
    CredentialValidationError, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, PasswordChange,
    PasswordChangeOutcome, PlainPassword, StoredPasswordHash,
};
pub use self::error::{Error, ErrorCode};
pub use self::profile::{
    HomeSummary, Post, ProfileInfo, USER_PAGE_MAX, UserListing, UserPage, UserPageError,
    UserProfile,
};
pub use self::profile_update::{
    ProfileField, ProfileFieldValue, ProfileUpdate, ProfileUpdateError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, Email, PERSON_NAME_MAX, PersonName, USERNAME_MAX, USERNAME_MIN, UserId, Username,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use accounts::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("login required"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
