//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `UserProfileQuery`, `UserProfileCommand`,
//! `UsersQuery`) are called by inbound adapters. Driven ports
//! (`AccountRepository`, `CredentialHasher`) are implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod credential_hasher;
mod login_service;
mod user_profile_command;
mod user_profile_query;
mod users_query;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository, StoredCredentials};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
pub use login_service::LoginService;
pub use user_profile_command::UserProfileCommand;
pub use user_profile_query::UserProfileQuery;
pub use users_query::UsersQuery;
