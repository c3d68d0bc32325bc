//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations only translate between Diesel rows and domain
//! read models; schema and row structs stay private to this module. Pooling
//! goes through `bb8` via `diesel-async`.
//!
//! ```ignore
//! use accounts::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let repository = DieselAccountRepository::new(pool);
//! ```

mod diesel_account_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use pool::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError};
