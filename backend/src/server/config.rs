//! Environment-driven server configuration.
//!
//! Everything is read through [`mockable::Env`] so the parsing rules can be
//! exercised with `MockEnv`. Debug builds fall back to defaults with a
//! warning; release builds reject missing or malformed toggles.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use accounts::outbound::persistence::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig,
};
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const POOL_MAX_SIZE_ENV: &str = "DB_POOL_MAX_SIZE";
const CONNECT_TIMEOUT_ENV: &str = "DB_POOL_CONNECT_TIMEOUT_SECS";
const BIND_ADDR_ENV: &str = "BIND_ADDR";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_KEY_FILE: &str = "/var/run/secrets/session_key";
pub(crate) const SESSION_KEY_MIN_LEN: usize = 64;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const COUNT_EXPECTED: &str = "a positive integer";
const ADDR_EXPECTED: &str = "host:port";

/// Build flavour deciding how strictly toggles are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode matching the current compilation profile.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Configuration failures surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {name}")]
    Missing { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Everything the binary reads from the environment.
pub struct AppSettings {
    pub database: PoolConfig,
    pub bind_addr: SocketAddr,
    pub session: SessionSettings,
}

impl AppSettings {
    /// Load and validate every setting.
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ConfigError> {
        let reader = EnvReader { env, mode };
        Ok(Self {
            database: reader.database()?,
            bind_addr: reader.bind_addr()?,
            session: reader.session()?,
        })
    }
}

/// Listener, session, and persistence inputs for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
        }
    }
}

struct EnvReader<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> EnvReader<'_, E> {
    /// Resolve an optional toggle. Debug builds substitute `fallback` for a
    /// missing or malformed value; release builds report the problem.
    fn toggle<T>(
        &self,
        name: &'static str,
        expected: &'static str,
        fallback: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, ConfigError> {
        match self.env.string(name) {
            Some(value) => match parse(&value) {
                Some(parsed) => Ok(parsed),
                None if self.mode == BuildMode::Debug => {
                    warn!(variable = name, value = %value, "invalid value; using default");
                    Ok(fallback)
                }
                None => Err(ConfigError::Invalid {
                    name,
                    value,
                    expected,
                }),
            },
            None if self.mode == BuildMode::Debug => {
                warn!(variable = name, "not set; using default");
                Ok(fallback)
            }
            None => Err(ConfigError::Missing { name }),
        }
    }

    /// Resolve a setting with a documented default in every build mode.
    fn with_default<T>(
        &self,
        name: &'static str,
        expected: &'static str,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, ConfigError> {
        let Some(value) = self.env.string(name) else {
            return Ok(default);
        };
        parse(&value).ok_or(ConfigError::Invalid {
            name,
            value,
            expected,
        })
    }

    fn database(&self) -> Result<PoolConfig, ConfigError> {
        let url = self
            .env
            .string(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing {
                name: DATABASE_URL_ENV,
            })?;
        let max_size = self.with_default(
            POOL_MAX_SIZE_ENV,
            COUNT_EXPECTED,
            DEFAULT_POOL_MAX_SIZE,
            parse_positive,
        )?;
        let timeout = self.with_default(
            CONNECT_TIMEOUT_ENV,
            COUNT_EXPECTED,
            DEFAULT_CONNECT_TIMEOUT,
            |raw| parse_positive(raw).map(|secs| Duration::from_secs(u64::from(secs))),
        )?;
        Ok(PoolConfig::new(url)
            .with_max_size(max_size)
            .with_connection_timeout(timeout))
    }

    fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let default = DEFAULT_BIND_ADDR
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: BIND_ADDR_ENV,
                value: DEFAULT_BIND_ADDR.to_owned(),
                expected: ADDR_EXPECTED,
            })?;
        self.with_default(BIND_ADDR_ENV, ADDR_EXPECTED, default, |raw| {
            raw.trim().parse().ok()
        })
    }

    fn session(&self) -> Result<SessionSettings, ConfigError> {
        let cookie_secure = self.toggle(COOKIE_SECURE_ENV, BOOL_EXPECTED, true, parse_bool)?;
        let default_same_site = match self.mode {
            BuildMode::Debug => SameSite::Lax,
            BuildMode::Release => SameSite::Strict,
        };
        let same_site =
            self.toggle(SAMESITE_ENV, SAMESITE_EXPECTED, default_same_site, parse_same_site)?;
        if same_site == SameSite::None && !cookie_secure {
            if self.mode == BuildMode::Release {
                return Err(ConfigError::InsecureSameSiteNone);
            }
            warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it");
        }
        let allow_ephemeral = self.toggle(ALLOW_EPHEMERAL_ENV, BOOL_EXPECTED, false, parse_bool)?;
        if allow_ephemeral && self.mode == BuildMode::Release {
            return Err(ConfigError::EphemeralNotAllowed);
        }
        let key = self.session_key(allow_ephemeral)?;
        Ok(SessionSettings {
            key,
            cookie_secure,
            same_site,
        })
    }

    fn session_key(&self, allow_ephemeral: bool) -> Result<Key, ConfigError> {
        let path = PathBuf::from(
            self.env
                .string(KEY_FILE_ENV)
                .unwrap_or_else(|| DEFAULT_KEY_FILE.to_owned()),
        );
        let mut bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) if self.mode == BuildMode::Debug || allow_ephemeral => {
                warn!(path = %path.display(), %error, "using temporary session key (dev only)");
                return Ok(Key::generate());
            }
            Err(source) => return Err(ConfigError::KeyRead { path, source }),
        };
        let length = bytes.len();
        let result = match self.mode {
            _ if length >= SESSION_KEY_MIN_LEN => Ok(Key::derive_from(&bytes)),
            BuildMode::Release => Err(ConfigError::KeyTooShort {
                path,
                length,
                min_len: SESSION_KEY_MIN_LEN,
            }),
            BuildMode::Debug => {
                warn!(path = %path.display(), length, "session key too short; using temporary key");
                Ok(Key::generate())
            }
        };
        bytes.zeroize();
        result
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse().ok().filter(|parsed| *parsed > 0)
}
