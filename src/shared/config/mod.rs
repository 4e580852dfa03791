//! Application configuration module
//!
//! `AppConfig` collects everything the server needs at startup. It is
//! assembled through [`AppConfigBuilder`], either by hand (tests) or from the
//! process environment via [`AppConfig::from_env`].
//!
//! | Variable                   | Default      |
//! |----------------------------|--------------|
//! | `DATABASE_URL`             | unset (in-memory store) |
//! | `DATABASE_MAX_CONNECTIONS` | 10           |
//! | `JWT_SECRET`               | required     |
//! | `JWT_EXPIRE_MINUTES`       | 60           |
//! | `BCRYPT_COST`              | 12           |
//! | `SERVER_HOST`              | 0.0.0.0      |
//! | `SERVER_PORT`              | 8000         |
//! | `WS_OUTGOING_BUFFER`       | 64           |
//! | `CORS_ORIGINS`             | empty (any)  |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_JWT_EXPIRE_MINUTES: i64 = 60;
pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const DEFAULT_WS_OUTGOING_BUFFER: usize = 64;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string; `None` selects the in-memory store
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expire_minutes: i64,
    pub bcrypt_cost: u32,
    pub host: IpAddr,
    pub port: u16,
    /// Capacity of each WebSocket connection's outgoing queue
    pub ws_outgoing_buffer: usize,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Read configuration from environment variables
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        let mut builder = AppConfig::builder();

        if let Some(url) = read_var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(value) = read_var("DATABASE_MAX_CONNECTIONS") {
            builder = builder.database_max_connections(parse_var("DATABASE_MAX_CONNECTIONS", &value)?);
        }
        let secret = read_var("JWT_SECRET").ok_or(ConfigError::MissingValue("JWT_SECRET"))?;
        builder = builder.jwt_secret(secret);
        if let Some(value) = read_var("JWT_EXPIRE_MINUTES") {
            builder = builder.jwt_expire_minutes(parse_var("JWT_EXPIRE_MINUTES", &value)?);
        }
        if let Some(value) = read_var("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_var("BCRYPT_COST", &value)?);
        }
        if let Some(value) = read_var("SERVER_HOST") {
            builder = builder.host(parse_var("SERVER_HOST", &value)?);
        }
        if let Some(value) = read_var("SERVER_PORT") {
            builder = builder.port(parse_var("SERVER_PORT", &value)?);
        }
        if let Some(value) = read_var("WS_OUTGOING_BUFFER") {
            builder = builder.ws_outgoing_buffer(parse_var("WS_OUTGOING_BUFFER", &value)?);
        }
        if let Some(value) = read_var("CORS_ORIGINS") {
            builder = builder.cors_origins(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SECRET",
                reason: "must not be empty".to_string(),
            });
        }
        if self.jwt_expire_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "JWT_EXPIRE_MINUTES",
                reason: "must be positive".to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                reason: "must be between 4 and 31".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SERVER_PORT",
                reason: "must not be zero".to_string(),
            });
        }
        if self.ws_outgoing_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                name: "WS_OUTGOING_BUFFER",
                reason: "must not be zero".to_string(),
            });
        }
        if self.database_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DATABASE_MAX_CONNECTIONS",
                reason: "must not be zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    database_max_connections: Option<u32>,
    jwt_secret: Option<String>,
    jwt_expire_minutes: Option<i64>,
    bcrypt_cost: Option<u32>,
    host: Option<IpAddr>,
    port: Option<u16>,
    ws_outgoing_buffer: Option<usize>,
    cors_origins: Vec<String>,
}

impl AppConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn database_max_connections(mut self, max: u32) -> Self {
        self.database_max_connections = Some(max);
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn jwt_expire_minutes(mut self, minutes: i64) -> Self {
        self.jwt_expire_minutes = Some(minutes);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn host(mut self, host: IpAddr) -> Self {
        self.host = Some(host);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn ws_outgoing_buffer(mut self, capacity: usize) -> Self {
        self.ws_outgoing_buffer = Some(capacity);
        self
    }

    pub fn cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            database_url: self.database_url,
            database_max_connections: self.database_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            jwt_secret: self.jwt_secret.ok_or(ConfigError::MissingValue("JWT_SECRET"))?,
            jwt_expire_minutes: self.jwt_expire_minutes.unwrap_or(DEFAULT_JWT_EXPIRE_MINUTES),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST),
            host: self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: self.port.unwrap_or(DEFAULT_PORT),
            ws_outgoing_buffer: self.ws_outgoing_buffer.unwrap_or(DEFAULT_WS_OUTGOING_BUFFER),
            cors_origins: self.cors_origins,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        name,
        reason: e.to_string(),
    })
}
