use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub db_max_connections: u32,
    pub refund_window_days: i64,
}

impl AppConfig {
    pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    pub const DEFAULT_REFUND_WINDOW_DAYS: i64 = 7;

    pub const JWT_EXPIRY_HOURS_RANGE: RangeInclusive<i64> = 1..=8760;
    pub const MAX_CONNECTIONS_RANGE: RangeInclusive<u32> = 1..=1000;
    pub const REFUND_WINDOW_DAYS_RANGE: RangeInclusive<i64> = 1..=365;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(AppConfig {
            database_url: required(&lookup, "DATABASE_URL")?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            jwt_expiry_hours: bounded(
                &lookup,
                "JWT_EXPIRY_HOURS",
                Self::DEFAULT_JWT_EXPIRY_HOURS,
                Self::JWT_EXPIRY_HOURS_RANGE,
            )?,
            db_max_connections: bounded(
                &lookup,
                "DB_MAX_CONNECTIONS",
                Self::DEFAULT_MAX_CONNECTIONS,
                Self::MAX_CONNECTIONS_RANGE,
            )?,
            refund_window_days: bounded(
                &lookup,
                "REFUND_WINDOW_DAYS",
                Self::DEFAULT_REFUND_WINDOW_DAYS,
                Self::REFUND_WINDOW_DAYS_RANGE,
            )?,
        })
    }

    /// Config with defaults for everything but the connection and signing secrets.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        AppConfig {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            jwt_expiry_hours: Self::DEFAULT_JWT_EXPIRY_HOURS,
            db_max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            refund_window_days: Self::DEFAULT_REFUND_WINDOW_DAYS,
        }
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

// Unset means default; set values must parse and fall inside `range`.
fn bounded<F, T>(
    lookup: &F,
    name: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Display,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if range.contains(&parsed) => Ok(parsed),
        Ok(_) => Err(ConfigError::Invalid {
            name,
            value: format!("{} (expected {} to {})", value.trim(), range.start(), range.end()),
        }),
        Err(_) => Err(ConfigError::Invalid { name, value }),
    }
}
