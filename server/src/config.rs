use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid { key: String, value: String, reason: String },
}

/// How failures reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// `303` to `/error?error=<message>`.
    Redirect,
    /// Distinct status codes with a JSON error body.
    Status,
}

impl FromStr for ErrorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" => Ok(ErrorMode::Redirect),
            "status" => Ok(ErrorMode::Status),
            other => Err(format!("expected `redirect` or `status`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub country_api_url: String,
    pub by_name_base_url: String,
    /// SQLite file; `None` keeps places in memory.
    pub database_path: Option<PathBuf>,
    pub error_mode: ErrorMode,
    pub catalog_timeout: Duration,
    /// Trust `x-user-id` / `x-username` from an authenticating proxy. Off
    /// unless `SESSION_HEADERS=true`.
    pub session_headers: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let error_mode: String = try_load(&lookup, "ERROR_MODE", "redirect")?;
        let error_mode = error_mode.parse::<ErrorMode>().map_err(|reason| ConfigError::Invalid {
            key: "ERROR_MODE".to_string(),
            value: error_mode.clone(),
            reason,
        })?;

        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            country_api_url: try_load(&lookup, "COUNTRY_API_URL", "https://restcountries.com/v3.1/all")?,
            by_name_base_url: try_load(&lookup, "C_BY_NAME_BASE_URL", "https://restcountries.com/v3.1/name/")?,
            database_path: lookup("PLACES_DB").filter(|p| !p.trim().is_empty()).map(PathBuf::from),
            error_mode,
            catalog_timeout: Duration::from_secs(try_load(&lookup, "CATALOG_TIMEOUT_SECS", "10")?),
            session_headers: try_load(&lookup, "SESSION_HEADERS", "false")?,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse::<T>().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }
    })
}
