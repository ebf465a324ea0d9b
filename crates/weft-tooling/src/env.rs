//! Typed environment variable helpers (§6 "Configuration surface"):
//! a missing variable never panics, it falls back to the caller's
//! documented default. Adapted from `tooling::config::env`.

use crate::error::{Result, ToolingError};
use std::env;
use std::str::FromStr;

/// Reads a raw environment variable.
pub fn get_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ToolingError::General(format!(
            "environment variable {key} contains invalid UTF-8"
        ))),
    }
}

/// Reads and parses an environment variable into `T`.
pub fn get_env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env(key)? {
        Some(val) => val
            .parse::<T>()
            .map(Some)
            .map_err(|e| ToolingError::General(format!("failed to parse environment variable {key}: {e}"))),
        None => Ok(None),
    }
}

/// Reads an environment variable, falling back to `default` if absent.
pub fn get_env_or(key: &str, default: impl Into<String>) -> Result<String> {
    Ok(get_env(key)?.unwrap_or_else(|| default.into()))
}

/// Reads and parses an environment variable, falling back to `default` if
/// absent.
pub fn get_env_parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(get_env_parse(key)?.unwrap_or(default))
}

/// Reads a boolean environment variable. Recognizes `true`/`1`/`yes`/`on`
/// and `false`/`0`/`no`/`off`, case-insensitively.
pub fn get_env_bool(key: &str) -> Result<Option<bool>> {
    match get_env(key)? {
        Some(val) => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ToolingError::General(format!("invalid boolean value for {key}: {val}"))),
        },
        None => Ok(None),
    }
}
