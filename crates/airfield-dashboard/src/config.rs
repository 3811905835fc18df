//! Runtime configuration, read from the environment (and `.env` in the binary).

use resource_sync::DEFAULT_PAGE_SIZE;
use std::str::FromStr;
use tracing::warn;

pub const BUFFER_SIZE_VAR: &str = "SYNC_BUFFER_SIZE";
pub const PAGE_SIZE_VAR: &str = "SYNC_PAGE_SIZE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Capacity of every actor's request channel.
    pub buffer_size: usize,
    /// Page size for list queries that do not pick their own.
    pub default_page_size: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. Missing, unparsable or zero
    /// values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            buffer_size: parse_var(&lookup, BUFFER_SIZE_VAR).unwrap_or(defaults.buffer_size),
            default_page_size: parse_var(&lookup, PAGE_SIZE_VAR).unwrap_or(defaults.default_page_size),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: FromStr + PartialEq + Default,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Some(value),
        _ => {
            warn!(var = name, value = %raw, "Ignoring invalid setting");
            None
        }
    }
}
