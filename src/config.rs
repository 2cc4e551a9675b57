//! This module provides general configurations and [`Config`], the
//! settings read from the environment at start.

use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::{
    StdResult,
    util::{self, EnvVarError},
};

/// rgb(107, 76, 136)
pub const BRAND_DARK_COLOR: serenity::Color = serenity::Color::new(0x6B4C88);

const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub discord_token: String,
    /// Registers commands in this guild only, for development.
    pub dev_guild: Option<u64>,
    pub mongodb_uri: String,
    pub mongodb_dbname: String,
    /// Users allowed to start and stop polling.
    pub owners: Vec<u64>,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    pub source_timeout: Duration,
    pub poll_autostart: bool,
}

impl Config {
    pub fn from_env() -> StdResult<Self, EnvVarError> {
        Self::build(util::env_lookup)
    }

    pub fn build(lookup: impl Fn(&str) -> Option<String>) -> StdResult<Self, EnvVarError> {
        let required = |key: &str| util::var_from::<String>(key, &lookup);
        let secs = |key: &str, default: u64| {
            optional::<u64>(key, &lookup).map(|x| Duration::from_secs(x.unwrap_or(default)))
        };

        let owners = match optional::<String>("BOT_OWNERS", &lookup)? {
            Some(raw) => parse_owners(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            dev_guild: optional("DISCORD_DEVGUILDID", &lookup)?,
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_dbname: required("MONGODB_DBNAME")?,
            owners,
            poll_interval: secs("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            http_timeout: secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            source_timeout: secs("SOURCE_TIMEOUT_SECS", DEFAULT_SOURCE_TIMEOUT_SECS)?,
            poll_autostart: optional("POLL_AUTOSTART", &lookup)?.unwrap_or(false),
        })
    }
}

fn optional<T: std::str::FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> StdResult<Option<T>, EnvVarError>
where
    T::Err: std::fmt::Display,
{
    match util::var_from(key, lookup) {
        Ok(x) => Ok(Some(x)),
        Err(EnvVarError::InvalidOrMissingKey { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

fn parse_owners(raw: &str) -> StdResult<Vec<u64>, EnvVarError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse().map_err(|err: std::num::ParseIntError| EnvVarError::InvalidValue {
                key: "BOT_OWNERS".to_string(),
                err: format!("{id}: {err}"),
            })
        })
        .collect()
}
