use anyhow::Context;
use poise::serenity_prelude as serenity;
use tracing::{error, warn};

use crate::{Result, StdResult};

pub trait ResLog<T, E> {
    fn twarn(self) -> StdResult<T, E>;
    fn terror(self) -> StdResult<T, E>;
}

impl<T, E: std::fmt::Display> ResLog<T, E> for StdResult<T, E> {
    #[track_caller]
    fn twarn(self) -> StdResult<T, E> {
        let loc = std::panic::Location::caller();
        self.inspect_err(|err| {
            warn!(
                %err,
                "Error at {}:{}:{}",
                loc.file().replace("\\", "/"),
                loc.line(),
                loc.column()
            );
        })
    }

    #[track_caller]
    fn terror(self) -> StdResult<T, E> {
        let loc = std::panic::Location::caller();
        self.inspect_err(|err| {
            error!(
                %err,
                "Error at {}:{}:{}",
                loc.file().replace("\\", "/"),
                loc.line(),
                loc.column()
            );
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvVarError {
    #[error("Invalid/Missing {key} or {key}_FILE")]
    InvalidOrMissingKey { key: String },
    #[error("Invalid value for {key}: {err}")]
    InvalidValue { key: String, err: String },
    #[error("Cannot read file named by {key}: {err}")]
    UnreadableFile { key: String, err: String },
}

/// Looks `key` up in the process environment.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Reads and parses `key` through `lookup`. If `key` is absent, `<key>_FILE`
/// names a file whose trimmed content is the value.
pub fn var_from<T: std::str::FromStr>(
    key: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> StdResult<T, EnvVarError>
where
    T::Err: std::fmt::Display,
{
    let (origin, raw) = match lookup(key) {
        Some(x) => (key.to_string(), x),
        None => {
            let file_key = format!("{key}_FILE");
            let path = lookup(&file_key).ok_or_else(|| EnvVarError::InvalidOrMissingKey {
                key: key.to_string(),
            })?;
            let content =
                std::fs::read_to_string(&path).map_err(|err| EnvVarError::UnreadableFile {
                    key: file_key.clone(),
                    err: err.to_string(),
                })?;
            (file_key, content.trim().to_string())
        }
    };

    raw.parse().map_err(|err: T::Err| EnvVarError::InvalidValue {
        key: origin,
        err: err.to_string(),
    })
}

pub trait ContextExt {
    async fn permissions_in(
        &self,
        channel: &serenity::GuildChannel,
    ) -> Result<serenity::Permissions>;

    /// Id of the guild the command was used in. Commands are guild-only.
    fn guild_id_i64(&self) -> Result<i64>;
}

impl ContextExt for crate::framework::Context<'_> {
    async fn permissions_in(
        &self,
        channel: &serenity::GuildChannel,
    ) -> Result<serenity::Permissions> {
        let guild = self
            .partial_guild()
            .await
            .with_context(|| "Getting partial guild")?;
        let bot_id = self.framework().bot_id;
        let bot_member = guild.member(self, bot_id).await?;
        let permissions = guild.user_permissions_in(channel, &bot_member);

        Ok(permissions)
    }

    fn guild_id_i64(&self) -> Result<i64> {
        let guild_id = self
            .guild_id()
            .with_context(|| "Command used outside of a guild")?;
        Ok(guild_id.into())
    }
}

pub trait ToReply {
    fn to_reply(self) -> poise::CreateReply;
}

impl ToReply for serenity::CreateEmbed {
    /// Creates a default reply that only contains this embed.
    fn to_reply(self) -> poise::CreateReply {
        poise::CreateReply::default().embed(self)
    }
}
