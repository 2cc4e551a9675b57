use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::framework::Data;

/// Creates the guild's destination record. No channel is selected until an
/// administrator uses `/bind`.
pub async fn guild_create(data: &Data, guild: &serenity::Guild, is_new: Option<bool>) {
    let guild_id: i64 = guild.id.into();
    if is_new == Some(true) {
        info!(guild_id, "Joined guild");
    }

    data.control
        .register_guild(guild_id)
        .await
        .inspect_err(|err| error!(?err, guild_id, "Failed to add new guild"))
        .ok();
}
