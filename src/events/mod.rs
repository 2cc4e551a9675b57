//! This module provides Discord event handlers.

use poise::serenity_prelude as serenity;

use crate::{Error, Result, framework::Data};

mod guild_available;

pub async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<()> {
    if let serenity::FullEvent::GuildCreate { guild, is_new } = event {
        guild_available::guild_create(data, guild, *is_new).await;
    }

    Ok(())
}
