use anyhow::Context;
use poise::serenity_prelude as serenity;

use crate::{
    Error, Result,
    control::ConfigStatus,
    format::channel_mention,
    framework,
    util::{ContextExt, ResLog},
};

use super::fill;

/// Set the channel where free games are announced.
#[poise::command(
    slash_command,
    user_cooldown = 3,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR",
    on_error = on_error
)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn bind(
    ctx: framework::Context<'_>,
    #[channel_types("Text", "News")] channel: serenity::GuildChannel,
) -> Result<()> {
    ctx.defer().await?;
    let catalog = super::catalog(&ctx).await?;
    let mention = channel_mention(channel.id.into());

    let perms = ctx
        .permissions_in(&channel)
        .await
        .with_context(|| "Getting bot permissions")?;
    if !perms.contains(serenity::Permissions::VIEW_CHANNEL | serenity::Permissions::SEND_MESSAGES) {
        ctx.say(fill(catalog.bind_missing_permissions, "channel", &mention))
            .await?;
        return Ok(());
    }

    let guild_id = channel.guild_id.into();
    let reply = match ctx
        .data()
        .control
        .set_destination_channel(guild_id, Some(channel.id.into()))
        .await
    {
        ConfigStatus::Unavailable => catalog.unavailable.to_string(),
        _ => fill(catalog.bind_success, "channel", &mention),
    };
    ctx.say(reply).await?;

    Ok(())
}

/// Stop announcing free games in this server.
#[poise::command(
    slash_command,
    user_cooldown = 3,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn unbind(ctx: framework::Context<'_>) -> Result<()> {
    ctx.defer().await?;
    let catalog = super::catalog(&ctx).await?;
    let guild_id = ctx.guild_id_i64()?;
    let control = &ctx.data().control;

    let Ok(destination) = control.destination(guild_id).await.twarn() else {
        ctx.say(catalog.unavailable).await?;
        return Ok(());
    };
    let Some(channel_id) = destination.channel_id else {
        ctx.say(catalog.unbind_already).await?;
        return Ok(());
    };

    let reply = match control.set_destination_channel(guild_id, None).await {
        ConfigStatus::Unavailable => catalog.unavailable.to_string(),
        _ => fill(catalog.unbind_success, "channel", &channel_mention(channel_id)),
    };
    ctx.say(reply).await?;

    Ok(())
}

async fn on_error(err: poise::FrameworkError<'_, framework::Data, Error>) {
    match err {
        poise::FrameworkError::ArgumentParse { ctx, .. } => {
            // Channels the bot can't see fail to resolve before the handler runs.
            let catalog = framework::error_catalog(ctx).await;
            ctx.say(catalog.channel_unusable).await.terror().ok();
        }
        _ => framework::on_error(err).await,
    }
}
