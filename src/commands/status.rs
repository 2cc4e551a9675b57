use poise::serenity_prelude as serenity;

use crate::{
    Result, config,
    format::{channel_mention, role_mention},
    framework,
    locale::{Catalog, Locale},
    models::Destination,
    sources::Registry,
    util::{ContextExt, ResLog, ToReply},
};

/// Show this server's announcement settings.
#[poise::command(slash_command, user_cooldown = 3)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn status(ctx: framework::Context<'_>) -> Result<()> {
    ctx.defer().await?;
    let guild_id = ctx.guild_id_i64()?;
    let control = &ctx.data().control;

    let Ok(destination) = control.destination(guild_id).await.twarn() else {
        ctx.say(super::catalog(&ctx).await?.unavailable).await?;
        return Ok(());
    };
    let catalog = Locale::from_code(&destination.locale).catalog();

    let embed = status_embed(catalog, &destination, control.registry(), control.is_polling());
    ctx.send(embed.to_reply()).await?;

    Ok(())
}

fn status_embed(
    catalog: &Catalog,
    destination: &Destination,
    registry: &Registry,
    polling: bool,
) -> serenity::CreateEmbed {
    let on_off = |on: bool| if on { catalog.active } else { catalog.inactive };
    let channel = destination
        .channel_id
        .map(channel_mention)
        .unwrap_or_else(|| "-".to_string());
    let mention = match destination.mention_role_id {
        Some(role_id) => format!(
            "{} ({})",
            role_mention(role_id),
            on_off(destination.mention_enabled)
        ),
        None => "-".to_string(),
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(catalog.status_title)
        .color(config::BRAND_DARK_COLOR)
        .field(catalog.status_channel, channel, true)
        .field(catalog.status_polling, on_off(polling), true)
        .field(catalog.status_mention, mention, true);
    for descriptor in registry.descriptors() {
        embed = embed.field(
            descriptor.name,
            on_off(destination.is_enabled(descriptor.id)),
            true,
        );
    }

    embed
}
