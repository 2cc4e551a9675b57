use poise::serenity_prelude as serenity;

use crate::{
    Result, control::ConfigStatus, format::role_mention, framework, util::ContextExt,
};

use super::fill;

/// Set the role mentioned in announcements. Leave empty to mention no one.
#[poise::command(
    slash_command,
    user_cooldown = 3,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn mention(ctx: framework::Context<'_>, role: Option<serenity::Role>) -> Result<()> {
    ctx.defer().await?;
    let catalog = super::catalog(&ctx).await?;
    let guild_id = ctx.guild_id_i64()?;
    let role_id: Option<i64> = role.map(|role| role.id.into());

    let status = ctx.data().control.set_mention_role(guild_id, role_id).await;
    let reply = match (status, role_id) {
        (ConfigStatus::Unavailable, _) => catalog.unavailable.to_string(),
        (_, Some(role_id)) => fill(catalog.mention_set, "role", &role_mention(role_id)),
        (_, None) => catalog.mention_cleared.to_string(),
    };
    ctx.send(
        poise::CreateReply::default()
            .content(reply)
            .allowed_mentions(serenity::CreateAllowedMentions::new()),
    )
    .await?;

    Ok(())
}

/// Turn role mentions in announcements on or off.
#[poise::command(
    slash_command,
    user_cooldown = 3,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn mentions(ctx: framework::Context<'_>, on: bool) -> Result<()> {
    ctx.defer().await?;
    let catalog = super::catalog(&ctx).await?;
    let guild_id = ctx.guild_id_i64()?;

    let reply = match ctx.data().control.set_mentions_enabled(guild_id, on).await {
        ConfigStatus::Unavailable => catalog.unavailable,
        _ if on => catalog.mentions_on,
        _ => catalog.mentions_off,
    };
    ctx.say(reply).await?;

    Ok(())
}
