use crate::{
    Result, control::ConfigStatus, framework, locale::Catalog, sources::Registry,
    util::ContextExt,
};

use super::fill;

/// Announce free games from a source. See `/sources` for the list.
#[poise::command(
    slash_command,
    user_cooldown = 3,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn enable(ctx: framework::Context<'_>, source: String) -> Result<()> {
    set_source(ctx, &source, true).await
}

/// Stop announcing free games from a source. See `/sources` for the list.
#[poise::command(
    slash_command,
    user_cooldown = 3,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn disable(ctx: framework::Context<'_>, source: String) -> Result<()> {
    set_source(ctx, &source, false).await
}

async fn set_source(ctx: framework::Context<'_>, input: &str, enabled: bool) -> Result<()> {
    ctx.defer().await?;
    let catalog = super::catalog(&ctx).await?;
    let guild_id = ctx.guild_id_i64()?;
    let control = &ctx.data().control;

    let source_id = resolve(control.registry(), input);
    let status = control
        .set_source_enabled(guild_id, &source_id, enabled)
        .await;
    ctx.say(reply(catalog, status, input, enabled)).await?;

    Ok(())
}

/// Maps a source's id or display name, in any case, to its id. Unknown
/// input is returned lowercased.
fn resolve(registry: &Registry, input: &str) -> String {
    let input = input.trim();
    registry
        .descriptors()
        .find(|d| d.id.eq_ignore_ascii_case(input) || d.name.eq_ignore_ascii_case(input))
        .map(|d| d.id.to_string())
        .unwrap_or_else(|| input.to_lowercase())
}

fn reply(catalog: &Catalog, status: ConfigStatus, source: &str, enabled: bool) -> String {
    let template = match status {
        ConfigStatus::Updated if enabled => catalog.source_enabled,
        ConfigStatus::Updated => catalog.source_disabled,
        ConfigStatus::Unchanged => catalog.source_unchanged,
        ConfigStatus::UnknownSource => catalog.source_unknown,
        ConfigStatus::Unavailable => catalog.unavailable,
    };
    fill(template, "source", source.trim())
}
