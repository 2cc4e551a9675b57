use poise::serenity_prelude as serenity;

use crate::{
    Result, framework,
    util::{ContextExt, ResLog},
};

/// List the stores free games are looked for in.
#[poise::command(slash_command, user_cooldown = 3)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn sources(ctx: framework::Context<'_>) -> Result<()> {
    let guild_id = ctx.guild_id_i64()?;
    let control = &ctx.data().control;
    let catalog = super::catalog(&ctx).await?;
    let destination = control.destination(guild_id).await.twarn().ok();

    // One embed per source, in the source's color.
    let reply = control
        .registry()
        .descriptors()
        .fold(poise::CreateReply::default(), |reply, d| {
            let state = match &destination {
                Some(x) if x.is_enabled(d.id) => catalog.active,
                Some(_) => catalog.inactive,
                None => catalog.unavailable,
            };
            reply.embed(
                serenity::CreateEmbed::new()
                    .title(d.name)
                    .description(format!("`{}`: {state}", d.id))
                    .color(serenity::Color::new(d.color)),
            )
        });
    ctx.send(reply).await?;

    Ok(())
}
