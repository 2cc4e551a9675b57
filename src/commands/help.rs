use poise::serenity_prelude as serenity;

use crate::{Result, config, framework::Context, locale::Catalog, util::ToReply};

/// Shows the commands list and FAQ.
#[poise::command(slash_command, user_cooldown = 3)]
pub async fn help(ctx: Context<'_>) -> Result<()> {
    let catalog = super::catalog(&ctx).await?;
    ctx.send(help_embed(catalog).to_reply()).await?;

    Ok(())
}

fn help_embed(catalog: &Catalog) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(catalog.help_title)
        .color(config::BRAND_DARK_COLOR)
        .fields(catalog.help_fields.iter().copied())
}
