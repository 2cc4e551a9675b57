use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::{
    Result, control::ConfigStatus, framework, locale::Locale, util::ContextExt,
};

use super::fill;

/// Set the language of announcements and replies, e.g. `en` or `es`.
#[poise::command(
    slash_command,
    user_cooldown = 3,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn language(ctx: framework::Context<'_>, code: String) -> Result<()> {
    ctx.defer().await?;
    let guild_id = ctx.guild_id_i64()?;

    let Ok(locale) = Locale::from_str(code.trim().to_lowercase().as_str()) else {
        let catalog = super::catalog(&ctx).await?;
        ctx.say(fill(catalog.language_unknown, "languages", &available()))
            .await?;
        return Ok(());
    };

    let reply = match ctx.data().control.set_locale(guild_id, locale).await {
        ConfigStatus::Unavailable => super::catalog(&ctx).await?.unavailable,
        _ => locale.catalog().language_changed,
    };
    ctx.say(reply).await?;

    Ok(())
}

/// Supported codes with their language names.
fn available() -> String {
    Locale::iter()
        .map(|locale| format!("`{locale}` ({})", locale.catalog().language))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn available_lists_every_locale() {
        assert_eq!("`en` (English), `es` (Español)", available());
    }
}
