use poise::serenity_prelude::{self as serenity, Mentionable};

use crate::{Result, config, framework, locale::Catalog, poller::LastCycle, util::ToReply};

use super::fill;

/// Show how the bot is doing. Bot owners only.
#[poise::command(slash_command, owners_only)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn stats(ctx: framework::Context<'_>) -> Result<()> {
    let catalog = super::catalog(&ctx).await?;

    let mut owners = ctx
        .framework()
        .options()
        .owners
        .iter()
        .copied()
        .collect::<Vec<_>>();
    owners.sort_unstable();
    let owners = owners
        .iter()
        .map(|id| id.mention().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title(catalog.stats_title)
        .color(config::BRAND_DARK_COLOR)
        .field(catalog.stats_guilds, ctx.cache().guild_count().to_string(), true)
        .field(catalog.stats_owners, or_dash(owners), true)
        .field(
            catalog.stats_last_cycle,
            cycle_summary(catalog, ctx.data().control.last_cycle().as_ref()),
            false,
        );
    ctx.send(embed.to_reply()).await?;

    Ok(())
}

fn or_dash(s: String) -> String {
    if s.is_empty() { "-".to_string() } else { s }
}

fn cycle_summary(catalog: &Catalog, last: Option<&LastCycle>) -> String {
    let Some(LastCycle {
        finished_at,
        report,
    }) = last
    else {
        return catalog.stats_no_cycle.to_string();
    };
    let broadcast = report.broadcast.unwrap_or_default();

    [
        ("when", finished_at.timestamp().to_string()),
        ("new", report.newly_free.to_string()),
        ("expired", report.no_longer_free.to_string()),
        ("delivered", broadcast.success.to_string()),
        ("failed", broadcast.fail.to_string()),
        ("skipped", or_dash(report.skipped.join(", "))),
    ]
    .iter()
    .fold(catalog.stats_cycle.to_string(), |text, (key, value)| {
        fill(&text, key, value)
    })
}
