use crate::{Result, framework, scheduler::PollingStatus};

/// Start looking for free games.
#[poise::command(slash_command, owners_only)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn start(ctx: framework::Context<'_>) -> Result<()> {
    let catalog = super::catalog(&ctx).await?;

    let reply = match ctx.data().control.start_polling() {
        PollingStatus::AlreadyStarted => catalog.start_already,
        _ => catalog.start_success,
    };
    ctx.say(reply).await?;

    Ok(())
}

/// Stop looking for free games. A check in progress still finishes.
#[poise::command(slash_command, owners_only)]
#[tracing::instrument(level = "error", skip(ctx))]
pub async fn stop(ctx: framework::Context<'_>) -> Result<()> {
    let catalog = super::catalog(&ctx).await?;

    let reply = match ctx.data().control.stop_polling() {
        PollingStatus::AlreadyStopped => catalog.stop_already,
        _ => catalog.stop_success,
    };
    ctx.say(reply).await?;

    Ok(())
}
