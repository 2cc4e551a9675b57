//! This module provides [`run`] for starting the bot and internally
//! sets the bot's configuration.

use std::sync::Arc;

use derivative::Derivative;
use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::{
    Error, Result, StdResult,
    broadcast::Broadcaster,
    commands,
    config::Config,
    control::Control,
    database, events,
    locale::{Catalog, Locale},
    notify::DiscordNotifier,
    poller::Poller,
    repos,
    scheduler::Scheduler,
    sources,
};

/// Custom data that is provided to all contexts.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Data {
    /// Polling and destination config operations.
    #[derivative(Debug = "ignore")]
    pub control: Arc<Control>,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;

pub async fn run(config: Config) -> Result<()> {
    let token = config.discord_token.clone();
    let owners = config
        .owners
        .iter()
        .map(|id| serenity::UserId::new(*id))
        .collect();

    let framework = poise::Framework::<Data, Error>::builder()
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                register_commands(ctx, &framework.options().commands, config.dev_guild).await?;
                create_data(ctx, &config).await
            })
        })
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::help(),
                commands::start(),
                commands::stop(),
                commands::stats(),
                commands::status(),
                commands::sources(),
                commands::bind(),
                commands::unbind(),
                commands::enable(),
                commands::disable(),
                commands::mention(),
                commands::mentions(),
                commands::language(),
            ],
            owners,
            command_check: Some(|ctx| Box::pin(command_check(ctx))),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            on_error: |err| Box::pin(on_error(err)),
            ..Default::default()
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    let client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await;

    info!("Starting framework");
    Ok(client?.start().await?)
}

async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<Data, Error>],
    dev_guild: Option<u64>,
) -> StdResult<(), serenity::Error> {
    match dev_guild {
        Some(guild_id) => {
            info!("Registering commands in development guild {}", guild_id);
            poise::builtins::register_in_guild(ctx, commands, serenity::GuildId::new(guild_id))
                .await?;
        }
        None => {
            info!("Registering commands globally");
            poise::builtins::register_globally(ctx, commands).await?;
        }
    }

    Ok(())
}

/// Wires the poll cycle to MongoDB and Discord and spawns the scheduler.
async fn create_data(ctx: &serenity::Context, config: &Config) -> Result<Data> {
    let db = database::Database::new(&config.mongodb_uri, &config.mongodb_dbname).await?;
    db.create_indexes().await?;
    let repo = repos::Repo::new(&db);

    let registry = {
        let http = sources::http_client(config.http_timeout)?;
        Arc::new(sources::Registry::builtin(http))
    };

    let poller = {
        let notifier = Arc::new(DiscordNotifier::new(ctx.http.clone()));
        let broadcaster = Broadcaster::new(repo.destinations.clone(), notifier);
        Poller::new(
            registry.clone(),
            repo.games.clone(),
            broadcaster,
            config.source_timeout,
        )
    };
    let scheduler = Scheduler::spawn(Arc::new(poller), config.poll_interval);

    let control = Control::new(scheduler, repo.destinations.clone(), registry);
    let touched = control.reconcile_sources().await?;
    info!(touched, "Reconciled destination sources");

    if config.poll_autostart {
        control.start_polling();
    }

    Ok(Data {
        control: Arc::new(control),
    })
}

async fn command_check(ctx: Context<'_>) -> Result<bool> {
    if ctx.guild_id().is_some() {
        return Ok(true);
    }
    ctx.say(Locale::default().catalog().guild_only).await?;
    Ok(false)
}

/// Strings for error replies, in the guild's locale when there is one.
pub async fn error_catalog(ctx: Context<'_>) -> &'static Catalog {
    match ctx.guild_id() {
        Some(guild_id) => ctx.data().control.locale(guild_id.into()).await.catalog(),
        None => Locale::default().catalog(),
    }
}

pub async fn on_error(err: poise::FrameworkError<'_, Data, Error>) {
    match err {
        poise::FrameworkError::NotAnOwner { ctx, .. } => {
            ctx.say(error_catalog(ctx).await.owners_only)
                .await
                .inspect_err(|err| error!(?err, "Failed to send owner-only message"))
                .ok();
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            ctx.say(error_catalog(ctx).await.missing_administrator)
                .await
                .inspect_err(|err| error!(?err, "Failed to send permissions message"))
                .ok();
        }
        err => {
            error!(?err, "Unexpected error");

            if let Some(ctx) = err.ctx() {
                ctx.say(error_catalog(ctx).await.unexpected_error)
                    .await
                    .inspect_err(|err| error!(?err, "Failed to send unexpected error message"))
                    .ok();
            }
        }
    }
}
