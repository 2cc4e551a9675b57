use tracing_subscriber::EnvFilter;

use crate::util::ResLog;

mod broadcast;
mod commands;
mod config;
mod control;
mod database;
mod detector;
mod events;
mod format;
mod framework;
mod locale;
mod models;
mod notify;
mod poller;
mod repos;
mod scheduler;
mod sources;
mod store;
mod util;

type Error = anyhow::Error;
type Result<T> = std::result::Result<T, Error>;
type StdResult<T, E> = std::result::Result<T, E>;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new("info,serenity=WARN")?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    dotenvy::dotenv().twarn().ok();

    let config = config::Config::from_env()?;
    framework::run(config).await?;

    Ok(())
}
