//! This module provides [`Control`], the operations behind the bot's
//! commands. None of them fail: store problems are logged and reported as
//! [`ConfigStatus::Unavailable`].

use std::sync::Arc;

use crate::{
    locale::Locale,
    models::{Destination, DestinationUpdate},
    poller::LastCycle,
    scheduler::{PollingStatus, Scheduler},
    sources::Registry,
    store::{DestinationStore, StoreResult},
    util::ResLog,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStatus {
    Updated,
    Unchanged,
    UnknownSource,
    Unavailable,
}

pub struct Control {
    scheduler: Scheduler,
    destinations: Arc<dyn DestinationStore>,
    registry: Arc<Registry>,
}

impl Control {
    pub fn new(
        scheduler: Scheduler,
        destinations: Arc<dyn DestinationStore>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            scheduler,
            destinations,
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn start_polling(&self) -> PollingStatus {
        self.scheduler.start()
    }

    pub fn stop_polling(&self) -> PollingStatus {
        self.scheduler.stop()
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn last_cycle(&self) -> Option<LastCycle> {
        self.scheduler.last_cycle()
    }

    /// Creates the record of a guild the bot just joined. An existing record
    /// is left as is.
    pub async fn register_guild(&self, guild_id: i64) -> StoreResult<()> {
        self.destinations
            .create_if_absent(&self.fresh(guild_id))
            .await
    }

    /// Gives every destination a flag for every registered source.
    pub async fn reconcile_sources(&self) -> StoreResult<u64> {
        self.destinations.ensure_sources(&self.registry.ids()).await
    }

    /// The guild's config, created with defaults if it has none yet.
    pub async fn destination(&self, guild_id: i64) -> StoreResult<Destination> {
        let fresh = self.fresh(guild_id);
        self.destinations.create_if_absent(&fresh).await?;
        Ok(self.destinations.get(guild_id).await?.unwrap_or(fresh))
    }

    /// The guild's locale, English if it can't be read.
    pub async fn locale(&self, guild_id: i64) -> Locale {
        match self.destinations.get(guild_id).await.twarn() {
            Ok(Some(destination)) => Locale::from_code(&destination.locale),
            _ => Locale::default(),
        }
    }

    pub async fn set_source_enabled(
        &self,
        guild_id: i64,
        source_id: &str,
        enabled: bool,
    ) -> ConfigStatus {
        if self.registry.get(source_id).is_none() {
            return ConfigStatus::UnknownSource;
        }
        self.update(
            guild_id,
            DestinationUpdate::SourceEnabled {
                source_id: source_id.to_string(),
                enabled,
            },
        )
        .await
    }

    pub async fn set_destination_channel(
        &self,
        guild_id: i64,
        channel_id: Option<i64>,
    ) -> ConfigStatus {
        self.update(guild_id, DestinationUpdate::Channel(channel_id))
            .await
    }

    pub async fn set_mention_role(&self, guild_id: i64, role_id: Option<i64>) -> ConfigStatus {
        self.update(guild_id, DestinationUpdate::MentionRole(role_id))
            .await
    }

    pub async fn set_mentions_enabled(&self, guild_id: i64, enabled: bool) -> ConfigStatus {
        self.update(guild_id, DestinationUpdate::MentionEnabled(enabled))
            .await
    }

    pub async fn set_locale(&self, guild_id: i64, locale: Locale) -> ConfigStatus {
        self.update(guild_id, DestinationUpdate::Locale(locale.to_string()))
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update(&self, guild_id: i64, update: DestinationUpdate) -> ConfigStatus {
        let result = async {
            self.destinations
                .create_if_absent(&self.fresh(guild_id))
                .await?;
            self.destinations.update(guild_id, &update).await
        }
        .await
        .twarn();

        match result {
            Ok(true) => ConfigStatus::Updated,
            Ok(false) => ConfigStatus::Unchanged,
            Err(_) => ConfigStatus::Unavailable,
        }
    }

    fn fresh(&self, guild_id: i64) -> Destination {
        Destination::new(guild_id, self.registry.ids())
    }
}
