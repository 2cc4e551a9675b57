//! This module fans a cycle's newly free games out to every destination.

use std::{ops::AddAssign, sync::Arc};

use futures::{StreamExt, stream};
use tracing::{debug, info, warn};

use crate::{
    format,
    models::{Destination, Game},
    notify::Notifier,
    store::{DestinationStore, StoreResult},
};

const DESTINATION_BUFFER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub success: usize,
    pub fail: usize,
}

impl AddAssign for BroadcastReport {
    fn add_assign(&mut self, rhs: Self) {
        self.success += rhs.success;
        self.fail += rhs.fail;
    }
}

#[derive(Clone)]
pub struct Broadcaster {
    destinations: Arc<dyn DestinationStore>,
    notifier: Arc<dyn Notifier>,
}

impl Broadcaster {
    pub fn new(destinations: Arc<dyn DestinationStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            destinations,
            notifier,
        }
    }

    /// Delivers every game to every destination subscribed to its source.
    /// A failed delivery is counted and logged and never stops the others.
    /// Fails only if the destinations can't be listed.
    #[tracing::instrument(skip_all, fields(games = games.len()))]
    pub async fn broadcast(&self, games: &[Game]) -> StoreResult<BroadcastReport> {
        let destinations = self.destinations.all().await?;

        let games: Arc<[Game]> = games.into();

        let mut report = BroadcastReport::default();
        let mut deliveries = stream::iter(destinations)
            .map(|destination| {
                let this = self.clone();
                let games = games.clone();
                async move { this.deliver_all(&destination, &games).await }
            })
            .buffer_unordered(DESTINATION_BUFFER_SIZE);
        while let Some(partial) = deliveries.next().await {
            report += partial;
        }

        info!(
            success = report.success,
            fail = report.fail,
            "Messages sent to all destinations"
        );
        Ok(report)
    }

    async fn deliver_all(&self, destination: &Destination, games: &[Game]) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let Some(channel_id) = destination.channel_id else {
            return report;
        };

        for game in games.iter().filter(|g| destination.is_enabled(&g.source_id)) {
            let content = format::notification(destination, game, &mut rand::rng());
            match self.notifier.deliver(channel_id, &content).await {
                Ok(()) => {
                    report.success += 1;
                    debug!(
                        guild_id = destination.guild_id,
                        channel_id,
                        link = game.link.as_str(),
                        "Delivered announcement"
                    );
                }
                Err(err) => {
                    report.fail += 1;
                    warn!(
                        guild_id = destination.guild_id,
                        channel_id,
                        link = game.link.as_str(),
                        permanent = err.is_permanent(),
                        %err,
                        "Failed to deliver announcement"
                    );
                }
            }
        }

        report
    }
}
